//! # Persistence
//!
//! SQLite-backed repositories for ingredients and placed orders.
//!
//! - [`schema`] - table definitions and pool construction
//! - [`seed`] - the ingredient catalog loaded at startup
//! - [`IngredientRepository`] - ingredient lookups and seeding upserts
//! - [`OrderRepository`] - the three-table order write and its read-back
//!
//! Repositories are traits so the web layer can hold them as
//! `Arc<dyn ...>`; the SQLite implementations are the only production ones.

pub mod error;
pub mod ingredient_repository;
pub mod order_repository;
pub mod schema;
pub mod seed;

pub use error::*;
pub use ingredient_repository::*;
pub use order_repository::*;
pub use schema::*;
