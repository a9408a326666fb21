//! # Taco Cloud
//!
//! > **Design a taco, add it to an order, place the order.**
//!
//! A small web service for building taco orders. Customers pick ingredients
//! from a fixed catalog, name each taco, collect tacos into a per-session
//! draft order, then submit delivery and payment details. A placed order is
//! written to SQLite across three tables in one transaction.
//!
//! ## Module Tour
//!
//! ### 1. The Data ([`model`], [`validation`])
//! Plain types: [`Ingredient`](model::Ingredient), [`Taco`](model::Taco),
//! [`TacoOrder`](model::TacoOrder), and the field rules each must pass.
//!
//! ### 2. Persistence ([`data`])
//! Repository traits with SQLite implementations. The order save assigns
//! ids to the order and every taco, or writes nothing at all.
//!
//! ### 3. Session Drafts ([`framework`], [`session`])
//! Each visitor's in-progress order lives in a single Tokio actor keyed by
//! session id. The actor applies one request at a time, so drafts need no
//! locks. Placing an order spans several requests, so it first claims the
//! draft with a checkout; a second submission is refused until the claim ends.
//! Idle drafts expire after a configurable TTL.
//!
//! ### 4. The Interface ([`web`])
//! axum handlers for the design and order flows, returning JSON views.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! Reads settings, starts the pool and the session actor, and shuts both
//! down cleanly.
//!
//! ## Running
//!
//! ```bash
//! # Listens on 0.0.0.0:8080, database in ./taco-cloud.db
//! cargo run
//!
//! # Verbose session and SQL logs
//! RUST_LOG=taco_cloud=debug cargo run
//! ```

pub mod config;
pub mod data;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod session;
pub mod validation;
pub mod web;
