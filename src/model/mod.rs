//! Domain types shared by the repositories, the session store and the web layer.

pub mod ingredient;
pub mod order;
pub mod taco;

pub use ingredient::*;
pub use order::*;
pub use taco::*;
