//! # System Lifecycle
//!
//! [`TacoCloud`] owns everything that runs for the life of the process: the
//! SQLite pool, the session actor task, and the handler state that ties them
//! together.
//!
//! ## Startup
//!
//! 1. Open the pool and create missing tables
//! 2. Upsert the ingredient catalog
//! 3. Build the ingredient resolver from the stored catalog
//! 4. Spawn the session actor
//!
//! ## Shutdown
//!
//! Dropping the last session client closes the actor's mailbox; the actor
//! drains and exits. [`TacoCloud::shutdown`] drops its own handles, awaits the
//! actor task, then closes the pool. Call it after the HTTP server has
//! returned, so no router still holds a client.

pub mod system;
pub mod tracing;

pub use system::{StartupError, TacoCloud};
