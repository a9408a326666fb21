//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global `tracing` subscriber: compact lines,
//! no module prefix, level chosen by `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **HTTP**: one span per request from `tower-http`'s `TraceLayer`
//! - **Session store**: actor start and shutdown, session open/complete at
//!   `info`, every request at `debug`
//! - **Persistence**: order saves with their assigned ids, seeding, failed
//!   transactions at `warn`
//! - **Validation**: rejected designs and orders with the offending fields
//!
//! ## Usage Examples
//!
//! ```bash
//! # Default: this crate and tower_http at info
//! cargo run
//!
//! # Session payloads and SQL lookups
//! RUST_LOG=taco_cloud=debug cargo run
//!
//! # Only the session actor
//! RUST_LOG=taco_cloud::framework=debug cargo run
//! ```
//!
//! A placed order reads like this at `info`:
//!
//! ```text
//! INFO Created entity_type="OrderSession" id=6f1c... size=1
//! INFO process_taco: Taco added session=6f1c... taco=Carnitas tacos=1
//! INFO process_order:save: Order placed order_id=1 tacos=1
//! INFO Deleted entity_type="OrderSession" id=6f1c... size=0
//! ```

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "taco_cloud=info,tower_http=info";

pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
