//! # HTTP Surface
//!
//! JSON views over the design and order flows. Routes:
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/` | [`home::home`] |
//! | GET | `/health` | [`home::health`] |
//! | GET/POST | `/design` | [`design::show_design_form`], [`design::process_taco`] |
//! | GET | `/orders/current` | [`orders::order_form`] |
//! | POST | `/orders` | [`orders::process_order`] |
//! | GET | `/orders/{id}` | [`orders::placed_order`] |
//!
//! Every handler that touches the draft reads the `taco_session` cookie
//! through [`SessionCookie`] and writes it back, so a missing or stale
//! cookie silently starts a new session.

pub mod cookie;
pub mod design;
pub mod error;
pub mod home;
pub mod orders;
pub mod resolver;

pub use cookie::SessionCookie;
pub use error::AppError;
pub use resolver::IngredientById;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::data::{IngredientRepository, OrderRepository};
use crate::session::SessionClient;

/// Shared handler state. Cloned per request; every field is a handle.
#[derive(Clone)]
pub struct AppState {
    pub ingredients: Arc<dyn IngredientRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub resolver: IngredientById,
    pub sessions: SessionClient,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(home::health))
        .route(
            "/design",
            get(design::show_design_form).post(design::process_taco),
        )
        .route("/orders/current", get(orders::order_form))
        .route("/orders", post(orders::process_order))
        .route("/orders/{id}", get(orders::placed_order))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
