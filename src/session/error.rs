//! Error types for the session store.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session with this id (expired, completed, or never opened).
    #[error("Session not found: {0}")]
    NotFound(String),

    /// A taco that fails validation was offered to the draft.
    #[error("Invalid taco: {0}")]
    InvalidTaco(ValidationErrors),

    /// The submitted order fails validation.
    #[error("Invalid order: {0}")]
    InvalidOrder(ValidationErrors),

    /// Another request is already placing this session's order.
    #[error("Checkout already in progress for session {0}")]
    CheckoutInProgress(String),

    /// The session actor is gone or failed to answer.
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}
