use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::data::RepositoryError;
use crate::session::SessionError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Order {0} not found")]
    OrderNotFound(i64),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::OrderNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Session(
                SessionError::CheckoutInProgress(_) | SessionError::NotFound(_),
            ) => {
                warn!(error = %self, "Session conflict");
                (
                    StatusCode::CONFLICT,
                    "Order already being placed for this session".to_string(),
                )
            }
            AppError::Session(SessionError::InvalidOrder(_) | SessionError::InvalidTaco(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            AppError::Session(SessionError::Unavailable(_)) | AppError::Repository(_) => {
                error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
