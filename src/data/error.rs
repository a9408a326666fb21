//! Error types for the repositories.

use thiserror::Error;

use crate::model::UnknownIngredientType;

/// Errors that can occur while reading or writing the database.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The database rejected a statement or could not be reached.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored ingredient row carries a category this build does not know.
    #[error("Corrupt ingredient row: {0}")]
    CorruptIngredient(#[from] UnknownIngredientType),
}
