//! # Backend Errors
//!
//! One error type flows from storage through the domain services up to the
//! REST layer, which is the only place it is turned into a status code.

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// A referenced organization or invoice does not exist
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness or integrity constraint was violated
    #[error("{0}")]
    Conflict(String),

    /// The request was rejected before touching the store
    #[error("{0}")]
    Validation(String),

    /// The store failed; any write in progress was rolled back
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl AppError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        AppError::NotFound(format!("{} not found: {}", entity, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// Machine-readable kind used in the error body
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Validation(_) => "validation",
            AppError::Storage(_) => "storage",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return AppError::Conflict(format!("Duplicate value: {}", db_err.message()));
            }
            if db_err.is_foreign_key_violation() {
                return AppError::NotFound("Referenced record does not exist".to_string());
            }
        }
        AppError::Storage(err.to_string())
    }
}
