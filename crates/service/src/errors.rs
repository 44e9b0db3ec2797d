use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("already signed: {0}")]
    Duplicate(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("storage operation `{0}` timed out after {1}s")]
    Timeout(&'static str, u64),
}

impl ServiceError {
    /// Stable label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation",
            ServiceError::Duplicate(_) => "duplicate",
            ServiceError::Db(_) => "db",
            ServiceError::Timeout(..) => "timeout",
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::Duplicate(id) => ServiceError::Duplicate(id),
            ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}
