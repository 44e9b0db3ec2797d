use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use service::errors::ServiceError;

use crate::views;

pub const GENERIC_TITLE: &str = "Villa kom upp";
pub const GENERIC_TEXT: &str = "Ekki tókst að vinna úr beiðninni.";

/// Error boundary for request handlers: logs the cause and answers with a
/// generic page that never includes store details.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = match &self {
            AppError::Service(e) => e.kind(),
        };
        error!(kind, error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, views::error_page(GENERIC_TITLE, GENERIC_TEXT)).into_response()
    }
}

/// Panic handler for `CatchPanicLayer`: same generic page as `AppError`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!(event = "handler_panic", %detail, "request handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, views::error_page(GENERIC_TITLE, GENERIC_TEXT)).into_response()
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("signature store unreachable: {0}")]
    StoreUnreachable(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
