use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;

use crate::{errors, state::ServerState, views};

pub mod registration;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, views::error_page("Síða fannst ekki", "Engin síða er á þessari slóð."))
}

/// Build the full application router.
///
/// Registration owns `GET /` and `POST /`; `login` is merged afterwards so any
/// other path falls through to it. It must not claim `/` itself.
pub fn build_router(state: ServerState, login: Router) -> Router {
    let registration = Router::new()
        .route("/", get(registration::index).post(registration::register))
        .route("/health", get(health))
        .with_state(state);

    registration
        .merge(login)
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(errors::handle_panic))
        .layer(
            TraceLayer::new_for_http()
                // one span per request, INFO level
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency on response
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx at ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
