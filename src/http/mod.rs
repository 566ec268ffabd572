//! HTTP router and handlers.

use crate::app::AppState;
use axum::{Router, routing::get};

pub mod ingest;
pub mod statics;
pub mod view;

/// Assemble the HTTP router with all routes.
pub fn build_router(state: AppState) -> Router {
  Router::new()
    .route("/log", get(view::view_log).post(ingest::submit_log))
    .route("/static/*path", get(statics::serve_static))
    .with_state(state)
}
