//! Static file pass-through.

use crate::app::AppState;
use axum::{
  extract::{Path as AxumPath, State},
  http::{HeaderMap, StatusCode, header},
  response::IntoResponse,
};
use std::path::{Component, Path};

/// Serve a file from the configured static roots, probed in order.
pub async fn serve_static(
  State(state): State<AppState>,
  AxumPath(path): AxumPath<String>,
) -> impl IntoResponse {
  let rel = Path::new(&path);
  // Only plain path segments; anything else could escape a root.
  if rel
    .components()
    .any(|c| !matches!(c, Component::Normal(_)))
  {
    return (StatusCode::NOT_FOUND, "not found").into_response();
  }

  for root in state.static_roots.iter() {
    let full = root.join(rel);
    if let Ok(bytes) = tokio::fs::read(&full).await {
      let mut headers = HeaderMap::new();
      headers.insert(header::CONTENT_TYPE, content_type_for(&full).parse().unwrap());
      return (headers, bytes).into_response();
    }
  }
  (StatusCode::NOT_FOUND, "not found").into_response()
}

/// Content type by extension. The database file may be published under a
/// static root and must not be sniffed as text.
fn content_type_for(path: &Path) -> &'static str {
  match path.extension().and_then(|e| e.to_str()) {
    Some("html") => "text/html; charset=utf-8",
    Some("js") => "text/javascript; charset=utf-8",
    Some("css") => "text/css; charset=utf-8",
    Some("json") => "application/json",
    Some("png") => "image/png",
    Some("svg") => "image/svg+xml",
    Some("ico") => "image/x-icon",
    Some("txt") => "text/plain; charset=utf-8",
    Some("sqlite") | Some("db") => "application/octet-stream",
    _ => "application/octet-stream",
  }
}
