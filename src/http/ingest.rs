//! Beacon ingestion endpoint.

use crate::app::AppState;
use axum::{
  extract::{ConnectInfo, State},
  http::{HeaderMap, StatusCode, header},
  response::IntoResponse,
};
use chrono::Utc;
use std::net::SocketAddr;
use tracing::{debug, error};

/// Accept a POST and store one row.
///
/// The body is taken as UTF-8 text, unparsed and unvalidated; the sender IP
/// comes from the connection, never from the payload, and the timestamp is
/// assigned here so stored order matches receipt order.
pub async fn submit_log(
  State(state): State<AppState>,
  ConnectInfo(peer): ConnectInfo<SocketAddr>,
  headers: HeaderMap,
  body: axum::body::Bytes,
) -> impl IntoResponse {
  let referrer = headers
    .get(header::REFERER)
    .and_then(|v| v.to_str().ok())
    .map(|s| s.to_string());
  let message = String::from_utf8_lossy(&body).into_owned();

  if let Err(e) = sqlx::query("INSERT INTO logs (time, ip, ref, message) VALUES (?, ?, ?, ?)")
    .bind(Utc::now())
    .bind(peer.ip().to_string())
    .bind(referrer)
    .bind(&message)
    .execute(&state.db)
    .await
  {
    error!("submit_log db error: {e}");
    return (StatusCode::INTERNAL_SERVER_ERROR, "db error").into_response();
  }

  debug!("stored beacon from {}", peer.ip());
  "ok".into_response()
}
