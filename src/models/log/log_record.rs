//! Log record stored in SQLite and exposed via API.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One stored beacon. `time` is assigned at receipt, never client-claimed;
/// `message` is the raw POST body, kept exactly as received.
#[derive(Debug, Serialize, FromRow)]
pub struct LogRecord {
    pub id: i64,
    pub time: DateTime<Utc>,
    pub ip: String,
    #[sqlx(rename = "ref")]
    #[serde(rename = "ref")]
    pub referrer: Option<String>,
    pub message: String,
}
