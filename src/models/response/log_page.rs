//! Response type combining records and available filter values.

use crate::models::log::log_record::LogRecord;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LogPage {
    pub records: Vec<LogRecord>,
    pub ips: Vec<String>,
    pub days: Vec<String>,
}
