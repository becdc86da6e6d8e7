use serde::Deserialize;

/// Asynchronous job record, queried only for its owner and lifecycle
/// window. Timestamps stay opaque strings: the window comparison happens
/// server-side in the second query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobRecord {
    pub id: String,
    pub created_by_id: String,
    pub created_date: String,
    /// Absent while the job is still running.
    #[serde(default)]
    pub completed_date: Option<String>,
}

/// Diagnostic log record captured during a job's execution window. Linked
/// to a user and a time span, never directly to the job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogRecord {
    pub id: String,
    pub start_time: String,
    pub log_user_id: String,
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub log_length: u64,
    #[serde(default)]
    pub request: Option<String>,
}
