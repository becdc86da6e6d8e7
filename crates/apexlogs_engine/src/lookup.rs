use apexlogs_logging::apex_info;

use crate::query::{QueryError, ToolingClient};
use crate::types::{JobRecord, LogRecord};

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("invalid job id: {0}")]
    InvalidJobId(String),
    #[error("job {0} not found")]
    JobNotFound(String),
    #[error("job {0} has not completed yet")]
    JobNotFinished(String),
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Well-formed async job id: `707` followed by 12 to 18 alphanumerics.
/// Checked before any id is interpolated into a query statement.
pub fn is_well_formed_job_id(id: &str) -> bool {
    let Some(rest) = id.strip_prefix("707") else {
        return false;
    };
    (12..=18).contains(&rest.len()) && rest.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Two-step, time-windowed join from a job id to its ordered log records.
///
/// Logs are not linked to jobs by the data source; the window has to be
/// computed from the job's own lifecycle timestamps.
pub struct LogLookup<'a> {
    client: &'a ToolingClient,
}

impl<'a> LogLookup<'a> {
    pub fn new(client: &'a ToolingClient) -> Self {
        Self { client }
    }

    pub async fn for_job(&self, job_id: &str) -> Result<Vec<LogRecord>, LookupError> {
        if !is_well_formed_job_id(job_id) {
            return Err(LookupError::InvalidJobId(job_id.to_string()));
        }

        let job_soql = format!(
            "SELECT Id, CreatedById, CreatedDate, CompletedDate \
             FROM AsyncApexJob WHERE Id = '{job_id}'"
        );
        let jobs: Vec<JobRecord> = self.client.query(&job_soql).await?;
        let Some(job) = jobs.into_iter().next() else {
            // The second query must not run with undefined window bounds.
            return Err(LookupError::JobNotFound(job_id.to_string()));
        };
        let Some(completed) = job.completed_date else {
            return Err(LookupError::JobNotFinished(job_id.to_string()));
        };

        // Datetime literals are unquoted in SOQL; both bounds inclusive.
        let log_soql = format!(
            "SELECT Id, StartTime, LogUserId, Operation, Status, LogLength, Request \
             FROM ApexLog WHERE LogUserId = '{}' \
             AND StartTime >= {} AND StartTime <= {} ORDER BY StartTime",
            job.created_by_id, job.created_date, completed
        );
        let logs: Vec<LogRecord> = self.client.query(&log_soql).await?;
        apex_info!("job {job_id}: {} log record(s) in window", logs.len());
        Ok(logs)
    }
}
