use crate::{JobId, RowKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the two-step log lookup and resolve download links for one row.
    ResolveLogs { key: RowKey, job_id: JobId },
}
