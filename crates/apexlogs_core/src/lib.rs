//! Apexlogs core: pure table-augmentation state machine and view models.
mod effect;
mod jobid;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use jobid::{extract_job_id, parse_job_id, scan_for_job_id, JobId, JOB_ID_PREFIX};
pub use msg::{Msg, ScannedRow, TableScan};
pub use state::{LogLink, PageState, RowBinding, RowKey, TableShape};
pub use update::update;
pub use view_model::{ActionView, PageViewModel, RowView, ACTION_HEADER};
