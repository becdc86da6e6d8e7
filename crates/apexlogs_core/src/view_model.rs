use crate::state::{LogLink, RowKey};

/// Header text of the appended action column.
pub const ACTION_HEADER: &str = "Logs";

/// What the action cell of one row shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionView {
    /// Placeholder for rows without an extractable job id.
    Unavailable,
    /// The on-demand fetch control.
    Fetch,
    /// Control disabled while the lookup runs.
    Loading,
    /// Resolved links, in ascending start-time order. Empty means the
    /// window held no (non-empty) logs.
    Links(Vec<LogLink>),
    /// User-visible failure message for this row only.
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub key: RowKey,
    pub cells: Vec<String>,
    pub action: ActionView,
}

/// Render model of the augmented table. Empty headers mean no jobs table is
/// currently visible.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageViewModel {
    pub headers: Vec<String>,
    pub rows: Vec<RowView>,
}
