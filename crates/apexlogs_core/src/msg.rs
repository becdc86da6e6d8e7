use crate::state::{LogLink, RowKey};

/// One data row as delivered by a page scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedRow {
    pub key: RowKey,
    pub cells: Vec<String>,
    /// Full rendered text of the row, for fallback id extraction.
    pub text: String,
}

/// Outcome of locating the jobs table in one page snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableScan {
    pub headers: Vec<String>,
    pub job_id_column: usize,
    pub rows: Vec<ScannedRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A fresh page scan located the jobs table.
    TableScanned(TableScan),
    /// A fresh page scan found no matching table.
    TableMissing,
    /// The user asked for the logs of one row.
    FetchRequested(RowKey),
    /// Link resolution for one row finished.
    LinksResolved {
        key: RowKey,
        result: Result<Vec<LogLink>, String>,
    },
}
