use std::fmt;

/// Key prefix shared by all async job identifiers.
pub const JOB_ID_PREFIX: &str = "707";

const MIN_SUFFIX: usize = 12;
const MAX_SUFFIX: usize = 18;

/// A validated async job identifier: the fixed prefix followed by
/// 12 to 18 alphanumeric characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a job id anchored at the start of a (trimmed) cell value.
pub fn parse_job_id(cell: &str) -> Option<JobId> {
    let rest = cell.trim().strip_prefix(JOB_ID_PREFIX)?;
    take_id(rest)
}

/// Scan free text for the first embedded job id token. Covers the case
/// where the id cell is empty but the id is rendered inside a link.
pub fn scan_for_job_id(text: &str) -> Option<JobId> {
    let mut from = 0;
    while let Some(pos) = text[from..].find(JOB_ID_PREFIX) {
        let begin = from + pos;
        let rest = &text[begin + JOB_ID_PREFIX.len()..];
        if let Some(id) = take_id(rest) {
            return Some(id);
        }
        from = begin + JOB_ID_PREFIX.len();
    }
    None
}

/// Cell-first extraction with a free-text fallback.
pub fn extract_job_id(cell: Option<&str>, row_text: &str) -> Option<JobId> {
    cell.and_then(parse_job_id)
        .or_else(|| scan_for_job_id(row_text))
}

fn take_id(rest: &str) -> Option<JobId> {
    let run = rest
        .bytes()
        .take_while(u8::is_ascii_alphanumeric)
        .count();
    if run < MIN_SUFFIX {
        return None;
    }
    let take = run.min(MAX_SUFFIX);
    Some(JobId(format!("{JOB_ID_PREFIX}{}", &rest[..take])))
}
