use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};

/// One data row as seen in a single scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedRow {
    /// Content-derived identity, stable across re-scans of an unchanged
    /// row.
    pub key: String,
    pub cells: Vec<String>,
    /// Full rendered text of the row.
    pub text: String,
}

/// The located jobs table: normalized headers, the job-id column index and
/// the scanned data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableScan {
    pub headers: Vec<String>,
    pub job_id_column: usize,
    pub rows: Vec<ScannedRow>,
}

struct Selectors {
    table: Selector,
    header_row: Selector,
    data_row: Selector,
    tr: Selector,
    th: Selector,
    td: Selector,
}

impl Selectors {
    fn new() -> Option<Self> {
        Some(Self {
            table: Selector::parse("table").ok()?,
            header_row: Selector::parse("tr.headerRow").ok()?,
            data_row: Selector::parse("tr.dataRow").ok()?,
            tr: Selector::parse("tr").ok()?,
            th: Selector::parse("th").ok()?,
            td: Selector::parse("td").ok()?,
        })
    }
}

/// Locate the jobs table by header inspection: the first table with a
/// header cell reading "Apex Job ID" (case-insensitive, whitespace
/// tolerant) wins. Everything is re-derived per invocation; nothing about a
/// previous scan is assumed.
pub fn locate_jobs_table(html: &str) -> Option<TableScan> {
    let sel = Selectors::new()?;
    let document = Html::parse_document(html);

    for table in document.select(&sel.table) {
        // Header row markup varies across page versions: prefer the
        // classic class, fall back to the first row carrying th cells.
        let Some(header_row) = table.select(&sel.header_row).next().or_else(|| {
            table
                .select(&sel.tr)
                .find(|row| row.select(&sel.th).next().is_some())
        }) else {
            continue;
        };

        let headers: Vec<String> = header_row
            .select(&sel.th)
            .map(|th| normalize_text(&element_text(th)))
            .collect();
        if headers.is_empty() {
            continue;
        }
        let Some(job_id_column) = headers.iter().position(|h| is_job_id_header(h)) else {
            continue;
        };

        let rows = scan_data_rows(table, header_row, &sel);
        return Some(TableScan {
            headers,
            job_id_column,
            rows,
        });
    }
    None
}

fn scan_data_rows(table: ElementRef, header_row: ElementRef, sel: &Selectors) -> Vec<ScannedRow> {
    // Prefer explicitly marked data rows; fall back to any row with td
    // cells on markup that dropped the class.
    let mut rows: Vec<ElementRef> = table
        .select(&sel.data_row)
        .filter(|row| row.select(&sel.td).next().is_some())
        .collect();
    if rows.is_empty() {
        rows = table
            .select(&sel.tr)
            .filter(|row| row.id() != header_row.id())
            .filter(|row| row.select(&sel.td).next().is_some())
            .collect();
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    rows.into_iter()
        .map(|row| {
            let cells = row
                .select(&sel.td)
                .map(|td| normalize_text(&element_text(td)))
                .collect();
            let text = normalize_text(&element_text(row));
            let key = row_key(&text, &mut seen);
            ScannedRow { key, cells, text }
        })
        .collect()
}

fn element_text(element: ElementRef) -> String {
    element.text().collect()
}

/// Collapse whitespace runs and trim.
fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Header matcher tolerant of case and arbitrary internal whitespace.
fn is_job_id_header(text: &str) -> bool {
    let squeezed: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    squeezed.contains("apexjobid")
}

/// Content-derived identity: short hash of the row text, disambiguated when
/// several rows in one scan render identically.
fn row_key(text: &str, seen: &mut HashMap<String, usize>) -> String {
    let digest = short_hash(text);
    let occurrence = seen.entry(digest.clone()).or_insert(0);
    let key = if *occurrence == 0 {
        digest.clone()
    } else {
        format!("{digest}-{occurrence}")
    };
    *occurrence += 1;
    key
}

fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
