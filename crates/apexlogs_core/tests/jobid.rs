use apexlogs_core::{extract_job_id, parse_job_id, scan_for_job_id};

#[test]
fn parses_well_formed_cell_values() {
    let id = parse_job_id("707xx0000004CisAAI").unwrap();
    assert_eq!(id.as_str(), "707xx0000004CisAAI");

    // Surrounding whitespace is a rendering artifact, not part of the id.
    let id = parse_job_id("  707xx0000004Cis  ").unwrap();
    assert_eq!(id.as_str(), "707xx0000004Cis");
}

#[test]
fn rejects_malformed_cell_values() {
    assert!(parse_job_id("").is_none());
    assert!(parse_job_id("—").is_none());
    // Wrong prefix.
    assert!(parse_job_id("005xx0000004CisAAI").is_none());
    // Suffix too short.
    assert!(parse_job_id("707abc123").is_none());
    // Id must be anchored at the start of the cell.
    assert!(parse_job_id("see 707xx0000004CisAAI").is_none());
}

#[test]
fn suffix_is_capped_at_eighteen_characters() {
    let id = parse_job_id("707aaaaaaaaaaaaaaaaaazzz").unwrap();
    assert_eq!(id.as_str().len(), 3 + 18);
}

#[test]
fn scans_ids_embedded_in_row_text() {
    let text = "Completed | | Batch Apex | 707abc123456789012 | 2024-01-01";
    let id = scan_for_job_id(text).unwrap();
    assert_eq!(id.as_str(), "707abc123456789012");
}

#[test]
fn scan_skips_short_prefix_hits() {
    // The first "707" run is too short; the real id comes later.
    let text = "rows: 707 of 9000, id 707xx0000004CisAAI done";
    let id = scan_for_job_id(text).unwrap();
    assert_eq!(id.as_str(), "707xx0000004CisAAI");
}

#[test]
fn extraction_prefers_the_cell_and_falls_back_to_text() {
    let from_cell = extract_job_id(Some("707xx0000004CisAAI"), "unrelated");
    assert_eq!(from_cell.unwrap().as_str(), "707xx0000004CisAAI");

    // Empty cell, id only present in the row's rendered text.
    let from_text = extract_job_id(Some(""), "details 707abc123456789012 link");
    assert_eq!(from_text.unwrap().as_str(), "707abc123456789012");

    assert!(extract_job_id(None, "no id in here").is_none());
}
