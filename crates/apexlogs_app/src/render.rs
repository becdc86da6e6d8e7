//! Terminal rendering of the augmented jobs table.

use apexlogs_core::{ActionView, PageViewModel};
use chrono::Local;

/// Print the current table state, one row per line, with the action column
/// rendered as text.
pub fn print_view(view: &PageViewModel) {
    if view.headers.is_empty() {
        println!("[{}] no jobs table on page", timestamp());
        return;
    }
    println!("[{}] {}", timestamp(), view.headers.join(" | "));
    for row in &view.rows {
        let mut cells = row.cells.clone();
        cells.push(action_text(&row.action));
        println!("  {}", cells.join(" | "));
    }
}

fn action_text(action: &ActionView) -> String {
    match action {
        ActionView::Unavailable => "—".to_string(),
        ActionView::Fetch => "[fetch logs]".to_string(),
        ActionView::Loading => "loading…".to_string(),
        ActionView::Links(links) if links.is_empty() => "No logs found".to_string(),
        ActionView::Links(links) => links
            .iter()
            .map(|link| format!("{} -> {}", link.label, link.href))
            .collect::<Vec<_>>()
            .join("; "),
        ActionView::Error(message) => format!("error: {message}"),
    }
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}
