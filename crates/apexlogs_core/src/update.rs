use crate::jobid::extract_job_id;
use crate::state::{PageState, RowBinding, TableShape};
use crate::{Effect, Msg, TableScan};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PageState, msg: Msg) -> (PageState, Vec<Effect>) {
    let effects = match msg {
        Msg::TableScanned(scan) => {
            apply_scan(&mut state, scan);
            Vec::new()
        }
        Msg::TableMissing => {
            // Bindings persist: a row that reappears unchanged must not be
            // augmented a second time.
            state.set_table(None);
            state.set_visible(Vec::new());
            Vec::new()
        }
        Msg::FetchRequested(key) => match state.binding(&key).cloned() {
            Some(RowBinding::Ready(job_id)) => {
                state.set_binding(key.clone(), RowBinding::Fetching(job_id.clone()));
                vec![Effect::ResolveLogs { key, job_id }]
            }
            // Unavailable, in-flight, rendered and failed rows all ignore
            // further requests.
            _ => Vec::new(),
        },
        Msg::LinksResolved { key, result } => {
            if matches!(state.binding(&key), Some(RowBinding::Fetching(_))) {
                let next = match result {
                    Ok(links) => RowBinding::Rendered(links),
                    Err(message) => RowBinding::Failed(message),
                };
                state.set_binding(key, next);
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn apply_scan(state: &mut PageState, scan: TableScan) {
    let column = scan.job_id_column;
    state.set_table(Some(TableShape {
        headers: scan.headers,
        job_id_column: column,
    }));

    let mut visible = Vec::with_capacity(scan.rows.len());
    for row in scan.rows {
        if state.binding(&row.key).is_none() {
            let cell = row.cells.get(column).map(String::as_str);
            let binding = match extract_job_id(cell, &row.text) {
                Some(job_id) => RowBinding::Ready(job_id),
                None => RowBinding::Unavailable,
            };
            state.bind_row(row.key.clone(), binding);
        }
        visible.push((row.key, row.cells));
    }
    state.set_visible(visible);
}
