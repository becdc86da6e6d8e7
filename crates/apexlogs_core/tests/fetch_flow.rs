use apexlogs_core::{
    update, ActionView, Effect, LogLink, Msg, PageState, RowKey, ScannedRow, TableScan,
};

fn single_row_scan() -> TableScan {
    TableScan {
        headers: vec!["Apex Job ID".into()],
        job_id_column: 0,
        rows: vec![ScannedRow {
            key: RowKey::new("r1"),
            cells: vec!["707xx0000004CisAAI".into()],
            text: "707xx0000004CisAAI".into(),
        }],
    }
}

fn ready_state() -> PageState {
    apexlogs_logging::initialize_for_tests();
    let (state, _) = update(PageState::new(), Msg::TableScanned(single_row_scan()));
    state
}

fn links() -> Vec<LogLink> {
    vec![
        LogLink {
            label: "Apex (1.2 KB)".into(),
            href: "logs/07L1.log".into(),
        },
        LogLink {
            label: "Batch (3.4 KB)".into(),
            href: "logs/07L2.log".into(),
        },
    ]
}

#[test]
fn fetch_request_disables_the_control_and_emits_one_effect() {
    let (state, effects) = update(ready_state(), Msg::FetchRequested(RowKey::new("r1")));
    assert_eq!(effects.len(), 1);
    match &effects[0] {
        Effect::ResolveLogs { key, job_id } => {
            assert_eq!(key, &RowKey::new("r1"));
            assert_eq!(job_id.as_str(), "707xx0000004CisAAI");
        }
    }
    assert_eq!(state.view().rows[0].action, ActionView::Loading);

    // The control is disabled: a second request while in flight is ignored.
    let (_, effects) = update(state, Msg::FetchRequested(RowKey::new("r1")));
    assert!(effects.is_empty());
}

#[test]
fn fetch_request_for_unknown_or_unavailable_rows_is_ignored() {
    let (_, effects) = update(ready_state(), Msg::FetchRequested(RowKey::new("nope")));
    assert!(effects.is_empty());
}

#[test]
fn resolved_links_render_and_the_flow_is_terminal() {
    let (state, _) = update(ready_state(), Msg::FetchRequested(RowKey::new("r1")));
    let (state, effects) = update(
        state,
        Msg::LinksResolved {
            key: RowKey::new("r1"),
            result: Ok(links()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().rows[0].action, ActionView::Links(links()));

    // Terminal: neither a new fetch nor a late result changes the row.
    let (state, effects) = update(state, Msg::FetchRequested(RowKey::new("r1")));
    assert!(effects.is_empty());
    let (state, _) = update(
        state,
        Msg::LinksResolved {
            key: RowKey::new("r1"),
            result: Err("late".into()),
        },
    );
    assert_eq!(state.view().rows[0].action, ActionView::Links(links()));
}

#[test]
fn lookup_failure_surfaces_on_the_row_only() {
    let (state, _) = update(ready_state(), Msg::FetchRequested(RowKey::new("r1")));
    let (state, _) = update(
        state,
        Msg::LinksResolved {
            key: RowKey::new("r1"),
            result: Err("Query failed (500): boom".into()),
        },
    );
    assert_eq!(
        state.view().rows[0].action,
        ActionView::Error("Query failed (500): boom".into())
    );
}

#[test]
fn empty_link_list_renders_as_no_logs() {
    let (state, _) = update(ready_state(), Msg::FetchRequested(RowKey::new("r1")));
    let (state, _) = update(
        state,
        Msg::LinksResolved {
            key: RowKey::new("r1"),
            result: Ok(Vec::new()),
        },
    );
    assert_eq!(state.view().rows[0].action, ActionView::Links(Vec::new()));
}

#[test]
fn results_for_unsolicited_rows_are_dropped() {
    let (state, _) = update(ready_state(), Msg::TableMissing);
    let (state, _) = update(
        state,
        Msg::LinksResolved {
            key: RowKey::new("r1"),
            result: Ok(links()),
        },
    );
    // r1 was never moved to Fetching, so the result must not render.
    let (state, _) = update(state, Msg::TableScanned(single_row_scan()));
    assert_eq!(state.view().rows[0].action, ActionView::Fetch);
}
