//! Command dispatch: wires page scans, the pure table state and the lookup
//! engine together.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use apexlogs_core::{update, Effect, Msg, PageState, RowKey};
use apexlogs_engine::{
    ensure_download_dir, locate_jobs_table, CredentialStore, LookupEvent, LookupHandle, PageEvent,
    PageSettings, PageWatcher, ToolingConfig,
};
use apexlogs_logging::{apex_info, apex_warn};
use url::Url;

use crate::cli::{Cli, Command};
use crate::credentials::FileCredentialStore;
use crate::render;

pub fn dispatch(args: Cli) -> anyhow::Result<()> {
    match args.command {
        Command::Scan { file } => scan_once(&file),
        Command::Watch {
            url,
            interval,
            auto_fetch,
            download_dir,
        } => watch(&url, interval, auto_fetch, download_dir),
        Command::Logs {
            job_id,
            origin,
            download_dir,
        } => fetch_job_logs(&job_id, &origin, download_dir),
    }
}

/// Scan a saved page snapshot once and print the augmented table. No network
/// access; rows with a job id show the fetch control.
fn scan_once(file: &Path) -> anyhow::Result<()> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("could not read {}", file.display()))?;
    let msg = scan_to_msg(locate_jobs_table(&html));
    let (state, _effects) = update(PageState::new(), msg);
    render::print_view(&state.view());
    Ok(())
}

/// Poll a live page and keep rendering the augmented table as it changes.
fn watch(url: &str, interval: u64, auto_fetch: bool, download_dir: PathBuf) -> anyhow::Result<()> {
    ensure_download_dir(&download_dir)?;
    let origin = page_origin(url)?;
    let store: Arc<dyn CredentialStore> = Arc::new(FileCredentialStore::load());
    let lookup = LookupHandle::new(
        origin,
        store,
        download_dir,
        ToolingConfig::default(),
    )?;
    let watcher = PageWatcher::poll(
        url,
        PageSettings::default(),
        Duration::from_secs(interval.max(1)),
    );
    apex_info!("watching {url} every {}s", interval.max(1));

    let mut state = PageState::new();
    loop {
        while let Some(event) = watcher.try_recv() {
            match event {
                PageEvent::Changed { html } => {
                    let msg = scan_to_msg(locate_jobs_table(&html));
                    state = apply(state, msg, &lookup);
                }
                PageEvent::FetchFailed { message } => {
                    apex_warn!("page poll failed: {message}");
                }
            }
        }
        while let Some(event) = lookup.try_recv() {
            let LookupEvent::Resolved { key, result } = event;
            let msg = Msg::LinksResolved {
                key: RowKey::new(key),
                result: result.map(|links| {
                    links
                        .into_iter()
                        .map(|l| apexlogs_core::LogLink {
                            label: l.label,
                            href: l.link.href(),
                        })
                        .collect()
                }),
            };
            state = apply(state, msg, &lookup);
        }
        if auto_fetch {
            let pending: Vec<RowKey> = state
                .view()
                .rows
                .into_iter()
                .filter(|row| row.action == apexlogs_core::ActionView::Fetch)
                .map(|row| row.key)
                .collect();
            for key in pending {
                state = apply(state, Msg::FetchRequested(key), &lookup);
            }
        }
        if state.consume_dirty() {
            render::print_view(&state.view());
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

/// Resolve and print download links for a single job id.
fn fetch_job_logs(job_id: &str, origin: &str, download_dir: PathBuf) -> anyhow::Result<()> {
    ensure_download_dir(&download_dir)?;
    let origin = Url::parse(origin).context("invalid origin URL")?;
    let store: Arc<dyn CredentialStore> = Arc::new(FileCredentialStore::load());
    let lookup = LookupHandle::new(origin, store, download_dir, ToolingConfig::default())?;
    lookup.request("cli", job_id);

    loop {
        if let Some(LookupEvent::Resolved { result, .. }) = lookup.try_recv() {
            let links = result.map_err(|message| anyhow::anyhow!(message))?;
            if links.is_empty() {
                println!("No logs found for {job_id}");
            }
            for link in links {
                println!("{} -> {}", link.label, link.link.href());
            }
            return Ok(());
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

/// Map one page scan outcome to the corresponding table message.
fn scan_to_msg(scan: Option<apexlogs_engine::TableScan>) -> Msg {
    match scan {
        Some(scan) => Msg::TableScanned(apexlogs_core::TableScan {
            headers: scan.headers,
            job_id_column: scan.job_id_column,
            rows: scan
                .rows
                .into_iter()
                .map(|row| apexlogs_core::ScannedRow {
                    key: RowKey::new(row.key),
                    cells: row.cells,
                    text: row.text,
                })
                .collect(),
        }),
        None => Msg::TableMissing,
    }
}

/// Apply one message and forward any resulting lookup effects to the engine.
fn apply(state: PageState, msg: Msg, lookup: &LookupHandle) -> PageState {
    let (state, effects) = update(state, msg);
    for effect in effects {
        let Effect::ResolveLogs { key, job_id } = effect;
        lookup.request(key.as_str(), job_id.as_str());
    }
    state
}

/// Root origin of the watched page, used for Tooling API requests and
/// credential resolution.
fn page_origin(url: &str) -> anyhow::Result<Url> {
    let parsed = Url::parse(url).context("invalid page URL")?;
    parsed.join("/").context("page URL has no origin")
}
