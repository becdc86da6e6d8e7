use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use apexlogs_logging::{apex_debug, apex_error, apex_warn};
use sha2::{Digest, Sha256};

use crate::page::{PageFetcher, PageSettings, ReqwestPageFetcher};

/// Notifications from the page poller. `Changed` is the poll-on-notify
/// analog of a DOM mutation event: it fires only when the page content
/// actually differs from the previous snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Changed { html: String },
    FetchFailed { message: String },
}

/// Polls a page URL on a fixed interval from a dedicated thread and emits
/// change events. A failed poll is reported and logged; the loop itself
/// never stops on errors.
pub struct PageWatcher {
    event_rx: mpsc::Receiver<PageEvent>,
}

impl PageWatcher {
    pub fn poll(url: impl Into<String>, settings: PageSettings, interval: Duration) -> Self {
        let url = url.into();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    apex_error!("page watcher runtime failed to start: {err}");
                    return;
                }
            };
            let fetcher = ReqwestPageFetcher::new(settings);
            let mut last_digest: Option<[u8; 32]> = None;

            runtime.block_on(async move {
                loop {
                    match fetcher.fetch(&url).await {
                        Ok(page) => {
                            let digest = content_digest(&page.html);
                            if last_digest != Some(digest) {
                                last_digest = Some(digest);
                                if event_tx.send(PageEvent::Changed { html: page.html }).is_err() {
                                    return;
                                }
                            } else {
                                apex_debug!("page unchanged, skipping scan");
                            }
                        }
                        Err(err) => {
                            apex_warn!("page fetch failed: {err}");
                            let event = PageEvent::FetchFailed {
                                message: err.to_string(),
                            };
                            if event_tx.send(event).is_err() {
                                return;
                            }
                        }
                    }
                    tokio::time::sleep(interval).await;
                }
            });
        });

        Self { event_rx }
    }

    pub fn try_recv(&self) -> Option<PageEvent> {
        self.event_rx.try_recv().ok()
    }
}

fn content_digest(html: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(html.as_bytes());
    hasher.finalize().into()
}
