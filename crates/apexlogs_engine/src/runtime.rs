use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use apexlogs_logging::{apex_error, apex_warn};
use url::Url;

use crate::credential::{CredentialResolver, CredentialStore};
use crate::download::{DownloadResolver, ResolvedLink};
use crate::lookup::LogLookup;
use crate::query::{QueryError, ToolingClient, ToolingConfig};
use crate::store::LogStore;

enum LookupCommand {
    Resolve { key: String, job_id: String },
}

/// Outcome of one per-row lookup request. The error side is the
/// user-visible message rendered in that row's action cell.
#[derive(Debug)]
pub enum LookupEvent {
    Resolved {
        key: String,
        result: Result<Vec<ResolvedLink>, String>,
    },
}

/// Executes per-row lookup effects on a dedicated thread that owns a tokio
/// runtime. Requests for different rows run concurrently; results arrive
/// through `try_recv`.
pub struct LookupHandle {
    cmd_tx: mpsc::Sender<LookupCommand>,
    event_rx: mpsc::Receiver<LookupEvent>,
}

impl LookupHandle {
    pub fn new(
        origin: Url,
        store: Arc<dyn CredentialStore>,
        download_dir: PathBuf,
        config: ToolingConfig,
    ) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| QueryError::Network(err.to_string()))?;
        let credentials = CredentialResolver::new(store);
        let client = Arc::new(ToolingClient::new(
            http.clone(),
            origin.clone(),
            credentials.clone(),
            config.clone(),
        ));
        let resolver = Arc::new(DownloadResolver::new(
            http,
            origin,
            config.api_version,
            credentials,
            LogStore::new(download_dir),
        ));

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    apex_error!("lookup runtime failed to start: {err}");
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let client = Arc::clone(&client);
                let resolver = Arc::clone(&resolver);
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(&client, &resolver, command, event_tx).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    /// Queue one row's lookup.
    pub fn request(&self, key: impl Into<String>, job_id: impl Into<String>) {
        let _ = self.cmd_tx.send(LookupCommand::Resolve {
            key: key.into(),
            job_id: job_id.into(),
        });
    }

    pub fn try_recv(&self) -> Option<LookupEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    client: &ToolingClient,
    resolver: &DownloadResolver,
    command: LookupCommand,
    event_tx: mpsc::Sender<LookupEvent>,
) {
    match command {
        LookupCommand::Resolve { key, job_id } => {
            let result = match LogLookup::new(client).for_job(&job_id).await {
                Ok(records) => Ok(resolver.resolve_links(&records).await),
                Err(err) => {
                    apex_warn!("log lookup for job {job_id} failed: {err}");
                    Err(err.to_string())
                }
            };
            let _ = event_tx.send(LookupEvent::Resolved { key, result });
        }
    }
}
