use std::path::PathBuf;

use apexlogs_logging::apex_debug;
use url::Url;

use crate::credential::{Credential, CredentialResolver};
use crate::store::{LogStore, StoreError};
use crate::types::LogRecord;

/// Where one log's content can be retrieved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadLink {
    /// Body fetched over the authenticated REST route and saved locally.
    Saved(PathBuf),
    /// Browser-navigable console route on the my-domain sibling host;
    /// relies on the ambient session and may fail at click time.
    Console(Url),
}

impl DownloadLink {
    pub fn href(&self) -> String {
        match self {
            DownloadLink::Saved(path) => path.display().to_string(),
            DownloadLink::Console(url) => url.to_string(),
        }
    }
}

/// A labeled, ready-to-render link for one log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub log_id: String,
    pub label: String,
    pub link: DownloadLink,
}

/// Rewrite a lightning origin to its my-domain sibling. Other hosts are
/// returned unchanged.
pub fn my_domain_origin(origin: &Url) -> Url {
    let Some(host) = origin.host_str() else {
        return origin.clone();
    };
    let Some(org) = host.strip_suffix(".lightning.force.com") else {
        return origin.clone();
    };
    let mut rewritten = origin.clone();
    match rewritten.set_host(Some(&format!("{org}.my.salesforce.com"))) {
        Ok(()) => rewritten,
        Err(_) => origin.clone(),
    }
}

/// Console download route for one log id on the my-domain sibling.
pub fn console_download_url(origin: &Url, log_id: &str) -> Url {
    let mut url = my_domain_origin(origin);
    url.set_path("/_ui/system/api/console/apexLogDownload.apexp");
    url.query_pairs_mut().clear().append_pair("id", log_id);
    url
}

/// Human-readable size, matching the page's own B/KB/MB convention.
pub fn format_bytes(n: u64) -> String {
    if n < 1024 {
        format!("{n} B")
    } else if n < 1024 * 1024 {
        format!("{:.1} KB", n as f64 / 1024.0)
    } else {
        format!("{:.1} MB", n as f64 / (1024.0 * 1024.0))
    }
}

/// Link text for one record: operation label plus size.
pub fn link_label(record: &LogRecord) -> String {
    let operation = record
        .operation
        .as_deref()
        .filter(|op| !op.is_empty())
        .unwrap_or("Apex");
    format!("{operation} ({})", format_bytes(record.log_length))
}

#[derive(Debug, thiserror::Error)]
enum BodyFetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {0}")]
    Status(u16),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves a working retrieval URL per log record: authenticated body
/// fetch saved to disk when possible, console route otherwise.
pub struct DownloadResolver {
    http: reqwest::Client,
    origin: Url,
    api_version: String,
    credentials: CredentialResolver,
    store: LogStore,
}

impl DownloadResolver {
    pub fn new(
        http: reqwest::Client,
        origin: Url,
        api_version: impl Into<String>,
        credentials: CredentialResolver,
        store: LogStore,
    ) -> Self {
        Self {
            http,
            origin,
            api_version: api_version.into(),
            credentials,
            store,
        }
    }

    /// Resolve a link for one record. Records with an empty body yield
    /// `None`: there is nothing to download.
    pub async fn resolve(&self, record: &LogRecord) -> Option<DownloadLink> {
        if record.log_length == 0 {
            return None;
        }
        if let Some(credential) = self.credentials.resolve(&self.origin).await {
            match self.fetch_body(&record.id, &credential).await {
                Ok(path) => return Some(DownloadLink::Saved(path)),
                Err(err) => {
                    apex_debug!("body fetch for {} failed, using console route: {err}", record.id);
                }
            }
        }
        Some(DownloadLink::Console(console_download_url(
            &self.origin,
            &record.id,
        )))
    }

    /// Resolve labeled links for an ordered record set, preserving order
    /// and skipping empty logs.
    pub async fn resolve_links(&self, records: &[LogRecord]) -> Vec<ResolvedLink> {
        let mut links = Vec::with_capacity(records.len());
        for record in records {
            if let Some(link) = self.resolve(record).await {
                links.push(ResolvedLink {
                    log_id: record.id.clone(),
                    label: link_label(record),
                    link,
                });
            }
        }
        links
    }

    async fn fetch_body(
        &self,
        log_id: &str,
        credential: &Credential,
    ) -> Result<PathBuf, BodyFetchError> {
        let mut url = self.origin.clone();
        url.set_path(&format!(
            "/services/data/v{}/tooling/sobjects/ApexLog/{log_id}/Body",
            self.api_version
        ));
        let response = self
            .http
            .get(url)
            .bearer_auth(credential.as_str())
            .send()
            .await
            .map_err(|err| BodyFetchError::Network(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(BodyFetchError::Status(status.as_u16()));
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| BodyFetchError::Network(err.to_string()))?;
        Ok(self.store.save(log_id, &body)?)
    }
}
