use apexlogs_logging::{apex_debug, apex_warn};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::credential::CredentialResolver;

/// Tooling API version queried when none is configured.
pub const DEFAULT_API_VERSION: &str = "62.0";

#[derive(Debug, Clone)]
pub struct ToolingConfig {
    pub api_version: String,
}

impl Default for ToolingConfig {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Non-success response after the (single) credential retry.
    #[error("query rejected ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed query response: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct RecordSet<T> {
    #[serde(default)]
    records: Vec<T>,
}

/// Client for the versioned REST tooling query endpoint rooted at one page
/// origin.
///
/// Queries are user-triggered, on-demand actions: there is no request
/// timeout and no retry policy beyond the single credential retry.
pub struct ToolingClient {
    http: reqwest::Client,
    origin: Url,
    api_version: String,
    credentials: CredentialResolver,
}

impl ToolingClient {
    pub fn new(
        http: reqwest::Client,
        origin: Url,
        credentials: CredentialResolver,
        config: ToolingConfig,
    ) -> Self {
        Self {
            http,
            origin,
            api_version: config.api_version,
            credentials,
        }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    fn query_url(&self, soql: &str) -> Url {
        let mut url = self.origin.clone();
        url.set_path(&format!(
            "/services/data/v{}/tooling/query",
            self.api_version
        ));
        url.query_pairs_mut().clear().append_pair("q", soql);
        url
    }

    /// Issue one structured query and return its record list (empty when
    /// the result set has none).
    ///
    /// The first attempt rides on the ambient session. A 401/403 triggers
    /// one credential resolution and exactly one retry with a bearer
    /// header; any other non-success, or a second rejection, is terminal.
    pub async fn query<T: DeserializeOwned>(&self, soql: &str) -> Result<Vec<T>, QueryError> {
        let url = self.query_url(soql);
        apex_debug!("tooling query: {soql}");

        let mut response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|err| QueryError::Network(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            if let Some(credential) = self.credentials.resolve(&self.origin).await {
                apex_debug!("ambient session rejected ({status}), retrying with bearer credential");
                response = self
                    .http
                    .get(url)
                    .bearer_auth(credential.as_str())
                    .send()
                    .await
                    .map_err(|err| QueryError::Network(err.to_string()))?;
            }
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            apex_warn!("tooling query rejected: {status} {body}");
            return Err(QueryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| QueryError::Network(err.to_string()))?;
        let set: RecordSet<T> = serde_json::from_slice(&bytes)
            .map_err(|err| QueryError::Malformed(err.to_string()))?;
        Ok(set.records)
    }
}
