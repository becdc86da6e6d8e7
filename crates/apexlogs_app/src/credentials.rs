use std::collections::BTreeMap;
use std::io::ErrorKind;

use apexlogs_engine::{Credential, CredentialStore};
use apexlogs_logging::{apex_debug, apex_warn};
use serde::Deserialize;

const TOKEN_FILE: &str = ".apexlogs_tokens.ron";
const TOKEN_ENV: &str = "SF_SESSION_TOKEN";

#[derive(Debug, Deserialize)]
struct TokenConfig {
    /// Session tokens keyed by host name.
    tokens: BTreeMap<String, String>,
}

/// Session tokens sourced from the environment and an optional RON file.
///
/// `SF_SESSION_TOKEN` applies to every origin and takes precedence over
/// per-host entries from `.apexlogs_tokens.ron`.
pub struct FileCredentialStore {
    env_token: Option<String>,
    tokens: BTreeMap<String, String>,
}

impl FileCredentialStore {
    pub fn load() -> Self {
        let tokens = match std::fs::read_to_string(TOKEN_FILE) {
            Ok(contents) => match ron::from_str::<TokenConfig>(&contents) {
                Ok(config) => config.tokens,
                Err(err) => {
                    apex_warn!("Ignoring malformed {TOKEN_FILE}: {err}");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                apex_warn!("Could not read {TOKEN_FILE}: {err}");
                BTreeMap::new()
            }
        };
        let env_token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
        if env_token.is_some() {
            apex_debug!("Using session token from {TOKEN_ENV}");
        }
        Self { env_token, tokens }
    }

    #[cfg(test)]
    fn from_parts(env_token: Option<String>, tokens: BTreeMap<String, String>) -> Self {
        Self { env_token, tokens }
    }
}

#[async_trait::async_trait]
impl CredentialStore for FileCredentialStore {
    async fn credential_for_origin(&self, origin: &url::Url) -> Option<Credential> {
        if let Some(token) = &self.env_token {
            return Some(Credential::new(token.clone()));
        }
        let host = origin.host_str()?;
        self.tokens.get(host).map(|t| Credential::new(t.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(url: &str) -> url::Url {
        url::Url::parse(url).unwrap()
    }

    #[test]
    fn token_file_parses() {
        let contents = r#"(tokens: {"acme.my.salesforce.com": "00Dsid"})"#;
        let config: TokenConfig = ron::from_str(contents).unwrap();
        assert_eq!(
            config.tokens.get("acme.my.salesforce.com").map(String::as_str),
            Some("00Dsid")
        );
    }

    #[tokio::test]
    async fn looks_up_by_host() {
        let mut tokens = BTreeMap::new();
        tokens.insert("acme.my.salesforce.com".to_string(), "file-sid".to_string());
        let store = FileCredentialStore::from_parts(None, tokens);

        let hit = store
            .credential_for_origin(&origin("https://acme.my.salesforce.com/"))
            .await;
        assert_eq!(hit.map(|c| c.as_str().to_string()), Some("file-sid".into()));

        let miss = store
            .credential_for_origin(&origin("https://other.example.com/"))
            .await;
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn environment_token_wins() {
        let mut tokens = BTreeMap::new();
        tokens.insert("acme.my.salesforce.com".to_string(), "file-sid".to_string());
        let store = FileCredentialStore::from_parts(Some("env-sid".to_string()), tokens);

        let hit = store
            .credential_for_origin(&origin("https://acme.my.salesforce.com/"))
            .await;
        assert_eq!(hit.map(|c| c.as_str().to_string()), Some("env-sid".into()));
    }
}
