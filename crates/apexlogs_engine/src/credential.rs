use std::fmt;
use std::sync::Arc;

use apexlogs_logging::apex_debug;
use async_trait::async_trait;
use futures_util::stream::{FuturesUnordered, StreamExt};
use url::Url;

/// Opaque bearer token scoped to one origin. Never cached by the engine;
/// resolved fresh for every request that needs one.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tokens must not end up in logs.
        f.write_str("Credential(<redacted>)")
    }
}

/// Capability seam to the privileged credential store (a cookie jar, a
/// keychain, a test fixture). Absence is an expected outcome, not an error.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn credential_for_origin(&self, origin: &Url) -> Option<Credential>;
}

/// Bidirectional sibling-host rewrite: `*.lightning.force.com` ⇄
/// `*.my.salesforce.com`. Only variants that differ from the input are
/// returned.
pub fn sibling_origins(origin: &Url) -> Vec<Url> {
    let Some(host) = origin.host_str() else {
        return Vec::new();
    };
    let rewrites = [
        host.strip_suffix(".lightning.force.com")
            .map(|org| format!("{org}.my.salesforce.com")),
        host.strip_suffix(".my.salesforce.com")
            .map(|org| format!("{org}.lightning.force.com")),
    ];
    let mut variants = Vec::new();
    for rewritten in rewrites.into_iter().flatten() {
        let mut sibling = origin.clone();
        if sibling.set_host(Some(&rewritten)).is_ok() {
            variants.push(sibling);
        }
    }
    variants
}

/// Resolves a bearer credential for a page origin through a fallback chain:
/// the exact origin first, then all sibling-host variants concurrently.
#[derive(Clone)]
pub struct CredentialResolver {
    store: Arc<dyn CredentialStore>,
}

impl CredentialResolver {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// `None` means all variants are exhausted; callers proceed
    /// unauthenticated.
    pub async fn resolve(&self, origin: &Url) -> Option<Credential> {
        if let Some(found) = self.store.credential_for_origin(origin).await {
            return Some(found);
        }

        // Fan out over the sibling hosts; the first non-empty answer wins.
        let mut pending: FuturesUnordered<_> = sibling_origins(origin)
            .into_iter()
            .map(|variant| {
                let store = Arc::clone(&self.store);
                async move { store.credential_for_origin(&variant).await }
            })
            .collect();
        while let Some(outcome) = pending.next().await {
            if outcome.is_some() {
                return outcome;
            }
        }

        apex_debug!("no credential for {origin} or its sibling hosts");
        None
    }
}
