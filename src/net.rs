//! Plugin registry client used by the published-status check.
//!
//! Behind a trait so runs can stub the network; the `ureq` implementation
//! applies an agent-level timeout so a slow registry fails the lookup
//! instead of hanging the run.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default registry endpoint.
const DEFAULT_BASE_URL: &str = "https://registry.plugvet.dev/api/plugins";

/// Timeout applied to every lookup.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Publication state of a plugin id in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishState {
    /// Published and installable.
    Active,
    /// Published but deprecated.
    Deprecated,
    /// The registry has never seen this id.
    #[default]
    Unknown,
}

/// What the registry knows about a plugin id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginStatus {
    /// Publication state.
    #[serde(default)]
    pub status: PublishState,
    /// Latest published version, when known.
    #[serde(default)]
    pub version: Option<String>,
}

impl PluginStatus {
    /// `true` when the registry has seen this plugin before.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status != PublishState::Unknown
    }
}

/// A failed registry lookup.
///
/// Means "could not determine", never "unpublished"; callers decide how to
/// degrade.
#[derive(Error, Debug)]
#[error("registry lookup failed: {0}")]
pub struct RegistryError(pub String);

/// Read-side registry lookups.
pub trait RegistryClient: Send + Sync {
    /// Publication status for a plugin id.
    fn status(&self, plugin_id: &str) -> Result<PluginStatus, RegistryError>;
}

/// `ureq`-backed registry client.
pub struct HttpRegistryClient {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpRegistryClient {
    /// Client against the default registry endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against a non-default endpoint (mirrors, tests).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(LOOKUP_TIMEOUT))
            .build()
            .new_agent();
        Self {
            agent,
            base_url: base_url.into(),
        }
    }
}

impl Default for HttpRegistryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryClient for HttpRegistryClient {
    fn status(&self, plugin_id: &str) -> Result<PluginStatus, RegistryError> {
        let url = format!("{}/{plugin_id}/status", self.base_url);
        let mut response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| RegistryError(format!("GET {url}: {e}")))?;
        response
            .body_mut()
            .read_json::<PluginStatus>()
            .map_err(|e| RegistryError(format!("decoding {url}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_state_is_unpublished() {
        let status = PluginStatus::default();
        assert!(!status.is_published());
    }

    #[test]
    fn active_and_deprecated_are_published() {
        for state in [PublishState::Active, PublishState::Deprecated] {
            let status = PluginStatus {
                status: state,
                version: None,
            };
            assert!(status.is_published());
        }
    }

    #[test]
    fn status_deserializes_from_registry_payload() {
        let status: PluginStatus =
            serde_json::from_str(r#"{"status": "active", "version": "2.1.0"}"#).unwrap();
        assert_eq!(status.status, PublishState::Active);
        assert_eq!(status.version.as_deref(), Some("2.1.0"));
    }

    #[test]
    fn missing_fields_default_to_unknown() {
        let status: PluginStatus = serde_json::from_str("{}").unwrap();
        assert_eq!(status.status, PublishState::Unknown);
        assert!(status.version.is_none());
    }
}
