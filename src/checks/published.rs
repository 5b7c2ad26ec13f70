//! Published-status check: ask the registry what it knows about this
//! plugin id.
//!
//! Registry unavailability is not a validation problem; it degrades to an
//! unknown status with zero findings so offline runs stay deterministic.

use std::sync::Arc;

use crate::check::{shared, Check, SharedValue};
use crate::checks::manifest::{self, PluginManifest};
use crate::context::CheckCtx;
use crate::errors::CheckError;
use crate::findings::{FindingKind, Severity};
use crate::net::{PluginStatus, RegistryClient};

/// Identity of the published-status check.
pub const ID: &str = "published-status";

pub const PUBLICATION_STATUS: &str = "publication-status";

const KINDS: &[FindingKind] = &[FindingKind::new(PUBLICATION_STATUS, Severity::Informational)];

/// Shares the registry's [`PluginStatus`] for the submitted id with
/// dependent checks, so they can soften rules for plugins that are already
/// live.
pub struct PublishedStatus {
    registry: Arc<dyn RegistryClient>,
}

impl PublishedStatus {
    /// Check backed by the given registry client.
    #[must_use]
    pub fn new(registry: Arc<dyn RegistryClient>) -> Self {
        Self { registry }
    }
}

impl Check for PublishedStatus {
    fn id(&self) -> &'static str {
        ID
    }

    fn requires(&self) -> &'static [&'static str] {
        &[manifest::ID]
    }

    fn kinds(&self) -> &'static [FindingKind] {
        KINDS
    }

    fn run(&self, ctx: &mut CheckCtx<'_>) -> Result<Option<SharedValue>, CheckError> {
        let Some(manifest) = ctx.dependency::<PluginManifest>(manifest::ID) else {
            return Ok(None);
        };
        let Some(plugin_id) = manifest.id.clone() else {
            return Ok(None);
        };
        if ctx.is_cancelled() {
            return Ok(None);
        }

        let status = match self.registry.status(&plugin_id) {
            Ok(status) => status,
            Err(err) => {
                tracing::debug!(plugin = %plugin_id, error = %err, "registry unavailable");
                PluginStatus::default()
            }
        };

        if status.is_published() {
            ctx.announce(
                PUBLICATION_STATUS,
                format!("Plugin `{plugin_id}` is already published"),
            );
        } else {
            ctx.announce(
                PUBLICATION_STATUS,
                format!("Plugin `{plugin_id}` is not in the registry"),
            );
        }

        Ok(shared(status))
    }
}
