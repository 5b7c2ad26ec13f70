//! Policy files: pre-seeding a run's severity policy from YAML.
//!
//! A policy file lets the operator soften, force, or silence kinds per run
//! without touching the registered checks:
//!
//! ```yaml
//! global:
//!   severity: informational   # report-only mode
//!   report_all: true
//! checks:
//!   legacy-runtime:
//!     enabled: false
//!   metadata:
//!     severity: warning
//!     kinds:
//!       invalid-id:
//!         severity: error
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::check::CheckSet;
use crate::context::SeverityPolicy;
use crate::errors::Result;
use crate::findings::Severity;

/// On-disk policy configuration.
#[derive(Debug, Default, Deserialize)]
pub struct PolicyFile {
    /// Defaults applied to every kind unless something narrower wins.
    #[serde(default)]
    pub global: GlobalPolicy,
    /// Per-check sections, keyed by check identity.
    #[serde(default)]
    pub checks: HashMap<String, CheckPolicy>,
}

/// Blanket settings for the whole run.
#[derive(Debug, Default, Deserialize)]
pub struct GlobalPolicy {
    /// Severity override for every kind, e.g. `informational` for a
    /// report-only dry run.
    pub severity: Option<Severity>,
    /// Announce clean results for every kind.
    #[serde(default)]
    pub report_all: bool,
}

/// Settings for one check.
#[derive(Debug, Default, Deserialize)]
pub struct CheckPolicy {
    /// Disable every kind of this check.
    pub enabled: Option<bool>,
    /// Severity override for every kind of this check.
    pub severity: Option<Severity>,
    /// Per-kind sections, keyed by kind name.
    #[serde(default)]
    pub kinds: HashMap<String, KindPolicy>,
}

/// Settings for one finding kind.
#[derive(Debug, Default, Deserialize)]
pub struct KindPolicy {
    /// Disable this kind.
    pub enabled: Option<bool>,
    /// Severity override for this kind.
    pub severity: Option<Severity>,
}

impl PolicyFile {
    /// Read and parse a policy file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml_ng::from_str(&content)?)
    }

    /// Seed a run-scoped policy for the given registered set.
    ///
    /// Walks the registered checks and their declared kinds, so every entry
    /// lands on a concrete `(check, kind)` pair. Narrower settings win:
    /// kind over check over global. Sections naming unregistered checks or
    /// undeclared kinds are ignored.
    #[must_use]
    pub fn seed(&self, checks: &CheckSet) -> SeverityPolicy {
        let mut policy = SeverityPolicy::new();
        policy.set_announce_all(self.global.report_all);

        for check in checks.iter() {
            let for_check = self.checks.get(check.id());
            for kind in check.kinds() {
                let for_kind = for_check.and_then(|c| c.kinds.get(kind.name));

                let enabled = for_kind
                    .and_then(|k| k.enabled)
                    .or_else(|| for_check.and_then(|c| c.enabled))
                    .unwrap_or(true);
                if !enabled {
                    policy.disable(check.id(), kind.name);
                    continue;
                }

                let severity = for_kind
                    .and_then(|k| k.severity)
                    .or_else(|| for_check.and_then(|c| c.severity))
                    .or(self.global.severity);
                if let Some(severity) = severity {
                    policy.set_severity(check.id(), kind.name, severity);
                }
            }
        }
        policy
    }
}
