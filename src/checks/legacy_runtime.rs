//! Legacy runtime check: scan the bundled `module.js` for use of the
//! retired plugin platform.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::check::{Check, SharedValue};
use crate::checks::{archive, published};
use crate::context::CheckCtx;
use crate::errors::CheckError;
use crate::findings::{FindingKind, Severity};
use crate::fs_util::is_regular_file;
use crate::net::PluginStatus;

/// Identity of the legacy runtime check.
pub const ID: &str = "legacy-runtime";

pub const LEGACY_API: &str = "legacy-api";

const KINDS: &[FindingKind] = &[FindingKind::new(LEGACY_API, Severity::Error)];

/// Literal markers of the retired runtime.
const LEGACY_MARKERS: &[&str] = &[
    "PanelCtrl",
    "MetricsPanelCtrl",
    "QueryCtrl",
    "app/plugins/sdk",
    "angular.module(",
];

/// Exported controller classes from the retired runtime.
static LEGACY_EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+(?:class|function)\s+\w*Ctrl\b").expect("legacy export regex")
});

/// Flags bundles built against the retired plugin runtime.
///
/// Already-published plugins get a migration grace period: the check softens
/// its own kind to Warning through the run's policy table before emitting.
pub struct LegacyRuntime;

impl Check for LegacyRuntime {
    fn id(&self) -> &'static str {
        ID
    }

    fn requires(&self) -> &'static [&'static str] {
        &[archive::ID, published::ID]
    }

    fn kinds(&self) -> &'static [FindingKind] {
        KINDS
    }

    fn run(&self, ctx: &mut CheckCtx<'_>) -> Result<Option<SharedValue>, CheckError> {
        let Some(root) = ctx.dependency::<PathBuf>(archive::ID) else {
            return Ok(None);
        };
        let module = root.join("module.js");
        if !is_regular_file(&module) {
            return Ok(None);
        }
        let bytes = std::fs::read(&module)?;
        let content = String::from_utf8_lossy(&bytes);

        // Published plugins are still migrating off the old runtime; don't
        // block their updates over it.
        if let Some(status) = ctx.dependency::<PluginStatus>(published::ID) {
            if status.is_published() {
                ctx.set_severity(LEGACY_API, Severity::Warning);
            }
        }

        let detected = LEGACY_MARKERS
            .iter()
            .find(|marker| content.contains(*marker))
            .map(ToString::to_string)
            .or_else(|| {
                LEGACY_EXPORT_RE
                    .find(&content)
                    .map(|m| m.as_str().to_string())
            });

        if let Some(pattern) = detected {
            ctx.report(
                LEGACY_API,
                "module.js uses the deprecated plugin runtime",
                format!(
                    "Detected usage of `{pattern}`. Migrate the plugin to the \
                     current runtime before submission."
                ),
            );
        } else {
            ctx.announce(LEGACY_API, "module.js does not use the deprecated runtime");
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::check::shared;
    use crate::context::{CheckOutcome, RunConfig, RunContext};
    use crate::findings::Finding;
    use crate::net::PublishState;

    fn plugin_root(module_js: Option<&str>) -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let root = dir.path().join("my-plugin");
        fs::create_dir(&root).unwrap();
        if let Some(content) = module_js {
            fs::write(root.join("module.js"), content).unwrap();
        }
        (dir, root)
    }

    fn run_with(root: &Path, status: Option<PluginStatus>) -> Vec<Finding> {
        let mut ctx = RunContext::new(RunConfig::default());
        ctx.store.record(
            archive::ID,
            CheckOutcome::Completed(shared(root.to_path_buf())),
        );
        if let Some(status) = status {
            ctx.store
                .record(published::ID, CheckOutcome::Completed(shared(status)));
        }
        LegacyRuntime.run(&mut ctx.view(&LegacyRuntime)).unwrap();
        ctx.findings
    }

    #[test]
    fn missing_module_js_is_silent() {
        let (_dir, root) = plugin_root(None);
        assert!(run_with(&root, None).is_empty());
    }

    #[test]
    fn modern_bundle_is_clean() {
        let (_dir, root) = plugin_root(Some("export const plugin = new PanelPlugin();"));
        assert!(run_with(&root, None).is_empty());
    }

    #[test]
    fn legacy_marker_reported_as_error() {
        let (_dir, root) = plugin_root(Some("import { PanelCtrl } from 'app/plugins/sdk';"));
        let findings = run_with(&root, None);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, LEGACY_API);
        assert_eq!(findings[0].severity, Severity::Error);
        assert!(findings[0].detail.contains("PanelCtrl"));
    }

    #[test]
    fn legacy_export_pattern_detected() {
        let (_dir, root) = plugin_root(Some("export class EditorCtrl {}"));
        let findings = run_with(&root, None);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, LEGACY_API);
    }

    #[test]
    fn published_plugin_is_softened_to_warning() {
        let (_dir, root) = plugin_root(Some("angular.module('myPlugin', []);"));
        let status = PluginStatus {
            status: PublishState::Active,
            version: Some("1.0.0".to_string()),
        };
        let findings = run_with(&root, Some(status));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn unknown_publication_keeps_error_severity() {
        let (_dir, root) = plugin_root(Some("angular.module('myPlugin', []);"));
        let findings = run_with(&root, Some(PluginStatus::default()));
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn absent_root_skips_quietly() {
        let mut ctx = RunContext::new(RunConfig::default());
        let result = LegacyRuntime.run(&mut ctx.view(&LegacyRuntime)).unwrap();
        assert!(result.is_none());
        assert!(ctx.findings.is_empty());
    }
}
