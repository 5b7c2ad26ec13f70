//! Metadata check: field-level validation of the parsed manifest.

use std::sync::LazyLock;

use regex::Regex;

use crate::check::{Check, SharedValue};
use crate::checks::manifest::{self, PluginManifest};
use crate::context::CheckCtx;
use crate::errors::CheckError;
use crate::findings::{FindingKind, Severity};

/// Identity of the metadata check.
pub const ID: &str = "metadata";

pub const INVALID_ID: &str = "invalid-id";
pub const INVALID_VERSION: &str = "invalid-version";
pub const MISSING_DESCRIPTION: &str = "missing-description";
pub const MISSING_RECOMMENDED_FIELD: &str = "missing-recommended-field";

const KINDS: &[FindingKind] = &[
    FindingKind::new(INVALID_ID, Severity::Error),
    FindingKind::new(INVALID_VERSION, Severity::Error),
    FindingKind::new(MISSING_DESCRIPTION, Severity::Warning),
    FindingKind::new(MISSING_RECOMMENDED_FIELD, Severity::Recommendation),
];

/// Regex for valid plugin ids: lowercase kebab-case.
static PLUGIN_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("plugin id regex"));

/// Regex for semver: x.y.z (no pre-release/build metadata).
static SEMVER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("semver regex"));

/// Optional fields worth a nudge when absent.
fn recommended_fields(manifest: &PluginManifest) -> [(&'static str, bool, &'static str); 3] {
    [
        (
            "author",
            manifest.author.is_some(),
            "Add an author field for attribution",
        ),
        (
            "license",
            manifest.license.is_some(),
            "Add a license field for legal clarity",
        ),
        (
            "homepage",
            manifest.homepage.is_some(),
            "Add a homepage URL for documentation",
        ),
    ]
}

/// Validates the manifest's fields: id format, version format, description
/// presence, and recommended metadata.
pub struct Metadata;

impl Check for Metadata {
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

        match manifest.id.as_deref() {
            None => {
                ctx.report(INVALID_ID, "Missing required field `id`", "");
            }
            Some(id) if !PLUGIN_ID_RE.is_match(id) => {
                ctx.report(
                    INVALID_ID,
                    format!("Plugin id `{id}` is not valid kebab-case"),
                    "Use lowercase letters, digits, and hyphens (e.g. \"my-plugin\").",
                );
            }
            Some(_) => ctx.announce(INVALID_ID, "Plugin id is valid"),
        }

        match manifest.version.as_deref() {
            None => {
                ctx.report(INVALID_VERSION, "Missing required field `version`", "");
            }
            Some(version) if !SEMVER_RE.is_match(version) => {
                ctx.report(
                    INVALID_VERSION,
                    format!("Version `{version}` is not valid semver"),
                    "Use x.y.z format (e.g. \"1.0.0\").",
                );
            }
            Some(_) => ctx.announce(INVALID_VERSION, "Version is valid semver"),
        }

        match manifest.description.as_deref() {
            None => {
                ctx.report(MISSING_DESCRIPTION, "Missing `description` field", "");
            }
            Some(description) if description.trim().is_empty() => {
                ctx.report(MISSING_DESCRIPTION, "`description` is empty", "");
            }
            Some(_) => ctx.announce(MISSING_DESCRIPTION, "Description is present"),
        }

        let mut recommended_clean = true;
        for (field, present, suggestion) in recommended_fields(&manifest) {
            if !present {
                recommended_clean = false;
                ctx.report(
                    MISSING_RECOMMENDED_FIELD,
                    format!("Missing recommended field `{field}`"),
                    suggestion,
                );
            }
        }
        if recommended_clean {
            ctx.announce(MISSING_RECOMMENDED_FIELD, "All recommended fields present");
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::shared;
    use crate::checks::manifest::AuthorField;
    use crate::context::{CheckOutcome, RunConfig, RunContext};
    use crate::findings::Finding;

    fn run_with(manifest: PluginManifest) -> Vec<Finding> {
        let mut ctx = RunContext::new(RunConfig::default());
        ctx.store
            .record(manifest::ID, CheckOutcome::Completed(shared(manifest)));
        Metadata.run(&mut ctx.view(&Metadata)).unwrap();
        ctx.findings
    }

    fn full_manifest() -> PluginManifest {
        PluginManifest {
            id: Some("my-plugin".to_string()),
            name: Some("My Plugin".to_string()),
            version: Some("1.0.0".to_string()),
            description: Some("Does things".to_string()),
            author: Some(AuthorField::Simple("Jane".to_string())),
            license: Some("Apache-2.0".to_string()),
            homepage: Some("https://example.com".to_string()),
            keywords: None,
        }
    }

    #[test]
    fn absent_manifest_skips_quietly() {
        let mut ctx = RunContext::new(RunConfig::default());
        let result = Metadata.run(&mut ctx.view(&Metadata)).unwrap();
        assert!(result.is_none());
        assert!(ctx.findings.is_empty());
    }

    #[test]
    fn complete_manifest_is_clean() {
        assert!(run_with(full_manifest()).is_empty());
    }

    #[test]
    fn missing_id_reported() {
        let manifest = PluginManifest {
            id: None,
            ..full_manifest()
        };
        let findings = run_with(manifest);
        assert!(findings.iter().any(|f| f.kind == INVALID_ID));
    }

    #[test]
    fn uppercase_id_reported() {
        let manifest = PluginManifest {
            id: Some("MyPlugin".to_string()),
            ..full_manifest()
        };
        let findings = run_with(manifest);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, INVALID_ID);
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn short_version_reported() {
        let manifest = PluginManifest {
            version: Some("1.0".to_string()),
            ..full_manifest()
        };
        let findings = run_with(manifest);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, INVALID_VERSION);
    }

    #[test]
    fn empty_description_reported_as_warning() {
        let manifest = PluginManifest {
            description: Some("   ".to_string()),
            ..full_manifest()
        };
        let findings = run_with(manifest);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, MISSING_DESCRIPTION);
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn missing_recommended_fields_are_recommendations() {
        let manifest = PluginManifest {
            author: None,
            license: None,
            homepage: None,
            ..full_manifest()
        };
        let findings = run_with(manifest);
        assert_eq!(findings.len(), 3);
        assert!(findings
            .iter()
            .all(|f| f.kind == MISSING_RECOMMENDED_FIELD
                && f.severity == Severity::Recommendation));
    }

    #[test]
    fn bare_manifest_reports_every_field_group() {
        let findings = run_with(PluginManifest::default());
        let kinds: Vec<_> = findings.iter().map(|f| f.kind.as_str()).collect();
        assert!(kinds.contains(&INVALID_ID));
        assert!(kinds.contains(&INVALID_VERSION));
        assert!(kinds.contains(&MISSING_DESCRIPTION));
        assert!(kinds.contains(&MISSING_RECOMMENDED_FIELD));
    }
}
