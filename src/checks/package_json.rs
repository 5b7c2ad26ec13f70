//! Package metadata check: parse `package.json` from the source tree.

use std::path::PathBuf;

use serde::Deserialize;

use crate::check::{shared, Check, SharedValue};
use crate::checks::source_code;
use crate::context::CheckCtx;
use crate::errors::CheckError;
use crate::findings::{FindingKind, Severity};
use crate::fs_util::is_regular_file;

/// Identity of the package metadata check.
pub const ID: &str = "package-json";

pub const MISSING_PACKAGE_JSON: &str = "missing-package-json";
pub const UNPARSEABLE_PACKAGE_JSON: &str = "unparseable-package-json";

const KINDS: &[FindingKind] = &[
    FindingKind::new(MISSING_PACKAGE_JSON, Severity::Warning),
    FindingKind::new(UNPARSEABLE_PACKAGE_JSON, Severity::Error),
];

/// The slice of `package.json` the validator cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageMetadata {
    /// Package name.
    pub name: Option<String>,
    /// Declared version.
    pub version: Option<String>,
}

/// Parses `package.json` from the source tree and shares the
/// [`PackageMetadata`] with dependent checks.
pub struct PackageJson;

impl Check for PackageJson {
    fn id(&self) -> &'static str {
        ID
    }

    fn requires(&self) -> &'static [&'static str] {
        &[source_code::ID]
    }

    fn kinds(&self) -> &'static [FindingKind] {
        KINDS
    }

    fn run(&self, ctx: &mut CheckCtx<'_>) -> Result<Option<SharedValue>, CheckError> {
        let Some(source_dir) = ctx.dependency::<PathBuf>(source_code::ID) else {
            return Ok(None);
        };

        let path = source_dir.join("package.json");
        if !is_regular_file(&path) {
            ctx.report(
                MISSING_PACKAGE_JSON,
                "package.json not found in the source tree",
                format!("Expected `{}`.", path.display()),
            );
            return Ok(None);
        }
        ctx.announce(MISSING_PACKAGE_JSON, "package.json is present");

        let content = std::fs::read_to_string(&path)?;
        let metadata: PackageMetadata = match serde_json::from_str(&content) {
            Ok(metadata) => metadata,
            Err(err) => {
                ctx.report(
                    UNPARSEABLE_PACKAGE_JSON,
                    "package.json is not valid JSON",
                    err.to_string(),
                );
                return Ok(None);
            }
        };
        ctx.announce(UNPARSEABLE_PACKAGE_JSON, "package.json parses");

        Ok(shared(metadata))
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

    fn source_tree(package_json: Option<&str>) -> TempDir {
        let dir = tempdir().unwrap();
        if let Some(content) = package_json {
            fs::write(dir.path().join("package.json"), content).unwrap();
        }
        dir
    }

    fn run_with_source(source_dir: &Path) -> (Vec<Finding>, Option<PackageMetadata>) {
        let mut ctx = RunContext::new(RunConfig::default());
        ctx.store.record(
            source_code::ID,
            CheckOutcome::Completed(shared(source_dir.to_path_buf())),
        );
        let result = PackageJson.run(&mut ctx.view(&PackageJson)).unwrap();
        let metadata = result
            .and_then(|value| value.downcast::<PackageMetadata>().ok())
            .map(|arc| arc.as_ref().clone());
        (ctx.findings, metadata)
    }

    #[test]
    fn absent_source_skips_quietly() {
        let mut ctx = RunContext::new(RunConfig::default());
        let result = PackageJson.run(&mut ctx.view(&PackageJson)).unwrap();
        assert!(result.is_none());
        assert!(ctx.findings.is_empty());
    }

    #[test]
    fn missing_package_json_warns() {
        let dir = source_tree(None);
        let (findings, metadata) = run_with_source(dir.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, MISSING_PACKAGE_JSON);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(metadata.is_none());
    }

    #[test]
    fn malformed_package_json_reported() {
        let dir = source_tree(Some("{ nope"));
        let (findings, metadata) = run_with_source(dir.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, UNPARSEABLE_PACKAGE_JSON);
        assert!(metadata.is_none());
    }

    #[test]
    fn valid_package_json_is_shared() {
        let dir = source_tree(Some(r#"{ "name": "my-plugin", "version": "1.2.3" }"#));
        let (findings, metadata) = run_with_source(dir.path());
        assert!(findings.is_empty());
        let metadata = metadata.unwrap();
        assert_eq!(metadata.name.as_deref(), Some("my-plugin"));
        assert_eq!(metadata.version.as_deref(), Some("1.2.3"));
    }
}
