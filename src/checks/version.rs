//! Version consistency check: the manifest and `package.json` must agree.

use crate::check::{Check, SharedValue};
use crate::checks::manifest::{self, PluginManifest};
use crate::checks::package_json::{self, PackageMetadata};
use crate::context::CheckCtx;
use crate::errors::CheckError;
use crate::findings::{FindingKind, Severity};

/// Identity of the version consistency check.
pub const ID: &str = "version-match";

pub const VERSION_MISMATCH: &str = "version-mismatch";

const KINDS: &[FindingKind] = &[FindingKind::new(VERSION_MISMATCH, Severity::Error)];

/// Strip a leading `v` so `v1.2.3` and `1.2.3` compare equal.
fn canonical(version: &str) -> &str {
    version.trim().trim_start_matches('v')
}

/// Compares the submitted manifest version against the version the source
/// tree was built from.
pub struct VersionMatch;

impl Check for VersionMatch {
    fn id(&self) -> &'static str {
        ID
    }

    fn requires(&self) -> &'static [&'static str] {
        &[manifest::ID, package_json::ID]
    }

    fn kinds(&self) -> &'static [FindingKind] {
        KINDS
    }

    fn run(&self, ctx: &mut CheckCtx<'_>) -> Result<Option<SharedValue>, CheckError> {
        let Some(manifest) = ctx.dependency::<PluginManifest>(manifest::ID) else {
            return Ok(None);
        };
        let Some(package) = ctx.dependency::<PackageMetadata>(package_json::ID) else {
            return Ok(None);
        };
        let (Some(submitted), Some(built)) =
            (manifest.version.as_deref(), package.version.as_deref())
        else {
            return Ok(None);
        };

        if canonical(submitted) != canonical(built) {
            ctx.report(
                VERSION_MISMATCH,
                "plugin.json version does not match package.json",
                format!("plugin.json declares `{submitted}`, package.json declares `{built}`."),
            );
        } else {
            ctx.announce(VERSION_MISMATCH, "Versions match");
        }

        Ok(None)
    }
}
