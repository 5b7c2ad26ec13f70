//! Manifest check: locate and parse `plugin.json` under the plugin root.

use std::path::PathBuf;

use serde::Deserialize;

use crate::check::{shared, Check, SharedValue};
use crate::checks::archive;
use crate::context::CheckCtx;
use crate::errors::CheckError;
use crate::findings::{FindingKind, Severity};
use crate::fs_util::is_regular_file;

/// Identity of the manifest check.
pub const ID: &str = "manifest";

pub const MISSING_MANIFEST: &str = "missing-manifest";
pub const UNPARSEABLE_MANIFEST: &str = "unparseable-manifest";

const KINDS: &[FindingKind] = &[
    FindingKind::new(MISSING_MANIFEST, Severity::Error),
    FindingKind::new(UNPARSEABLE_MANIFEST, Severity::Error),
];

/// Author field: either a plain string or a detailed object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AuthorField {
    /// Plain string author (e.g. `"Jane Doe"`).
    Simple(String),
    /// Detailed author with name and optional URL.
    Detailed {
        /// Author name.
        name: String,
        /// Author URL.
        url: Option<String>,
    },
}

/// Parsed submission manifest from `plugin.json`.
///
/// Every field is optional at parse time; field-level requirements are the
/// metadata check's concern.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginManifest {
    /// Plugin id the submission claims.
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Submitted version.
    pub version: Option<String>,
    /// Short description.
    pub description: Option<String>,
    /// Author, string or object form.
    pub author: Option<AuthorField>,
    /// License identifier.
    pub license: Option<String>,
    /// Project homepage URL.
    pub homepage: Option<String>,
    /// Search keywords.
    pub keywords: Option<Vec<String>>,
}

/// Locates `plugin.json` in the plugin root and shares the parsed
/// [`PluginManifest`] with dependent checks.
pub struct Manifest;

impl Check for Manifest {
    fn id(&self) -> &'static str {
        ID
    }

    fn requires(&self) -> &'static [&'static str] {
        &[archive::ID]
    }

    fn kinds(&self) -> &'static [FindingKind] {
        KINDS
    }

    fn run(&self, ctx: &mut CheckCtx<'_>) -> Result<Option<SharedValue>, CheckError> {
        let Some(root) = ctx.dependency::<PathBuf>(archive::ID) else {
            return Ok(None);
        };

        let path = root.join("plugin.json");
        if !is_regular_file(&path) {
            ctx.report(
                MISSING_MANIFEST,
                "plugin.json not found in the plugin root",
                format!("Expected a manifest at `{}`.", path.display()),
            );
            return Ok(None);
        }
        ctx.announce(MISSING_MANIFEST, "plugin.json is present");

        let content = std::fs::read_to_string(&path)?;
        let manifest: PluginManifest = match serde_json::from_str(&content) {
            Ok(manifest) => manifest,
            Err(err) => {
                ctx.report(
                    UNPARSEABLE_MANIFEST,
                    "plugin.json is not valid JSON",
                    err.to_string(),
                );
                return Ok(None);
            }
        };
        ctx.announce(UNPARSEABLE_MANIFEST, "plugin.json parses");

        Ok(shared(manifest))
    }
}
