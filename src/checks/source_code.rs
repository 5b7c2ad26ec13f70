//! Source code check: resolve the optional source tree accompanying the
//! submission.

use std::path::PathBuf;

use crate::check::{shared, Check, SharedValue};
use crate::context::CheckCtx;
use crate::errors::CheckError;
use crate::findings::{FindingKind, Severity};
use crate::fs_util::is_regular_dir;

/// Identity of the source code check.
pub const ID: &str = "source-code";

pub const SOURCE_NOT_FOUND: &str = "source-not-found";

const KINDS: &[FindingKind] = &[FindingKind::new(SOURCE_NOT_FOUND, Severity::Error)];

/// Shares the submission's source tree (`PathBuf`) with dependent checks.
///
/// Source code is optional; when the run config carries no location,
/// dependents observe this check as absent and skip their source-level
/// rules.
pub struct SourceCode;

impl Check for SourceCode {
    fn id(&self) -> &'static str {
        ID
    }

    fn kinds(&self) -> &'static [FindingKind] {
        KINDS
    }

    fn run(&self, ctx: &mut CheckCtx<'_>) -> Result<Option<SharedValue>, CheckError> {
        let Some(source_dir) = ctx.config().source_dir.clone() else {
            return Ok(None);
        };

        if !is_regular_dir(&source_dir) {
            ctx.report(
                SOURCE_NOT_FOUND,
                "Provided source code location is not a directory",
                format!("`{}` does not exist or is not a directory.", source_dir.display()),
            );
            return Ok(None);
        }
        ctx.announce(SOURCE_NOT_FOUND, "Source code is available");

        Ok(shared(source_dir))
    }
}
