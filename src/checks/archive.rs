//! Archive layout check: the extracted submission must hold exactly one
//! plugin root directory.

use std::path::PathBuf;

use crate::check::{shared, Check, SharedValue};
use crate::context::CheckCtx;
use crate::errors::CheckError;
use crate::findings::{FindingKind, Severity};
use crate::fs_util::is_regular_dir;

/// Identity of the archive layout check.
pub const ID: &str = "archive-layout";

pub const EMPTY_ARCHIVE: &str = "empty-archive";
pub const MULTIPLE_ENTRIES: &str = "multiple-entries";
pub const NO_ROOT_DIR: &str = "no-root-dir";
pub const LEGACY_DIST_DIR: &str = "legacy-dist-dir";

const KINDS: &[FindingKind] = &[
    FindingKind::new(EMPTY_ARCHIVE, Severity::Error),
    FindingKind::new(MULTIPLE_ENTRIES, Severity::Error),
    FindingKind::new(NO_ROOT_DIR, Severity::Error),
    FindingKind::new(LEGACY_DIST_DIR, Severity::Warning),
];

/// Validates the extracted archive layout and shares the effective plugin
/// root directory (`PathBuf`) with dependent checks.
pub struct ArchiveLayout;

impl Check for ArchiveLayout {
    fn id(&self) -> &'static str {
        ID
    }

    fn kinds(&self) -> &'static [FindingKind] {
        KINDS
    }

    fn run(&self, ctx: &mut CheckCtx<'_>) -> Result<Option<SharedValue>, CheckError> {
        let archive_dir = ctx.config().archive_dir.clone();
        let mut entries: Vec<PathBuf> = std::fs::read_dir(&archive_dir)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .collect();
        // Directory iteration order is filesystem-dependent.
        entries.sort();

        if entries.is_empty() {
            ctx.report(EMPTY_ARCHIVE, "Archive is empty", "");
            return Ok(None);
        }
        ctx.announce(EMPTY_ARCHIVE, "Archive is not empty");

        if entries.len() != 1 {
            ctx.report(
                MULTIPLE_ENTRIES,
                "Archive contains more than one entry",
                format!(
                    "The archive should contain a single directory named after \
                     the plugin id. Found {} entries.",
                    entries.len()
                ),
            );
            return Ok(None);
        }
        ctx.announce(MULTIPLE_ENTRIES, "Archive has a single entry");

        let root = entries.remove(0);
        if !is_regular_dir(&root) {
            ctx.report(
                NO_ROOT_DIR,
                "Archive does not contain a root directory",
                "The archive should contain a single root directory. Found a file instead.",
            );
            return Ok(None);
        }
        ctx.announce(NO_ROOT_DIR, "Archive contains a root directory");

        // Pre-release builds sometimes ship the bundler output directly.
        let legacy_root = root.join("dist");
        if is_regular_dir(&legacy_root) {
            ctx.report(
                LEGACY_DIST_DIR,
                "dist/ should be renamed to the plugin id and moved to the archive root",
                "",
            );
            return Ok(shared(legacy_root));
        }
        ctx.announce(LEGACY_DIST_DIR, "Archive has the expected content");

        Ok(shared(root))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::context::{RunConfig, RunContext};
    use crate::findings::Finding;

    fn run_against(archive_dir: &Path) -> (Vec<Finding>, Option<PathBuf>) {
        let config = RunConfig {
            archive_dir: archive_dir.to_path_buf(),
            ..RunConfig::default()
        };
        let mut ctx = RunContext::new(config);
        let result = ArchiveLayout.run(&mut ctx.view(&ArchiveLayout)).unwrap();
        let root = result
            .and_then(|value| value.downcast::<PathBuf>().ok())
            .map(|arc| arc.as_ref().clone());
        (ctx.findings, root)
    }

    fn archive_with_root(name: &str) -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let root = dir.path().join(name);
        fs::create_dir(&root).unwrap();
        (dir, root)
    }

    #[test]
    fn empty_archive_reported() {
        let dir = tempdir().unwrap();
        let (findings, root) = run_against(dir.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, EMPTY_ARCHIVE);
        assert_eq!(findings[0].severity, Severity::Error);
        assert!(root.is_none());
    }

    #[test]
    fn multiple_entries_reported() {
        let (dir, _root) = archive_with_root("my-plugin");
        fs::write(dir.path().join("stray.txt"), "x").unwrap();
        let (findings, root) = run_against(dir.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, MULTIPLE_ENTRIES);
        assert!(root.is_none());
    }

    #[test]
    fn file_instead_of_root_dir_reported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("my-plugin.js"), "x").unwrap();
        let (findings, root) = run_against(dir.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, NO_ROOT_DIR);
        assert!(root.is_none());
    }

    #[test]
    fn well_formed_archive_shares_root() {
        let (dir, root) = archive_with_root("my-plugin");
        let (findings, shared_root) = run_against(dir.path());
        assert!(findings.is_empty());
        assert_eq!(shared_root, Some(root));
    }

    #[test]
    fn legacy_dist_layout_warns_and_shares_dist() {
        let (dir, root) = archive_with_root("my-plugin");
        let dist = root.join("dist");
        fs::create_dir(&dist).unwrap();
        let (findings, shared_root) = run_against(dir.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, LEGACY_DIST_DIR);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(shared_root, Some(dist));
    }

    #[test]
    fn missing_archive_dir_is_a_hard_failure() {
        let config = RunConfig {
            archive_dir: PathBuf::from("/nonexistent/archive"),
            ..RunConfig::default()
        };
        let mut ctx = RunContext::new(config);
        assert!(ArchiveLayout.run(&mut ctx.view(&ArchiveLayout)).is_err());
    }

    #[test]
    fn report_all_announces_clean_layout() {
        let (dir, _root) = archive_with_root("my-plugin");
        let mut config = RunConfig {
            archive_dir: dir.path().to_path_buf(),
            ..RunConfig::default()
        };
        config.policy.set_announce_all(true);
        let mut ctx = RunContext::new(config);
        ArchiveLayout.run(&mut ctx.view(&ArchiveLayout)).unwrap();
        let kinds: Vec<_> = ctx.findings.iter().map(|f| f.kind.as_str()).collect();
        assert_eq!(
            kinds,
            [EMPTY_ARCHIVE, MULTIPLE_ENTRIES, NO_ROOT_DIR, LEGACY_DIST_DIR]
        );
        assert!(ctx
            .findings
            .iter()
            .all(|f| f.severity == Severity::Informational));
    }
}
