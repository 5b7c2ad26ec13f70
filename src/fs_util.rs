//! Symlink-safe filesystem helpers for archive scanning.
//!
//! Submission archives are untrusted input, so these helpers use
//! `symlink_metadata()` instead of `metadata()` and never follow symlinks.
//! A symlinked `plugin.json` or source directory reads as not-there rather
//! than as whatever it points at.

use std::path::Path;

/// Returns `true` if the path is a regular file (not a symlink).
#[must_use]
pub(crate) fn is_regular_file(path: &Path) -> bool {
    path.symlink_metadata()
        .map(|m| m.file_type().is_file())
        .unwrap_or(false)
}

/// Returns `true` if the path is a regular directory (not a symlink).
#[must_use]
pub(crate) fn is_regular_dir(path: &Path) -> bool {
    path.symlink_metadata()
        .map(|m| m.file_type().is_dir())
        .unwrap_or(false)
}
