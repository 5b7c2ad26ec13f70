//! Severity-tagged findings emitted by checks during a validation run.
//!
//! A check declares up front which [`FindingKind`]s it may raise; the
//! effective severity of each emitted [`Finding`] is decided at emission
//! time by the run's severity policy, never by mutating the declaration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a finding, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    /// Neutral information, including "checked and clean" announcements.
    #[default]
    Informational,
    /// An improvement the submitter should consider.
    Recommendation,
    /// A problem that does not block the submission.
    Warning,
    /// A rule violation that blocks the submission.
    Error,
    /// A likely-serious problem that needs human review.
    SuspectedCritical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Informational => "informational",
            Severity::Recommendation => "recommendation",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::SuspectedCritical => "suspected-critical",
        };
        f.write_str(name)
    }
}

/// A named category of finding a check may raise.
///
/// Declarations are static and shared across runs; per-run softening or
/// forcing goes through the severity policy instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindingKind {
    /// Stable kind name, unique within the owning check.
    pub name: &'static str,
    /// Default severity when no policy override applies.
    pub severity: Severity,
    /// When `true`, the owning check also announces a clean result.
    pub announce: bool,
}

impl FindingKind {
    /// Kind with the given name and default severity.
    #[must_use]
    pub const fn new(name: &'static str, severity: Severity) -> Self {
        Self {
            name,
            severity,
            announce: false,
        }
    }

    /// Kind that announces a clean result even when nothing is wrong.
    #[must_use]
    pub const fn announced(name: &'static str, severity: Severity) -> Self {
        Self {
            name,
            severity,
            announce: true,
        }
    }
}

/// One emitted, severity-tagged observation produced by a check.
///
/// Immutable once appended; the final report preserves emission order.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// Identity of the emitting check.
    pub check: String,
    /// The finding kind raised.
    pub kind: String,
    /// Effective severity after any policy override.
    pub severity: Severity,
    /// Short human-readable description.
    pub title: String,
    /// Longer free-text explanation, possibly empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}/{})",
            self.severity, self.title, self.check, self.kind
        )
    }
}
