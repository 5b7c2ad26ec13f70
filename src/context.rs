//! Per-run state: configuration, the result store, the findings sink, and
//! the severity policy.
//!
//! A [`RunContext`] is created fresh for every validation run and owned by
//! that run alone. Checks never see the whole context; the engine hands each
//! invocation a [`CheckCtx`] view that attributes findings to the executing
//! check and limits dependency reads to what the check declared.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::check::{Check, SharedValue};
use crate::errors::CheckError;
use crate::findings::{Finding, FindingKind, Severity};

/// Cooperative cancellation flag shared between a run and its caller.
///
/// Cloning hands out another handle to the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Fresh, unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation: no further checks are scheduled, and checks
    /// with external calls in flight are expected to observe the flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Immutable inputs for one validation run.
#[derive(Clone, Debug, Default)]
pub struct RunConfig {
    /// Directory holding the extracted submission archive.
    pub archive_dir: PathBuf,
    /// Optional plugin source tree accompanying the submission.
    pub source_dir: Option<PathBuf>,
    /// Pre-seeded severity policy for this run.
    pub policy: SeverityPolicy,
    /// Cancellation flag for this run.
    pub cancel: CancelFlag,
}

/// Run-scoped override table consulted at emission time.
///
/// Overrides are keyed by `(check identity, kind name)`. The table never
/// touches the static [`FindingKind`] declarations, so nothing leaks from
/// one run into the next.
#[derive(Clone, Debug, Default)]
pub struct SeverityPolicy {
    severities: HashMap<String, HashMap<String, Severity>>,
    disabled: HashMap<String, HashSet<String>>,
    announce: HashMap<String, HashMap<String, bool>>,
    announce_all: bool,
}

impl SeverityPolicy {
    /// Empty policy: every kind keeps its declared default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the severity of `(check, kind)` for this run.
    pub fn set_severity(&mut self, check: &str, kind: &str, severity: Severity) {
        self.severities
            .entry(check.to_string())
            .or_default()
            .insert(kind.to_string(), severity);
    }

    /// Suppress emission of `(check, kind)` for this run.
    pub fn disable(&mut self, check: &str, kind: &str) {
        self.disabled
            .entry(check.to_string())
            .or_default()
            .insert(kind.to_string());
    }

    /// Force or suppress the always-announce behavior of `(check, kind)`.
    pub fn set_announce(&mut self, check: &str, kind: &str, announce: bool) {
        self.announce
            .entry(check.to_string())
            .or_default()
            .insert(kind.to_string(), announce);
    }

    /// Announce clean results for every kind (report-all mode).
    pub fn set_announce_all(&mut self, announce_all: bool) {
        self.announce_all = announce_all;
    }

    /// Effective severity for a kind: the override if one exists, else the
    /// kind's declared default.
    #[must_use]
    pub fn severity_for(&self, check: &str, kind: &FindingKind) -> Severity {
        self.severities
            .get(check)
            .and_then(|kinds| kinds.get(kind.name))
            .copied()
            .unwrap_or(kind.severity)
    }

    /// `true` when `(check, kind)` must not emit this run.
    #[must_use]
    pub fn is_disabled(&self, check: &str, kind: &str) -> bool {
        self.disabled
            .get(check)
            .is_some_and(|kinds| kinds.contains(kind))
    }

    /// `true` when a clean result of this kind should still be announced.
    #[must_use]
    pub fn announces(&self, check: &str, kind: &FindingKind) -> bool {
        self.announce
            .get(check)
            .and_then(|kinds| kinds.get(kind.name))
            .copied()
            .unwrap_or(self.announce_all || kind.announce)
    }
}

/// Terminal state of one check within a run.
pub enum CheckOutcome {
    /// Behavior completed; holds the value shared with dependents, if any.
    Completed(Option<SharedValue>),
    /// Behavior returned a hard failure.
    Failed(CheckError),
    /// The run was cancelled before this check was scheduled.
    Cancelled,
}

impl fmt::Debug for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Completed(Some(_)) => f.write_str("Completed(value)"),
            CheckOutcome::Completed(None) => f.write_str("Completed"),
            CheckOutcome::Failed(err) => write!(f, "Failed({err})"),
            CheckOutcome::Cancelled => f.write_str("Cancelled"),
        }
    }
}

/// Write-once mapping from check identity to its outcome.
#[derive(Debug, Default)]
pub struct ResultStore {
    entries: HashMap<&'static str, CheckOutcome>,
}

impl ResultStore {
    /// Record an outcome. The first write for an identity wins; an outcome
    /// never changes once set.
    pub(crate) fn record(&mut self, id: &'static str, outcome: CheckOutcome) {
        self.entries.entry(id).or_insert(outcome);
    }

    /// `true` when the identity has reached a terminal state.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Raw outcome for an identity, if it has one.
    #[must_use]
    pub fn outcome(&self, id: &str) -> Option<&CheckOutcome> {
        self.entries.get(id)
    }

    /// Typed view of a completed check's shared value.
    ///
    /// Missing entries, failures, cancelled checks, value-less completions,
    /// and type mismatches all read as `None`.
    #[must_use]
    pub fn value<T: Any + Send + Sync>(&self, id: &str) -> Option<Arc<T>> {
        match self.entries.get(id)? {
            CheckOutcome::Completed(Some(value)) => Arc::clone(value).downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Number of recorded outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The per-invocation mutable state shared by all checks in one run.
///
/// Never shared across runs; the engine creates one per `validate` call and
/// drains it into the final report.
pub struct RunContext {
    pub(crate) config: RunConfig,
    pub(crate) store: ResultStore,
    pub(crate) findings: Vec<Finding>,
    pub(crate) policy: SeverityPolicy,
}

impl RunContext {
    pub(crate) fn new(config: RunConfig) -> Self {
        let policy = config.policy.clone();
        Self {
            config,
            store: ResultStore::default(),
            findings: Vec::new(),
            policy,
        }
    }

    /// View for one check invocation.
    pub(crate) fn view(&mut self, check: &dyn Check) -> CheckCtx<'_> {
        CheckCtx {
            check_id: check.id(),
            requires: check.requires(),
            kinds: check.kinds(),
            config: &self.config,
            store: &self.store,
            findings: &mut self.findings,
            policy: &mut self.policy,
        }
    }
}

/// The view of the run handed to a single check while it executes.
///
/// This is the only route to the finding sink, so every finding is
/// attributed to the executing check by construction, and the emission
/// primitives are unreachable outside the check's own execution window.
pub struct CheckCtx<'run> {
    check_id: &'static str,
    requires: &'static [&'static str],
    kinds: &'static [FindingKind],
    config: &'run RunConfig,
    store: &'run ResultStore,
    findings: &'run mut Vec<Finding>,
    policy: &'run mut SeverityPolicy,
}

impl CheckCtx<'_> {
    /// Identity of the executing check.
    #[must_use]
    pub fn check_id(&self) -> &'static str {
        self.check_id
    }

    /// Immutable run configuration.
    #[must_use]
    pub fn config(&self) -> &RunConfig {
        self.config
    }

    /// `true` once the run has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.config.cancel.is_cancelled()
    }

    /// Typed result of a declared dependency.
    ///
    /// Absence covers every non-usable state: the dependency failed, was
    /// cancelled, completed without a value, produced a value of another
    /// type, or was never declared by this check in the first place.
    #[must_use]
    pub fn dependency<T: Any + Send + Sync>(&self, id: &str) -> Option<Arc<T>> {
        if !self.requires.iter().any(|declared| *declared == id) {
            tracing::warn!(
                check = self.check_id,
                dependency = id,
                "read of undeclared dependency"
            );
            return None;
        }
        self.store.value::<T>(id)
    }

    /// Record a finding for one of this check's declared kinds.
    ///
    /// The severity policy is consulted at emission time: an override for
    /// `(check, kind)` replaces the declared default, and a disabled pair
    /// emits nothing.
    pub fn report(&mut self, kind: &str, title: impl Into<String>, detail: impl Into<String>) {
        let Some(declared) = self.kind(kind) else {
            tracing::warn!(check = self.check_id, kind, "report for undeclared kind");
            debug_assert!(false, "check `{}` reported undeclared kind `{kind}`", self.check_id);
            return;
        };
        if self.policy.is_disabled(self.check_id, kind) {
            tracing::debug!(check = self.check_id, kind, "kind disabled, not reporting");
            return;
        }
        self.findings.push(Finding {
            check: self.check_id.to_string(),
            kind: declared.name.to_string(),
            severity: self.policy.severity_for(self.check_id, declared),
            title: title.into(),
            detail: detail.into(),
        });
    }

    /// Record an informational "checked and clean" finding when the kind is
    /// in always-announce mode for this run; otherwise a no-op.
    ///
    /// Lets consumers distinguish "checked and clean" from "never checked".
    pub fn announce(&mut self, kind: &str, title: impl Into<String>) {
        let Some(declared) = self.kind(kind) else {
            tracing::warn!(check = self.check_id, kind, "announce for undeclared kind");
            debug_assert!(false, "check `{}` announced undeclared kind `{kind}`", self.check_id);
            return;
        };
        if !self.policy.announces(self.check_id, declared)
            || self.policy.is_disabled(self.check_id, kind)
        {
            return;
        }
        self.findings.push(Finding {
            check: self.check_id.to_string(),
            kind: declared.name.to_string(),
            severity: Severity::Informational,
            title: title.into(),
            detail: String::new(),
        });
    }

    /// Override the effective severity of one of this check's own kinds for
    /// the rest of the current run.
    ///
    /// This is how context discovered at run time softens or forces a
    /// finding without touching the static declaration.
    pub fn set_severity(&mut self, kind: &str, severity: Severity) {
        if self.kind(kind).is_none() {
            tracing::warn!(check = self.check_id, kind, "override for undeclared kind");
            debug_assert!(false, "check `{}` overrode undeclared kind `{kind}`", self.check_id);
            return;
        }
        self.policy.set_severity(self.check_id, kind, severity);
    }

    fn kind(&self, name: &str) -> Option<&'static FindingKind> {
        self.kinds.iter().find(|kind| kind.name == name)
    }
}
