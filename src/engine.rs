//! Execution engine: a memoized, failure-contained walk of the resolved
//! check order.

use crate::check::CheckSet;
use crate::context::{CheckOutcome, RunConfig, RunContext};
use crate::errors::Result;
use crate::findings::{Finding, Severity};
use crate::graph;

/// One contained check failure, kept apart from validation findings.
///
/// Failures are diagnostics about the validator itself, not about the
/// submission; rendering layers usually show them separately.
#[derive(Debug, Clone)]
pub struct CheckFailure {
    /// Identity of the failing check.
    pub check: String,
    /// What its behavior reported.
    pub error: String,
}

/// Outcome of one validation run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Findings in emission order. Not deduplicated, sorted, or filtered;
    /// that is a rendering concern.
    pub findings: Vec<Finding>,
    /// Checks whose behavior failed, with the recorded reason.
    pub failures: Vec<CheckFailure>,
}

impl RunReport {
    /// Highest severity across all findings, if any were emitted.
    #[must_use]
    pub fn max_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }

    /// `true` when any finding is `Error` or worse.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.max_severity() >= Some(Severity::Error)
    }
}

/// Schedules registered checks over fresh run contexts.
///
/// The registered set is read-only once the runner is built; all mutable
/// state is scoped to a single `validate` call.
pub struct Runner {
    checks: CheckSet,
}

impl Runner {
    /// Runner over the given registered set.
    #[must_use]
    pub fn new(checks: CheckSet) -> Self {
        Self { checks }
    }

    /// The registered set.
    #[must_use]
    pub fn checks(&self) -> &CheckSet {
        &self.checks
    }

    /// Validate one submission.
    ///
    /// Returns `Err` only for configuration errors (dependency cycle,
    /// unknown requirement) detected before any check runs. Check failures
    /// are contained: the failing identity is recorded in the report and
    /// every unrelated branch of the graph still executes. Dependents of a
    /// failed check observe it as absent and decide locally how to degrade.
    pub fn validate(&self, config: RunConfig) -> Result<RunReport> {
        let order = graph::resolve(&self.checks)?;
        let mut ctx = RunContext::new(config);

        for check in &order {
            let id = check.id();
            // The resolved order lists each check once, but the store is
            // still the source of truth for exactly-once execution.
            if ctx.store.contains(id) {
                continue;
            }
            if ctx.config.cancel.is_cancelled() {
                tracing::debug!(check = id, "run cancelled, not scheduling");
                ctx.store.record(id, CheckOutcome::Cancelled);
                continue;
            }

            tracing::debug!(check = id, "running");
            let result = check.run(&mut ctx.view(check.as_ref()));
            let outcome = match result {
                Ok(value) => CheckOutcome::Completed(value),
                Err(err) => {
                    tracing::debug!(check = id, error = %err, "check failed");
                    CheckOutcome::Failed(err)
                }
            };
            ctx.store.record(id, outcome);
        }

        let failures = order
            .iter()
            .filter_map(|check| match ctx.store.outcome(check.id()) {
                Some(CheckOutcome::Failed(err)) => Some(CheckFailure {
                    check: check.id().to_string(),
                    error: err.to_string(),
                }),
                _ => None,
            })
            .collect();

        Ok(RunReport {
            findings: ctx.findings,
            failures,
        })
    }
}
