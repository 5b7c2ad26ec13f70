//! Check registration: the descriptor trait and the registered set.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::context::CheckCtx;
use crate::errors::{CheckError, PlugvetError, Result};
use crate::findings::FindingKind;

/// Type-erased value shared between checks through the result store.
///
/// Dependents retrieve it with [`CheckCtx::dependency`], which downcasts to
/// the expected type; a mismatch reads as absent, never as a crash.
pub type SharedValue = Arc<dyn Any + Send + Sync>;

/// Wrap a value for the result store.
///
/// Sugar for the common tail of a check's behavior: `Ok(shared(root))`.
pub fn shared<T: Any + Send + Sync>(value: T) -> Option<SharedValue> {
    Some(Arc::new(value))
}

/// One independently registered validation unit.
///
/// Implementations are read-only after registration and may be shared across
/// runs; all per-run state lives in the run context handed to [`Check::run`].
pub trait Check: Send + Sync {
    /// Stable, unique identity.
    fn id(&self) -> &'static str;

    /// Identities of the checks whose results this check reads.
    ///
    /// The engine guarantees every listed identity has reached a terminal
    /// state before this check is invoked. Reads of identities not listed
    /// here observe absent.
    fn requires(&self) -> &'static [&'static str] {
        &[]
    }

    /// Finding kinds this check may raise.
    fn kinds(&self) -> &'static [FindingKind];

    /// Execute against the current run.
    ///
    /// `Ok(Some(..))` shares a value with dependents, `Ok(None)` completes
    /// without one (dependents observe it as absent), and `Err` is a hard
    /// failure recorded and contained by the engine.
    fn run(&self, ctx: &mut CheckCtx<'_>) -> std::result::Result<Option<SharedValue>, CheckError>;
}

/// The full registered set of checks, in registration order.
#[derive(Default)]
pub struct CheckSet {
    checks: Vec<Arc<dyn Check>>,
    index: HashMap<&'static str, usize>,
}

impl CheckSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check.
    ///
    /// Identities must be unique across the set.
    pub fn register(&mut self, check: Arc<dyn Check>) -> Result<()> {
        let id = check.id();
        if self.index.contains_key(id) {
            return Err(PlugvetError::DuplicateIdentity(id.to_string()));
        }
        self.index.insert(id, self.checks.len());
        self.checks.push(check);
        Ok(())
    }

    /// Look up a check by identity.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Check>> {
        self.index.get(id).map(|&i| &self.checks[i])
    }

    /// Number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// `true` when no checks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Iterate in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Check>> {
        self.checks.iter()
    }
}
