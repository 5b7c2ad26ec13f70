//! Dependency resolution over the registered check set.

use std::collections::HashMap;
use std::sync::Arc;

use crate::check::{Check, CheckSet};
use crate::errors::{PlugvetError, Result};

/// Visit state for the depth-first walk.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Compute an execution order in which every check appears strictly after
/// all checks it requires.
///
/// Fails closed on a dependency cycle (naming the identities forming it) and
/// on a requirement that is not registered. Resolution is pure: the same set
/// always yields the same order, so callers may resolve once and reuse it
/// for as long as the set is unchanged.
pub fn resolve(checks: &CheckSet) -> Result<Vec<Arc<dyn Check>>> {
    let mut marks: HashMap<&'static str, Mark> = HashMap::with_capacity(checks.len());
    let mut path: Vec<&'static str> = Vec::new();
    let mut order: Vec<Arc<dyn Check>> = Vec::with_capacity(checks.len());

    for check in checks.iter() {
        visit(check, checks, &mut marks, &mut path, &mut order)?;
    }
    Ok(order)
}

fn visit(
    check: &Arc<dyn Check>,
    set: &CheckSet,
    marks: &mut HashMap<&'static str, Mark>,
    path: &mut Vec<&'static str>,
    order: &mut Vec<Arc<dyn Check>>,
) -> Result<()> {
    match marks.get(check.id()) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => {
            // Revisited while in progress: the tail of the current path,
            // closed with the revisited identity, is the cycle.
            let start = path
                .iter()
                .position(|id| *id == check.id())
                .unwrap_or_default();
            let mut cycle: Vec<String> = path[start..].iter().map(ToString::to_string).collect();
            cycle.push(check.id().to_string());
            return Err(PlugvetError::Cycle(cycle));
        }
        None => {}
    }

    marks.insert(check.id(), Mark::InProgress);
    path.push(check.id());
    for dep_id in check.requires() {
        let dep = set
            .get(dep_id)
            .ok_or_else(|| PlugvetError::UnknownDependency {
                check: check.id().to_string(),
                requires: (*dep_id).to_string(),
            })?;
        visit(dep, set, marks, path, order)?;
    }
    path.pop();
    marks.insert(check.id(), Mark::Done);
    order.push(Arc::clone(check));
    Ok(())
}
