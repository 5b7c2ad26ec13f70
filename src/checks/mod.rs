//! Built-in submission checks.
//!
//! Each check is a thin consumer of the scheduler core: it declares its
//! requirements and finding kinds, reads dependency results through its run
//! view, and emits findings. The core never learns about their file formats
//! or wire protocols.

pub mod archive;
pub mod legacy_runtime;
pub mod manifest;
pub mod metadata;
pub mod package_json;
pub mod published;
pub mod source_code;
pub mod version;

use std::sync::Arc;

use crate::check::CheckSet;
use crate::errors::Result;
use crate::net::RegistryClient;

/// Register the full built-in check set against the given registry client.
pub fn builtin_checks(registry: Arc<dyn RegistryClient>) -> Result<CheckSet> {
    let mut set = CheckSet::new();
    set.register(Arc::new(archive::ArchiveLayout))?;
    set.register(Arc::new(manifest::Manifest))?;
    set.register(Arc::new(metadata::Metadata))?;
    set.register(Arc::new(source_code::SourceCode))?;
    set.register(Arc::new(package_json::PackageJson))?;
    set.register(Arc::new(version::VersionMatch))?;
    set.register(Arc::new(published::PublishedStatus::new(registry)))?;
    set.register(Arc::new(legacy_runtime::LegacyRuntime))?;
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph;
    use crate::net::{PluginStatus, RegistryError};

    struct NoRegistry;

    impl RegistryClient for NoRegistry {
        fn status(&self, _plugin_id: &str) -> std::result::Result<PluginStatus, RegistryError> {
            Err(RegistryError("offline".to_string()))
        }
    }

    #[test]
    fn builtin_set_registers_without_collisions() {
        let set = builtin_checks(Arc::new(NoRegistry)).unwrap();
        assert_eq!(set.len(), 8);
    }

    #[test]
    fn builtin_set_resolves() {
        let set = builtin_checks(Arc::new(NoRegistry)).unwrap();
        let order = graph::resolve(&set).unwrap();
        assert_eq!(order.len(), 8);
    }
}
