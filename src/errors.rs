use thiserror::Error;

/// Errors that abort a validation run before any check executes.
///
/// Everything else that can go wrong during a run is contained per check and
/// reported through [`RunReport::failures`](crate::engine::RunReport).
#[derive(Error, Debug)]
pub enum PlugvetError {
    /// The registered checks form a dependency cycle.
    #[error("dependency cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    /// A check requires an identity that is not registered.
    #[error("check `{check}` requires unknown check `{requires}`")]
    UnknownDependency {
        /// The check declaring the requirement.
        check: String,
        /// The identity it asked for.
        requires: String,
    },

    /// Two checks registered under the same identity.
    #[error("duplicate check identity `{0}`")]
    DuplicateIdentity(String),

    /// Filesystem I/O error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Policy file could not be parsed.
    #[error("policy error: {0}")]
    Policy(#[from] serde_yaml_ng::Error),
}

/// Convenience alias for `Result<T, PlugvetError>`.
pub type Result<T> = std::result::Result<T, PlugvetError>;

/// A hard failure from a single check's behavior.
///
/// Recorded against the failing identity and contained by the engine;
/// dependents observe the dependency as absent and the run keeps going.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct CheckError(pub String);

impl CheckError {
    /// Failure with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<std::io::Error> for CheckError {
    fn from(err: std::io::Error) -> Self {
        Self(err.to_string())
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(err: serde_json::Error) -> Self {
        Self(err.to_string())
    }
}
