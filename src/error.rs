//! Structured error taxonomy.
//!
//! Every public entry point returns [`KeystoneError`], never a bare
//! `anyhow`-style opaque error: callers need to distinguish "no such
//! type" from "a sub-dependency failed" from "this constructor itself
//! failed".

use std::fmt;

use crate::key::{Key, KeyList};

/// The ordered path a [`crate::cycle`] DFS walked before re-visiting a key
/// already on the current path.
#[derive(Debug, Clone)]
pub struct CyclePath {
    pub path: Vec<Key>,
    pub closing_key: Key,
}

impl fmt::Display for CyclePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", KeyList(self.path.clone()))?;
        write!(f, " -> {}", self.closing_key)
    }
}

/// The complete error taxonomy the public API can return.
#[derive(Debug, thiserror::Error)]
pub enum KeystoneError {
    /// A failure during `Provide`'s shape analysis or registration
    /// (duplicate `ValueKey`, malformed field, not a function).
    #[error("provide {function} failed: {reason}")]
    ProvideError { function: String, reason: String },

    /// Registering `function` would have introduced a cycle.
    #[error("registering {function} would create a cycle: {path}")]
    CycleDetected { function: String, path: CyclePath },

    /// `Invoke`/constructor entry found a required key with no provider.
    #[error("invoking {function}: missing required dependencies: {missing_keys}")]
    MissingDependencies {
        function: String,
        missing_keys: KeyList,
    },

    /// A dependency's own construction failed transitively.
    #[error("building arguments for {function} failed")]
    ArgumentsFailed {
        function: String,
        #[source]
        cause: Box<KeystoneError>,
    },

    /// The constructor ran and returned an error in its trailing slot.
    #[error("constructor {function} failed")]
    ConstructorFailed {
        function: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Shape-analysis rejected a field (unexported, contradictory tags,
    /// non-slice `group`, unparsable bool).
    #[error("invalid field `{field_name}` on `{struct_type}`: {reason}")]
    InvalidField {
        struct_type: &'static str,
        field_name: &'static str,
        reason: String,
    },
}

impl KeystoneError {
    pub fn provide(function: impl Into<String>, reason: impl Into<String>) -> Self {
        KeystoneError::ProvideError {
            function: function.into(),
            reason: reason.into(),
        }
    }

    pub fn missing(function: impl Into<String>, missing_keys: Vec<Key>) -> Self {
        KeystoneError::MissingDependencies {
            function: function.into(),
            missing_keys: KeyList(missing_keys),
        }
    }

    pub fn constructor_failed(
        function: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        KeystoneError::ConstructorFailed {
            function: function.into(),
            cause: Box::new(cause),
        }
    }

    pub fn arguments_failed(function: impl Into<String>, cause: KeystoneError) -> Self {
        KeystoneError::ArgumentsFailed {
            function: function.into(),
            cause: Box::new(cause),
        }
    }

    /// True for the subset of errors that are purely registration-graph
    /// problems, knowable without executing any user code.
    pub fn is_missing_dependencies(&self) -> bool {
        matches!(self, KeystoneError::MissingDependencies { .. })
    }
}

pub type Result<T> = std::result::Result<T, KeystoneError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::ValueKey;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn constructor_failed_chains_cause() {
        let err = KeystoneError::constructor_failed("NewA", Boom);
        assert!(err.to_string().contains("NewA"));
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("boom"));
    }

    #[test]
    fn missing_dependencies_renders_keys() {
        let err = KeystoneError::missing(
            "func",
            vec![Key::Value(ValueKey::unnamed::<i32>())],
        );
        assert!(err.is_missing_dependencies());
        assert!(err.to_string().contains("i32"));
    }

    #[test]
    fn arguments_failed_wraps_missing_dependencies() {
        let missing = KeystoneError::missing("Dep", vec![Key::Value(ValueKey::unnamed::<u8>())]);
        let wrapped = KeystoneError::arguments_failed("Outer", missing);
        let rendered = format!("{wrapped}");
        assert!(rendered.contains("Outer"));
        let source = std::error::Error::source(&wrapped).unwrap();
        assert!(source.to_string().contains("u8"));
    }
}
