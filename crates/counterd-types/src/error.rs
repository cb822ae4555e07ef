//! Error taxonomy shared by the entity model and the namespace core.

use thiserror::Error;

/// Errors surfaced by registration, dispatch, and the enum adapter.
///
/// Nothing here is fatal to the process: registration errors are returned
/// after full rollback, and dispatch errors are reported to the external
/// caller without touching device lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CounterError {
    /// The driver-supplied entity graph violates a structural invariant.
    ///
    /// Rejected before any allocation; nothing is partially published.
    #[error("invalid device model: {reason}")]
    InvalidModel { reason: String },

    /// An instance id or backing allocation could not be obtained.
    #[error("resource exhausted: {resource}")]
    ResourceExhausted { resource: String },

    /// The endpoint was accessed in a direction the driver did not implement.
    #[error("operation not supported")]
    Unsupported,

    /// An enum write named an option that is not in the available set.
    #[error("no such item: {item}")]
    NotFound { item: String },

    /// A textual write payload could not be parsed.
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },

    /// A driver accessor returned an out-of-range index.
    ///
    /// This is a driver bug; it is surfaced rather than silently clamped.
    #[error("internal error: {reason}")]
    Internal { reason: String },

    /// The namespace host rejected a publish request.
    #[error("namespace host error: {reason}")]
    Host { reason: String },
}

impl CounterError {
    /// Creates an invalid model error.
    pub fn invalid_model(reason: impl Into<String>) -> Self {
        CounterError::InvalidModel {
            reason: reason.into(),
        }
    }

    /// Creates a resource exhaustion error.
    pub fn resource_exhausted(resource: impl Into<String>) -> Self {
        CounterError::ResourceExhausted {
            resource: resource.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(item: impl Into<String>) -> Self {
        CounterError::NotFound { item: item.into() }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        CounterError::InvalidValue {
            reason: reason.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(reason: impl Into<String>) -> Self {
        CounterError::Internal {
            reason: reason.into(),
        }
    }

    /// Creates a host error.
    pub fn host(reason: impl Into<String>) -> Self {
        CounterError::Host {
            reason: reason.into(),
        }
    }

    /// Returns true if this error indicates a rejected entity graph.
    pub fn is_invalid_model(&self) -> bool {
        matches!(self, CounterError::InvalidModel { .. })
    }
}

/// Result type used across the counter core.
pub type CounterResult<T> = Result<T, CounterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CounterError::invalid_model("no signals").to_string(),
            "invalid device model: no signals"
        );
        assert_eq!(
            CounterError::not_found("both edges").to_string(),
            "no such item: both edges"
        );
        assert_eq!(CounterError::Unsupported.to_string(), "operation not supported");
    }

    #[test]
    fn test_error_classification() {
        assert!(CounterError::invalid_model("x").is_invalid_model());
        assert!(!CounterError::Unsupported.is_invalid_model());
    }
}
