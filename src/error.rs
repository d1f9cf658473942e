//! Error types for source-spec.

/// Boxed error used as the underlying cause of a wrapped failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for source-spec operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors that can occur when working with sources and their specs.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Constructing or draining a source failed.
    ///
    /// The original failure is preserved and reachable through
    /// [`std::error::Error::source`].
    #[error("Failed to read from source: {description}")]
    ReadFailed {
        /// Human-readable description of the source or spec being read
        description: String,
        /// The underlying failure
        #[source]
        cause: BoxError,
    },

    /// The spec does not name a source kind under `@type`.
    #[error("Source spec has no '@type' entry")]
    MissingSourceKind,

    /// No factory is registered for the requested source kind.
    #[error("Unknown source kind: {0}")]
    UnknownSourceKind(String),

    /// A source parameter is missing or has an unusable value.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// The parameter name
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Failed to load a spec document.
    #[error("Failed to load source spec: {0}")]
    LoadError(String),

    /// Failed to parse a spec document.
    #[error("Failed to parse source spec: {0}")]
    ParseError(String),

    /// Failed to deserialize spec parameters into a typed value.
    #[error("Failed to deserialize parameters: {0}")]
    DeserializationError(String),

    /// Attempted to use a feature that is not enabled.
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(&'static str),

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SourceError {
    /// Wrap a failure as a read failure for the described source.
    pub fn read_failed(description: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::ReadFailed {
            description: description.into(),
            cause: cause.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is a wrapped read failure.
    pub fn is_read_failure(&self) -> bool {
        matches!(self, Self::ReadFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_read_failed_message_and_cause() {
        let cause = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err = SourceError::read_failed("text:/tmp/input.txt", cause);

        assert!(err.is_read_failure());
        assert_eq!(
            err.to_string(),
            "Failed to read from source: text:/tmp/input.txt"
        );

        let source = err.source().expect("cause should be preserved");
        let io_err = source.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = SourceError::invalid_parameter("filename", "missing");
        assert_eq!(err.to_string(), "Invalid parameter 'filename': missing");
        assert!(!err.is_read_failure());
    }
}
