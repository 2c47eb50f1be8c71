//! Error types for the exdesign library.
//!
//! Errors are split the same way callers need to react to them: malformed
//! input, input that is well-formed but names a size with no construction,
//! mismatched analyzer inputs, and internal construction failures.

use thiserror::Error;

/// The main error type for the exdesign library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ============ Input Errors ============
    /// An argument has the wrong form or is out of range.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the offending value and the expected form.
        message: String,
    },

    /// The input is valid in general but this particular size or option
    /// has no implementation.
    #[error("unsupported configuration: {message}")]
    UnsupportedConfiguration {
        /// Description of the unsupported request.
        message: String,
    },

    // ============ Analyzer Errors ============
    /// Paired matrices do not agree on their row count.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Shape of the reference matrix.
        expected: String,
        /// Shape of the matrix that failed to match.
        actual: String,
    },

    // ============ Construction Errors ============
    /// A construction broke one of its own invariants.
    #[error("construction failed: {message}")]
    ConstructionFailed {
        /// Description of why construction failed.
        message: String,
    },
}

/// A specialized `Result` type for exdesign operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Create a new `InvalidArgument` error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a new `UnsupportedConfiguration` error.
    #[must_use]
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedConfiguration {
            message: message.into(),
        }
    }

    /// Create a new `ShapeMismatch` error from two `(rows, cols)` shapes.
    #[must_use]
    pub fn shape_mismatch(expected: (usize, usize), actual: (usize, usize)) -> Self {
        Self::ShapeMismatch {
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        }
    }

    /// Create a new `ConstructionFailed` error.
    #[must_use]
    pub fn construction_failed(message: impl Into<String>) -> Self {
        Self::ConstructionFailed {
            message: message.into(),
        }
    }

    /// Whether this error reports a size or option that is not implemented.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedConfiguration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_argument("n_rep expected positive integer, got 0");
        assert!(err.to_string().contains("invalid argument"));
        assert!(err.to_string().contains("got 0"));

        let err = Error::unsupported("Plackett-Burman run count 92");
        assert!(err.to_string().contains("unsupported"));
        assert!(err.to_string().contains("92"));

        let err = Error::shape_mismatch((17, 6), (16, 3));
        assert!(err.to_string().contains("(17, 6)"));
        assert!(err.to_string().contains("(16, 3)"));
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        let bad = Error::invalid_argument("x");
        let unsupported = Error::unsupported("x");

        assert_ne!(bad, unsupported);
        assert!(unsupported.is_unsupported());
        assert!(!bad.is_unsupported());
    }
}
