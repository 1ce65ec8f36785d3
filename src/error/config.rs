//! Configuration errors

use super::BuilderError;

/// Creates a config not found error
pub fn not_found(path: impl Into<String>) -> BuilderError {
    BuilderError::ConfigNotFound { path: path.into() }
}

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> BuilderError {
    BuilderError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid constraint operator error
pub fn invalid_constraint(value: impl Into<String>) -> BuilderError {
    BuilderError::InvalidConstraint {
        value: value.into(),
    }
}
