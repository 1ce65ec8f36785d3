//! Local manifest and template shape errors

use super::BuilderError;

/// Creates a missing manifest error
pub fn missing(path: impl Into<String>) -> BuilderError {
    BuilderError::MissingManifest { path: path.into() }
}

/// Creates an invalid manifest shape error
pub fn invalid_shape(path: impl Into<String>, reason: impl Into<String>) -> BuilderError {
    BuilderError::InvalidManifestShape {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid template error
pub fn invalid_template(name: impl Into<String>, reason: impl Into<String>) -> BuilderError {
    BuilderError::InvalidTemplate {
        name: name.into(),
        reason: reason.into(),
    }
}

/// Creates a malformed module version error
pub fn malformed_version(module: impl Into<String>, reason: impl Into<String>) -> BuilderError {
    BuilderError::MalformedVersion {
        module: module.into(),
        reason: reason.into(),
    }
}
