//! File system errors

use super::BuilderError;

/// Creates a filesystem write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> BuilderError {
    BuilderError::FilesystemWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a Drupal root not found error
pub fn drupal_root_not_found(path: impl Into<String>) -> BuilderError {
    BuilderError::DrupalRootNotFound { path: path.into() }
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> BuilderError {
    BuilderError::Io {
        message: message.into(),
    }
}
