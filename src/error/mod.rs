//! Error types and handling for drupal-composer-builder
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`manifest`]: Local manifest and remote template errors
//! - [`registry`]: Package registry and fetch errors
//! - [`fs`]: File system errors
//! - [`config`]: Configuration errors

pub mod config;
pub mod fs;
pub mod manifest;
pub mod registry;

pub use registry::FetchError;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for drupal-composer-builder operations
#[derive(Error, Diagnostic, Debug)]
pub enum BuilderError {
    // Module errors
    #[error("Could not parse the version of module '{module}': {reason}")]
    #[diagnostic(
        code(dcb::module::malformed_version),
        help("Check that the .info.yml file is valid YAML with a version such as 8.x-1.0")
    )]
    MalformedVersion { module: String, reason: String },

    // Manifest errors
    #[error("Manifest not found: {path}")]
    #[diagnostic(
        code(dcb::manifest::missing),
        help("Point --drupal-root at the directory that holds Drupal's own composer.json")
    )]
    MissingManifest { path: String },

    #[error("Manifest at {path} has an unexpected shape: {reason}")]
    #[diagnostic(
        code(dcb::manifest::invalid_shape),
        help("The manifest must be a JSON object whose \"replace\" section pins drupal/core")
    )]
    InvalidManifestShape { path: String, reason: String },

    // Template errors
    #[error("Failed to fetch template '{name}' from {url}: {reason}")]
    #[diagnostic(
        code(dcb::template::fetch_failed),
        help("Check your network connection and the template URLs in your configuration")
    )]
    TemplateFetchFailed {
        name: String,
        url: String,
        reason: String,
    },

    #[error("Template '{name}' is not usable: {reason}")]
    #[diagnostic(code(dcb::template::invalid))]
    InvalidTemplate { name: String, reason: String },

    // Registry errors
    #[error("Package registry unavailable at {url}: {reason}")]
    #[diagnostic(code(dcb::registry::unavailable))]
    RegistryUnavailable { url: String, reason: String },

    #[error("No package repository found in the baseline template")]
    #[diagnostic(
        code(dcb::registry::no_repository),
        help("The baseline template must list a composer repository whose URL names the vendor")
    )]
    NoRegistryRepository,

    // File system errors
    #[error("Failed to write {path}: {reason}")]
    #[diagnostic(code(dcb::fs::write_failed))]
    FilesystemWriteFailed { path: String, reason: String },

    #[error("Drupal root not found: {path}")]
    #[diagnostic(
        code(dcb::fs::drupal_root_not_found),
        help("Pass the directory containing your Drupal installation, relative to the workspace")
    )]
    DrupalRootNotFound { path: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(dcb::config::not_found))]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file {path}: {reason}")]
    #[diagnostic(code(dcb::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid version constraint operator: {value}")]
    #[diagnostic(
        code(dcb::config::invalid_constraint),
        help("Use one of: caret (^), tilde (~) or exact")
    )]
    InvalidConstraint { value: String },

    // Interaction errors
    #[error("Failed to read answer: {reason}")]
    #[diagnostic(
        code(dcb::prompt::failed),
        help("Run in an interactive terminal or answer the question with a command-line flag")
    )]
    PromptFailed { reason: String },

    #[error("Operation cancelled, a new composer.json is required to continue")]
    #[diagnostic(code(dcb::prompt::cancelled))]
    Cancelled,

    #[error("IO error: {message}")]
    #[diagnostic(code(dcb::fs::io_error))]
    Io { message: String },
}

impl From<std::io::Error> for BuilderError {
    fn from(err: std::io::Error) -> Self {
        BuilderError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for BuilderError {
    fn from(err: serde_yaml::Error) -> Self {
        BuilderError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BuilderError {
    fn from(err: serde_json::Error) -> Self {
        BuilderError::InvalidManifestShape {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for BuilderError {
    fn from(err: inquire::InquireError) -> Self {
        match err {
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted => BuilderError::Cancelled,
            other => BuilderError::PromptFailed {
                reason: other.to_string(),
            },
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, BuilderError>;
