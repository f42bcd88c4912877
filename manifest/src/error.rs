//! Error types for manifest loading.

use argspec_core::DeclarationError;
use thiserror::Error;

/// Errors that can occur while reading, writing or applying a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A declared option or command was rejected by the parser tables.
    #[error("invalid declaration: {0}")]
    Declaration(#[from] DeclarationError),

    /// The manifest is well-formed but unusable.
    #[error("invalid manifest: {0}")]
    Invalid(String),
}

/// Convenience alias for results with [`ManifestError`].
pub type Result<T> = std::result::Result<T, ManifestError>;
