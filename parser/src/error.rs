//! Error types for parsing and console interaction.
//!
//! Unknown options are not errors: they are reported in the parse result,
//! or turned into a termination outcome in strict mode.

use argspec_core::DeclarationError;
use thiserror::Error;

/// Errors returned by [`Parser`](crate::Parser) and [`Prompt`](crate::Prompt).
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or conflicting declaration.
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    /// A value-taking option had no attached value, no following bare token,
    /// and no default.
    #[error("option '{0}' requires a value")]
    MissingValue(String),

    /// Required options were not supplied.
    #[error("missing required options: {}", .0.join(", "))]
    MissingRequiredOptions(Vec<String>),

    /// Console read or write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input stream ended before an answer was read.
    #[error("input closed before an answer was given")]
    PromptClosed,

    /// Too many invalid answers.
    #[error("no valid answer after {0} attempts")]
    PromptAttemptsExceeded(usize),
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
