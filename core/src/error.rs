//! Declaration errors.
//!
//! Raised while options and commands are being declared. They always reach
//! the caller; nothing in the parser recovers from them.

use thiserror::Error;

/// Errors raised while building option and command tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// Malformed descriptor (missing field, conflicting fields, unknown key).
    #[error("invalid descriptor: {0}")]
    Descriptor(String),
    /// An option name or short name is already registered in the scope.
    #[error("duplicate option '{option}' in scope '{scope}'")]
    DuplicateOption { scope: String, option: String },
    /// A command identifier is already registered.
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),
    /// An option references a command that was never declared.
    #[error("unknown command scope: {0}")]
    UnknownCommand(String),
}
