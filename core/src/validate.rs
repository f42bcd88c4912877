//! Descriptor validation.
//!
//! Checks the invariants a single descriptor must satisfy on its own. Checks
//! that need the surrounding tables (duplicates, unknown command scopes) live
//! in [`Declarations`](crate::Declarations).
//!
//! # Examples
//!
//! ```
//! use argspec_core::*;
//!
//! assert!(validate_option(&OptionSpec::flag(Some('v'), Some("verbose"))).is_ok());
//!
//! // Neither a long nor a short name
//! assert!(validate_option(&OptionSpec::flag(None, None)).is_err());
//!
//! // Required options cannot carry a default
//! let bad = OptionSpec::with_value(None, Some("out")).mark_required().with_default("-");
//! assert!(validate_option(&bad).is_err());
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::error::DeclarationError;
use crate::types::{CommandSpec, OptionSpec, RESERVED_KEYS};

/// Long option names: a letter, then letters, digits, `-`, `_` or `.`.
static OPTION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_.-]*$").expect("option name pattern is valid")
});

/// Validates a single option descriptor.
///
/// # Errors
///
/// Returns [`DeclarationError::Descriptor`] when the option has no name,
/// a malformed long or short name, a reserved long name, an empty command
/// scope, or both `required` and `default_value` set.
pub fn validate_option(spec: &OptionSpec) -> Result<(), DeclarationError> {
    if spec.name.is_none() && spec.short_name.is_none() {
        return Err(DeclarationError::Descriptor(
            "option must define name or short_name".to_string(),
        ));
    }

    if let Some(name) = &spec.name {
        if !OPTION_NAME.is_match(name) {
            return Err(DeclarationError::Descriptor(format!(
                "invalid option name: {name}"
            )));
        }
        if RESERVED_KEYS.contains(&name.as_str()) {
            return Err(DeclarationError::Descriptor(format!(
                "option name is reserved: {name}"
            )));
        }
    }

    if let Some(short) = spec.short_name {
        if !short.is_ascii_alphanumeric() {
            return Err(DeclarationError::Descriptor(format!(
                "invalid short option: {short}"
            )));
        }
    }

    if spec.command.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err(DeclarationError::Descriptor(format!(
            "option '{}' has an empty command scope",
            spec.key()
        )));
    }

    if spec.required && spec.default_value.is_some() {
        return Err(DeclarationError::Descriptor(format!(
            "option '{}' cannot be both required and defaulted",
            spec.key()
        )));
    }

    Ok(())
}

/// Validates a single command descriptor.
///
/// # Errors
///
/// Returns [`DeclarationError::Descriptor`] when the identifier is empty,
/// contains whitespace, or starts with a dash.
pub fn validate_command(spec: &CommandSpec) -> Result<(), DeclarationError> {
    let identifier = spec.identifier.as_str();
    if identifier.trim().is_empty() {
        return Err(DeclarationError::Descriptor(
            "command must define identifier".to_string(),
        ));
    }
    if identifier.starts_with('-') || identifier.chars().any(char::is_whitespace) {
        return Err(DeclarationError::Descriptor(format!(
            "invalid command identifier: {identifier}"
        )));
    }
    Ok(())
}
