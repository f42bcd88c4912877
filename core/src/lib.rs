//! Core declaration types for argspec.
//!
//! This crate defines the data model shared by the parser and the manifest
//! loader:
//!
//! - [`OptionSpec`]: an option with long and/or short name, command scope,
//!   value policy (flag, single value, repeating), default and help text.
//! - [`CommandSpec`]: a sub-command with help text and usage lines.
//! - [`Declarations`]: the [`OptionTable`] and [`CommandTable`] of one
//!   parser configuration, validated on insertion.
//! - [`ParseResult`]: the ordered key/[`Value`] mapping produced by a parse.
//!
//! Validation ([`validate_option`], [`validate_command`]) catches malformed
//! descriptors; the tables catch duplicates and undeclared command scopes.
//!
//! # Example
//!
//! ```
//! use argspec_core::*;
//!
//! let mut decls = Declarations::new();
//! decls.add_command(CommandSpec::new("init").with_help("Create a project")).unwrap();
//! decls
//!     .add_options([
//!         OptionSpec::flag(Some('v'), Some("verbose")).with_help("Verbose output"),
//!         OptionSpec::with_value(Some('d'), Some("directory"))
//!             .in_command("init")
//!             .with_default("."),
//!     ])
//!     .unwrap();
//!
//! assert!(decls.commands().contains("init"));
//! assert!(decls.options().get(DEFAULT_SCOPE, "v").is_some());
//! assert!(decls.options().get("init", "directory").is_some());
//! ```

mod error;
mod result;
mod table;
mod types;
mod validate;

pub use error::DeclarationError;
pub use result::{ParseResult, Value};
pub use table::{CommandTable, Declarations, OptionTable};
pub use types::*;
pub use validate::{validate_command, validate_option};
