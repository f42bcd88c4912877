//! Parser manifests for argspec.
//!
//! A [`ParserManifest`] describes a complete parser configuration in YAML or
//! JSON: program name, help texts, strict mode, stream targets, commands and
//! options. [`ParserManifest::build_parser`] turns it into a ready
//! [`Parser`](argspec_parser::Parser).
//!
//! # Example
//!
//! ```
//! use argspec_manifest::ParserManifest;
//! use argspec_parser::BufferConsole;
//!
//! let manifest = ParserManifest::from_yaml_str(
//!     r#"
//! program: app
//! commands:
//!   - identifier: init
//!     help: Initialize a project
//! options:
//!   - name: verbose
//!     short_name: v
//!   - name: directory
//!     short_name: d
//!     command: init
//!     takes_value: true
//! "#,
//! )
//! .unwrap();
//!
//! let mut parser = manifest.build_parser_with(BufferConsole::new()).unwrap();
//! let result = parser
//!     .parse(["app", "init", "-vd", "src"])
//!     .unwrap()
//!     .into_result()
//!     .unwrap();
//! assert_eq!(result.command(), Some("init"));
//! assert_eq!(result.value("directory"), Some("src"));
//! ```

mod error;
mod manifest;

pub use error::{ManifestError, Result};
pub use manifest::{ManifestFormat, ParserManifest};
