//! Argument parsing engine for argspec.
//!
//! This crate turns a raw argument list into a
//! [`ParseResult`](argspec_core::ParseResult) using the declarations from
//! `argspec-core`:
//!
//! - **Long options**: `--name=value`, `--name value`, `--flag`
//! - **Short clusters**: `-vx`, `-i/path`, `-i /path`
//! - **Commands**: the first argument may select a command scope; options
//!   unknown to the command are retried as global options
//! - **Repeating options** accumulate every value in order
//! - **Strict mode** turns unknown options into diagnostics and a
//!   [`ParseOutcome::Terminate`]
//! - **Help**: `--help`, `-h` and `help <command>` render pages through
//!   [`HelpRenderer`]
//!
//! Text output goes through a [`Console`]; [`StdConsole`] writes to the
//! process streams or files, [`BufferConsole`] keeps text in memory.
//! [`Prompt`] reuses the same console for interactive questions.
//!
//! # Example
//!
//! ```
//! use argspec_core::{CommandSpec, OptionSpec};
//! use argspec_parser::{BufferConsole, HelpSettings, ParseOutcome, Parser, Termination};
//!
//! let mut parser = Parser::with_console(BufferConsole::new());
//! parser
//!     .add_commands([CommandSpec::new("init"), CommandSpec::new("export")])
//!     .unwrap();
//! parser
//!     .add_options([
//!         OptionSpec::flag(Some('v'), Some("verbose")),
//!         OptionSpec::with_value(Some('m'), Some("tag")).allow_repeats(),
//!     ])
//!     .unwrap();
//! parser.enable_help(HelpSettings::new().with_description("Demo")).unwrap();
//!
//! let result = parser
//!     .parse(["app", "-vm", "one", "--tag=two", "notes.txt"])
//!     .unwrap()
//!     .into_result()
//!     .unwrap();
//! assert!(result.flag("verbose"));
//! assert_eq!(result.list("tag").unwrap(), ["one", "two"]);
//! assert_eq!(result.stand_alones(), ["notes.txt"]);
//!
//! let outcome = parser.parse(["app", "--help"]).unwrap();
//! assert_eq!(outcome, ParseOutcome::Terminate(Termination::Help));
//! assert!(parser.console().output().starts_with("Usage: app <command> [options]"));
//! ```

mod console;
mod engine;
mod error;
mod help;
mod prompt;
mod resolve;
mod token;

pub use console::{
    BufferConsole, Console, StdConsole, Stream, StreamTarget, StreamTargets, Verbosity,
    VerbosityStack,
};
pub use engine::{ParseOutcome, Parser, Termination};
pub use error::{Error, Result};
pub use help::{HELP, HelpRenderer, HelpSettings, option_display_name, wrap_text};
pub use prompt::Prompt;
pub use token::{TokenShape, classify};
