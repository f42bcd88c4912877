//! Parser manifest files.
//!
//! A manifest carries everything needed to build a [`Parser`]: declarations,
//! strictness, help settings, console stream targets and base verbosity.
//!
//! # Example YAML
//!
//! ```yaml
//! program: app
//! description: Project tool
//! footer: See the manual for more.
//! strict: true
//! help: true
//! streams:
//!   output: stdout
//!   error: stderr
//! commands:
//!   - identifier: init
//!     help: Initialize a project
//!     usage: "init [--directory=<dir>]"
//! options:
//!   - name: verbose
//!     short_name: v
//!     help: Verbose output
//!   - name: directory
//!     short_name: d
//!     command: init
//!     takes_value: true
//!     default_value: "."
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use argspec_core::{CommandSpec, OptionSpec};
use argspec_parser::{
    Console, HelpSettings, Parser, StdConsole, StreamTarget, StreamTargets, Verbosity,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ManifestError, Result};

/// On-disk encoding of a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Json,
}

impl ManifestFormat {
    /// Picks the format from the file extension: `.json` is JSON, anything
    /// else is YAML.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_manifest::ManifestFormat;
    ///
    /// assert_eq!(ManifestFormat::from_path("cli.JSON"), ManifestFormat::Json);
    /// assert_eq!(ManifestFormat::from_path("cli.yml"), ManifestFormat::Yaml);
    /// assert_eq!(ManifestFormat::from_path("cli"), ManifestFormat::Yaml);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let is_json = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json { Self::Json } else { Self::Yaml }
    }
}

/// Complete parser configuration.
///
/// Commands are declared before options so command-scoped options can
/// reference them regardless of their order in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserManifest {
    /// Program name for usage lines and diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// Text shown under the global usage lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Text shown at the end of every help page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    /// Turn unknown options into diagnostics.
    pub strict: bool,
    /// Enable `--help`, `-h` and `help <command>`.
    pub help: bool,
    /// Base console verbosity.
    pub verbosity: Verbosity,
    /// Console stream targets.
    pub streams: StreamTargets,
    pub commands: Vec<CommandSpec>,
    pub options: Vec<OptionSpec>,
}

impl ParserManifest {
    /// Loads a manifest, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](ManifestError::Io) if the file cannot be read, or
    /// [`Json`](ManifestError::Json) / [`Yaml`](ManifestError::Yaml) if
    /// parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let manifest: Self = match ManifestFormat::from_path(path) {
            ManifestFormat::Json => serde_json::from_reader(reader)?,
            ManifestFormat::Yaml => serde_yaml::from_reader(reader)?,
        };
        debug!(
            path = %path.display(),
            commands = manifest.commands.len(),
            options = manifest.options.len(),
            "Loaded parser manifest"
        );
        Ok(manifest)
    }

    /// Saves the manifest, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](ManifestError::Io) if the file cannot be written, or a
    /// serialization error.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(std::fs::File::create(path)?);
        match ManifestFormat::from_path(path) {
            ManifestFormat::Json => serde_json::to_writer_pretty(writer, self)?,
            ManifestFormat::Yaml => serde_yaml::to_writer(writer, self)?,
        }
        Ok(())
    }

    /// Parses a YAML manifest.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses a JSON manifest.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Help settings derived from the manifest.
    pub fn help_settings(&self) -> HelpSettings {
        HelpSettings {
            description: self.description.clone(),
            footer: self.footer.clone(),
            program_name: self.program.clone(),
        }
    }

    /// Checks the settings that the declaration tables do not cover.
    ///
    /// # Errors
    ///
    /// Returns [`Invalid`](ManifestError::Invalid) for an empty program name
    /// or a stream bound to a target of the wrong direction.
    pub fn validate(&self) -> Result<()> {
        if self.program.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ManifestError::Invalid(
                "program name cannot be empty".to_string(),
            ));
        }
        if matches!(
            self.streams.input,
            StreamTarget::Stdout | StreamTarget::Stderr
        ) {
            return Err(ManifestError::Invalid(format!(
                "input stream cannot be bound to {}",
                self.streams.input
            )));
        }
        for (label, target) in [("output", &self.streams.output), ("error", &self.streams.error)] {
            if *target == StreamTarget::Stdin {
                return Err(ManifestError::Invalid(format!(
                    "{label} stream cannot be bound to stdin"
                )));
            }
        }
        Ok(())
    }

    /// Builds a parser writing to the manifest's stream targets.
    ///
    /// # Errors
    ///
    /// See [`build_parser_with`](Self::build_parser_with).
    pub fn build_parser(&self) -> Result<Parser<StdConsole>> {
        self.build_parser_with(StdConsole::with_targets(self.streams.clone()))
    }

    /// Builds a parser on the given console.
    ///
    /// # Errors
    ///
    /// Returns [`Invalid`](ManifestError::Invalid) from
    /// [`validate`](Self::validate), or [`Declaration`](ManifestError::Declaration)
    /// for the first rejected command or option.
    pub fn build_parser_with<C: Console>(&self, mut console: C) -> Result<Parser<C>> {
        self.validate()?;
        if self.verbosity != Verbosity::default() {
            console.verbosity().push(self.verbosity);
        }

        let mut parser = Parser::with_console(console);
        parser.set_strict(self.strict);
        parser.add_commands(self.commands.iter().cloned())?;
        parser.add_options(self.options.iter().cloned())?;
        if self.help {
            parser.enable_help(self.help_settings())?;
        }

        debug!(
            program = ?self.program,
            strict = self.strict,
            help = self.help,
            "Built parser from manifest"
        );
        Ok(parser)
    }
}

#[cfg(test)]
mod tests {
    use argspec_core::DeclarationError;
    use argspec_parser::BufferConsole;

    use super::*;

    const SAMPLE: &str = r#"
program: app
description: Project tool
strict: true
help: true
streams:
  error: "file:///tmp/app-errors.log"
commands:
  - identifier: init
    help: Initialize a project
    usage: "init [--directory=<dir>]"
options:
  - name: verbose
    short_name: v
    help: Verbose output
  - name: directory
    short_name: d
    command: init
    takes_value: true
    default_value: "."
"#;

    #[test]
    fn test_yaml_sample() {
        let manifest = ParserManifest::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(manifest.program.as_deref(), Some("app"));
        assert!(manifest.strict);
        assert!(manifest.help);
        assert_eq!(manifest.verbosity, Verbosity::Normal);
        assert_eq!(manifest.streams.input, StreamTarget::Stdin);
        assert_eq!(
            manifest.streams.error,
            StreamTarget::File("/tmp/app-errors.log".into())
        );
        assert_eq!(manifest.commands[0].usage, vec!["init [--directory=<dir>]"]);
        assert_eq!(manifest.options[0].short_name, Some('v'));
        assert_eq!(manifest.options[1].scope(), "init");
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = ParserManifest::from_yaml_str("strict: true\nstrcit: false\n").unwrap_err();
        assert!(matches!(err, ManifestError::Yaml(_)));

        let err = ParserManifest::from_json_str(r#"{"options": [{"nmae": "x"}]}"#).unwrap_err();
        assert!(matches!(err, ManifestError::Json(_)));
    }

    #[test]
    fn test_empty_manifest_builds_plain_parser() {
        let manifest = ParserManifest::from_yaml_str("{}").unwrap();
        let parser = manifest.build_parser_with(BufferConsole::new()).unwrap();
        assert!(!parser.is_strict());
        assert!(parser.help_settings().is_none());
    }

    #[test]
    fn test_stream_direction_checked() {
        let mut manifest = ParserManifest::default();
        manifest.streams.output = StreamTarget::Stdin;
        let err = manifest.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid manifest: output stream cannot be bound to stdin"
        );

        let mut manifest = ParserManifest::default();
        manifest.streams.input = StreamTarget::Stderr;
        assert!(matches!(manifest.validate(), Err(ManifestError::Invalid(_))));
    }

    #[test]
    fn test_empty_program_rejected() {
        let manifest = ParserManifest {
            program: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            manifest.build_parser_with(BufferConsole::new()),
            Err(ManifestError::Invalid(_))
        ));
    }

    #[test]
    fn test_options_may_precede_their_command_in_file() {
        let manifest = ParserManifest::from_yaml_str(
            "options:\n  - name: force\n    command: init\ncommands:\n  - identifier: init\n",
        )
        .unwrap();
        assert!(manifest.build_parser_with(BufferConsole::new()).is_ok());
    }

    #[test]
    fn test_declaration_errors_surface() {
        let manifest = ParserManifest::from_yaml_str(
            "options:\n  - name: force\n    command: deploy\n",
        )
        .unwrap();
        let err = manifest.build_parser_with(BufferConsole::new()).unwrap_err();
        assert!(matches!(
            err,
            ManifestError::Declaration(DeclarationError::UnknownCommand(ref c)) if c == "deploy"
        ));
    }

    #[test]
    fn test_verbosity_applied_to_console() {
        let manifest = ParserManifest {
            verbosity: Verbosity::Silent,
            strict: true,
            ..Default::default()
        };
        let mut parser = manifest.build_parser_with(BufferConsole::new()).unwrap();
        parser.parse(["app", "--nope"]).unwrap();
        assert_eq!(parser.console().error(), "");
    }
}
