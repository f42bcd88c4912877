//! Option and command descriptor types.
//!
//! Descriptors are plain records with named optional fields. They are
//! validated once, when they are inserted into the declaration tables, and
//! are serializable so they can be read from manifests.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DeclarationError;
use crate::validate::{validate_command, validate_option};

/// Scope identifier of options that are not bound to a command.
///
/// Options in this scope are also consulted when a command is active, so
/// global flags such as `--verbose` work everywhere.
pub const DEFAULT_SCOPE: &str = "";

/// Keys that [`ParseResult`](crate::ParseResult) reserves in its serialized
/// form. Options may not use them as long names.
pub const RESERVED_KEYS: [&str; 3] = ["command", "stand_alones", "unknowns"];

/// Declaration of a single option.
///
/// An option has a long name (`--input`), a short name (`-i`), or both.
/// Use [`flag`](OptionSpec::flag) and [`with_value`](OptionSpec::with_value)
/// to create one, then chain builder methods.
///
/// # Examples
///
/// ```
/// use argspec_core::OptionSpec;
///
/// let verbose = OptionSpec::flag(Some('v'), Some("verbose"))
///     .with_help("Enable verbose output");
/// assert_eq!(verbose.key(), "verbose");
/// assert!(!verbose.takes_value);
///
/// let input = OptionSpec::with_value(Some('i'), None).with_value_label("file");
/// assert_eq!(input.key(), "i");
/// assert!(input.takes_value);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionSpec {
    /// Long form without dashes (e.g. "input").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Short form (e.g. 'i').
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<char>,
    /// Command scope; `None` for the default scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Whether the option expects a value.
    pub takes_value: bool,
    /// Whether values accumulate into a list.
    pub repeats: bool,
    /// Value used when the option is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Whether parsing fails when the option is absent.
    pub required: bool,
    /// Help text.
    pub help: String,
    /// Placeholder shown in help text (`--input=<file>`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_label: Option<String>,
}

impl OptionSpec {
    /// Creates a boolean option.
    pub fn flag(short_name: Option<char>, name: Option<&str>) -> Self {
        Self {
            name: name.map(String::from),
            short_name,
            ..Default::default()
        }
    }

    /// Creates an option that takes a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_core::OptionSpec;
    ///
    /// let dir = OptionSpec::with_value(Some('d'), Some("directory"))
    ///     .in_command("init")
    ///     .with_default(".");
    /// assert_eq!(dir.scope(), "init");
    /// assert_eq!(dir.default_value.as_deref(), Some("."));
    /// ```
    pub fn with_value(short_name: Option<char>, name: Option<&str>) -> Self {
        Self {
            takes_value: true,
            ..Self::flag(short_name, name)
        }
    }

    /// Adds help text.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    /// Binds the option to a command scope.
    pub fn in_command(mut self, command: &str) -> Self {
        self.command = Some(command.to_string());
        self
    }

    /// Marks the option as accumulating every occurrence.
    pub fn allow_repeats(mut self) -> Self {
        self.repeats = true;
        self
    }

    /// Sets the value used when the option is absent.
    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    /// Marks the option as required.
    pub fn mark_required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the value placeholder shown in help text.
    pub fn with_value_label(mut self, label: &str) -> Self {
        self.value_label = Some(label.to_string());
        self
    }

    /// Returns the key this option is stored under in a parse result:
    /// the long name if present, else the short name.
    pub fn key(&self) -> String {
        match (&self.name, self.short_name) {
            (Some(name), _) => name.clone(),
            (None, Some(short)) => short.to_string(),
            (None, None) => String::new(),
        }
    }

    /// Returns the command scope, [`DEFAULT_SCOPE`] when unbound.
    pub fn scope(&self) -> &str {
        self.command.as_deref().unwrap_or(DEFAULT_SCOPE)
    }

    /// Builds a validated option from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::Descriptor`] when the object has unknown
    /// keys, wrongly typed fields, or violates a descriptor invariant.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_core::{DeclarationError, OptionSpec};
    ///
    /// let spec = OptionSpec::from_json(&serde_json::json!({
    ///     "name": "input",
    ///     "takes_value": true,
    /// }))
    /// .unwrap();
    /// assert_eq!(spec.key(), "input");
    ///
    /// let err = OptionSpec::from_json(&serde_json::json!({ "nmae": "x" })).unwrap_err();
    /// assert!(matches!(err, DeclarationError::Descriptor(_)));
    /// ```
    pub fn from_json(value: &serde_json::Value) -> Result<Self, DeclarationError> {
        let spec: Self = serde_json::from_value(value.clone())
            .map_err(|e| DeclarationError::Descriptor(e.to_string()))?;
        validate_option(&spec)?;
        Ok(spec)
    }
}

/// Declaration of a sub-command.
///
/// # Examples
///
/// ```
/// use argspec_core::CommandSpec;
///
/// let init = CommandSpec::new("init")
///     .with_help("Initialize a project")
///     .with_usage("init [--directory=<dir>]");
/// assert_eq!(init.identifier, "init");
/// assert_eq!(init.usage.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    /// Name typed on the command line.
    pub identifier: String,
    /// Help text.
    #[serde(default)]
    pub help: String,
    /// Usage lines, without the program name.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub usage: Vec<String>,
}

impl CommandSpec {
    /// Creates a command with the given identifier.
    pub fn new(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            ..Default::default()
        }
    }

    /// Adds help text.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    /// Appends a usage line.
    pub fn with_usage(mut self, line: &str) -> Self {
        self.usage.push(line.to_string());
        self
    }

    /// Builds a validated command from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::Descriptor`] when `identifier` is missing
    /// or empty, or when the object has unknown keys.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, DeclarationError> {
        let spec: Self = serde_json::from_value(value.clone())
            .map_err(|e| DeclarationError::Descriptor(e.to_string()))?;
        validate_command(&spec)?;
        Ok(spec)
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(line) => vec![line],
        OneOrMany::Many(lines) => lines,
    })
}
