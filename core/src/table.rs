//! Declaration tables.
//!
//! [`OptionTable`] indexes options by `(scope, identifier)` where the
//! identifier is either the long name or the short character; both entries
//! point at the same descriptor. [`CommandTable`] indexes commands by
//! identifier. [`Declarations`] owns both and enforces the cross-table
//! invariants.
//!
//! All lookups are O(1) via the internal `HashMap`s. Tables are append-only;
//! [`Declarations::clear`] wipes everything for reuse.

use std::collections::HashMap;

use crate::error::DeclarationError;
use crate::types::{CommandSpec, OptionSpec};
use crate::validate::{validate_command, validate_option};

/// Options keyed by command scope and identifier.
#[derive(Debug, Clone, Default)]
pub struct OptionTable {
    options: Vec<OptionSpec>,
    index: HashMap<String, HashMap<String, usize>>,
}

impl OptionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an option after checking its names are free in its scope.
    ///
    /// Descriptor validation is the caller's job; see
    /// [`Declarations::add_option`].
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::DuplicateOption`] when the long or short
    /// name is already registered in the option's scope. Nothing is inserted
    /// in that case.
    pub fn insert(&mut self, spec: OptionSpec) -> Result<(), DeclarationError> {
        let identifiers = identifiers(&spec);
        let scope = spec.scope().to_string();

        if let Some(entries) = self.index.get(&scope) {
            if let Some(taken) = identifiers.iter().find(|id| entries.contains_key(*id)) {
                return Err(DeclarationError::DuplicateOption {
                    scope,
                    option: taken.clone(),
                });
            }
        }

        let position = self.options.len();
        let entries = self.index.entry(scope).or_default();
        for id in identifiers {
            entries.insert(id, position);
        }
        self.options.push(spec);
        Ok(())
    }

    /// Looks up an option by long name or short character string.
    pub fn get(&self, scope: &str, identifier: &str) -> Option<&OptionSpec> {
        self.index
            .get(scope)
            .and_then(|entries| entries.get(identifier))
            .map(|&position| &self.options[position])
    }

    /// Looks up an option by short character.
    pub fn get_short(&self, scope: &str, short: char) -> Option<&OptionSpec> {
        let mut buf = [0u8; 4];
        self.get(scope, short.encode_utf8(&mut buf))
    }

    /// Iterates over the options of one scope in declaration order.
    pub fn in_scope<'a>(&'a self, scope: &'a str) -> impl Iterator<Item = &'a OptionSpec> + 'a {
        self.options.iter().filter(move |spec| spec.scope() == scope)
    }

    /// Iterates over all options in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options.iter()
    }

    /// Returns the number of declared options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns `true` if no option is declared.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Removes every option.
    pub fn clear(&mut self) {
        self.options.clear();
        self.index.clear();
    }
}

fn identifiers(spec: &OptionSpec) -> Vec<String> {
    let mut ids = Vec::with_capacity(2);
    if let Some(name) = &spec.name {
        ids.push(name.clone());
    }
    if let Some(short) = spec.short_name {
        ids.push(short.to_string());
    }
    ids
}

/// Commands keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: Vec<CommandSpec>,
    index: HashMap<String, usize>,
}

impl CommandTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a command.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::DuplicateCommand`] when the identifier is
    /// already registered.
    pub fn insert(&mut self, spec: CommandSpec) -> Result<(), DeclarationError> {
        if self.index.contains_key(&spec.identifier) {
            return Err(DeclarationError::DuplicateCommand(spec.identifier));
        }
        self.index.insert(spec.identifier.clone(), self.commands.len());
        self.commands.push(spec);
        Ok(())
    }

    /// Looks up a command by identifier.
    pub fn get(&self, identifier: &str) -> Option<&CommandSpec> {
        self.index
            .get(identifier)
            .map(|&position| &self.commands[position])
    }

    /// Returns `true` if the identifier is declared.
    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    /// Iterates over commands in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.iter()
    }

    /// Returns the number of declared commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no command is declared.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Removes every command.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.index.clear();
    }
}

/// Option and command tables of one parser configuration.
///
/// # Examples
///
/// ```
/// use argspec_core::*;
///
/// let mut decls = Declarations::new();
/// decls.add_command(CommandSpec::new("init")).unwrap();
/// decls
///     .add_option(OptionSpec::with_value(Some('d'), Some("directory")).in_command("init"))
///     .unwrap();
///
/// assert!(decls.options().get("init", "directory").is_some());
/// assert!(decls.options().get("init", "d").is_some());
/// assert!(decls.options().get(DEFAULT_SCOPE, "directory").is_none());
///
/// // Same short name in the same scope
/// let err = decls
///     .add_option(OptionSpec::flag(Some('d'), Some("dry-run")).in_command("init"))
///     .unwrap_err();
/// assert!(matches!(err, DeclarationError::DuplicateOption { .. }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    options: OptionTable,
    commands: CommandTable,
}

impl Declarations {
    /// Creates empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers an option.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::Descriptor`] for a malformed descriptor,
    /// [`DeclarationError::UnknownCommand`] when its command scope is not
    /// declared, or [`DeclarationError::DuplicateOption`] on a name clash.
    pub fn add_option(&mut self, spec: OptionSpec) -> Result<(), DeclarationError> {
        validate_option(&spec)?;
        if let Some(command) = &spec.command {
            if !self.commands.contains(command) {
                return Err(DeclarationError::UnknownCommand(command.clone()));
            }
        }
        self.options.insert(spec)
    }

    /// Registers options in order, stopping at the first failure.
    pub fn add_options<I>(&mut self, specs: I) -> Result<(), DeclarationError>
    where
        I: IntoIterator<Item = OptionSpec>,
    {
        specs.into_iter().try_for_each(|spec| self.add_option(spec))
    }

    /// Validates and registers a command.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::Descriptor`] when the identifier is
    /// missing or malformed, or [`DeclarationError::DuplicateCommand`].
    pub fn add_command(&mut self, spec: CommandSpec) -> Result<(), DeclarationError> {
        validate_command(&spec)?;
        self.commands.insert(spec)
    }

    /// Registers commands in order, stopping at the first failure.
    pub fn add_commands<I>(&mut self, specs: I) -> Result<(), DeclarationError>
    where
        I: IntoIterator<Item = CommandSpec>,
    {
        specs.into_iter().try_for_each(|spec| self.add_command(spec))
    }

    /// Returns the option table.
    pub fn options(&self) -> &OptionTable {
        &self.options
    }

    /// Returns the command table.
    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// Wipes both tables.
    pub fn clear(&mut self) {
        self.options.clear();
        self.commands.clear();
    }
}
