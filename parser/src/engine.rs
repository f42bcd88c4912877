//! The parse engine.
//!
//! [`Parser`] owns the declaration tables, the strictness and help policy,
//! and the [`Console`] that help text and diagnostics are written to. Each
//! call to [`Parser::parse`] walks the tokens once:
//!
//! 1. the first token after the program name selects a command scope when it
//!    names a declared command;
//! 2. every remaining token is classified and resolved in that scope, with
//!    unknown options retried in the default scope;
//! 3. defaults are filled in;
//! 4. strict-mode unknowns and help requests end the parse with a
//!    [`ParseOutcome::Terminate`];
//! 5. required options are checked.

use argspec_core::{
    CommandSpec, DEFAULT_SCOPE, DeclarationError, Declarations, OptionSpec, ParseResult, Value,
};
use tracing::debug;

use crate::console::{Console, StdConsole, Stream, Verbosity};
use crate::error::{Error, Result};
use crate::help::{HELP, HelpRenderer, HelpSettings};
use crate::resolve::{Resolver, TokenCursor};
use crate::token::{TokenShape, classify};

const FALLBACK_PROGRAM: &str = "program";

/// Why a parse ended without a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Help text was written to the output stream.
    Help,
    /// Strict mode met unknown options; diagnostics were written to the
    /// error stream.
    UnknownOptions,
}

impl Termination {
    /// Process exit code the host should use.
    pub fn exit_code(self) -> i32 {
        match self {
            Termination::Help => 0,
            Termination::UnknownOptions => 1,
        }
    }
}

/// Outcome of [`Parser::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Arguments were parsed.
    Parsed(ParseResult),
    /// The host should stop; the relevant text has already been written.
    Terminate(Termination),
}

impl ParseOutcome {
    /// Returns the result, if any.
    pub fn result(&self) -> Option<&ParseResult> {
        match self {
            ParseOutcome::Parsed(result) => Some(result),
            ParseOutcome::Terminate(_) => None,
        }
    }

    /// Converts into the result, if any.
    pub fn into_result(self) -> Option<ParseResult> {
        match self {
            ParseOutcome::Parsed(result) => Some(result),
            ParseOutcome::Terminate(_) => None,
        }
    }

    /// Returns the termination reason, if any.
    pub fn termination(&self) -> Option<Termination> {
        match self {
            ParseOutcome::Parsed(_) => None,
            ParseOutcome::Terminate(reason) => Some(*reason),
        }
    }
}

/// Argument parser with its own declaration tables and console.
///
/// # Examples
///
/// ```
/// use argspec_core::{CommandSpec, OptionSpec};
/// use argspec_parser::{BufferConsole, Parser};
///
/// let mut parser = Parser::with_console(BufferConsole::new());
/// parser.add_command(CommandSpec::new("init")).unwrap();
/// parser
///     .add_options([
///         OptionSpec::flag(Some('v'), Some("verbose")),
///         OptionSpec::with_value(Some('d'), Some("directory")).in_command("init"),
///     ])
///     .unwrap();
///
/// let outcome = parser.parse(["app", "init", "--directory=./", "-v"]).unwrap();
/// let result = outcome.into_result().unwrap();
/// assert_eq!(result.command(), Some("init"));
/// assert_eq!(result.value("directory"), Some("./"));
/// assert!(result.flag("verbose"));
/// ```
#[derive(Debug)]
pub struct Parser<C = StdConsole> {
    declarations: Declarations,
    strict: bool,
    help: Option<HelpSettings>,
    console: C,
}

impl Parser<StdConsole> {
    /// Creates a parser writing to the process standard streams.
    pub fn new() -> Self {
        Self::with_console(StdConsole::new())
    }
}

impl Default for Parser<StdConsole> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Console> Parser<C> {
    /// Creates a parser writing to the given console.
    pub fn with_console(console: C) -> Self {
        Self {
            declarations: Declarations::new(),
            strict: false,
            help: None,
            console,
        }
    }

    /// Declares an option. See [`Declarations::add_option`].
    pub fn add_option(&mut self, spec: OptionSpec) -> std::result::Result<(), DeclarationError> {
        self.declarations.add_option(spec)
    }

    /// Declares options in order, stopping at the first failure.
    pub fn add_options<I>(&mut self, specs: I) -> std::result::Result<(), DeclarationError>
    where
        I: IntoIterator<Item = OptionSpec>,
    {
        self.declarations.add_options(specs)
    }

    /// Declares a command. See [`Declarations::add_command`].
    pub fn add_command(&mut self, spec: CommandSpec) -> std::result::Result<(), DeclarationError> {
        self.declarations.add_command(spec)
    }

    /// Declares commands in order, stopping at the first failure.
    pub fn add_commands<I>(&mut self, specs: I) -> std::result::Result<(), DeclarationError>
    where
        I: IntoIterator<Item = CommandSpec>,
    {
        self.declarations.add_commands(specs)
    }

    /// Turns strict mode on or off. In strict mode unknown options end the
    /// parse with diagnostics instead of being returned.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Returns `true` in strict mode.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Enables `--help`/`-h` and, when commands are declared, the
    /// `help <command>` pseudo-command.
    ///
    /// The flag is not registered if an option named `help` already exists;
    /// the short form is left out if `-h` is taken.
    pub fn enable_help(
        &mut self,
        settings: HelpSettings,
    ) -> std::result::Result<(), DeclarationError> {
        let options = self.declarations.options();
        if options.get(DEFAULT_SCOPE, HELP).is_none() {
            let short = options.get_short(DEFAULT_SCOPE, 'h').is_none().then_some('h');
            let flag = OptionSpec::flag(short, Some(HELP)).with_help("Display this help text");
            self.declarations.add_option(flag)?;
        }
        self.help = Some(settings);
        Ok(())
    }

    /// Returns the help settings when help is enabled.
    pub fn help_settings(&self) -> Option<&HelpSettings> {
        self.help.as_ref()
    }

    /// Returns the declaration tables.
    pub fn declarations(&self) -> &Declarations {
        &self.declarations
    }

    /// Returns the console.
    pub fn console(&self) -> &C {
        &self.console
    }

    /// Returns the console mutably.
    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Consumes the parser and returns its console.
    pub fn into_console(self) -> C {
        self.console
    }

    /// Wipes declarations, strict mode and help settings. The console is
    /// kept.
    pub fn reset(&mut self) {
        self.declarations.clear();
        self.strict = false;
        self.help = None;
    }

    /// Renders the help page for a command, or the global page.
    pub fn render_help(&self, program: &str, command: Option<&str>) -> String {
        let fallback = HelpSettings::default();
        let settings = self.help.as_ref().unwrap_or(&fallback);
        let program = settings.program_name.as_deref().unwrap_or(program);
        HelpRenderer::new(&self.declarations, settings, program)
            .with_help_command(self.help_command_available())
            .render(command)
    }

    /// Parses the process arguments.
    pub fn parse_env(&mut self) -> Result<ParseOutcome> {
        self.parse(std::env::args())
    }

    /// Parses one invocation. `tokens[0]` is the program name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingValue`] when a value-taking option has no
    /// value, [`Error::MissingRequiredOptions`] when required options are
    /// absent, or [`Error::Io`] when the console cannot be written.
    pub fn parse<I, S>(&mut self, tokens: I) -> Result<ParseOutcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let program = self.program_name(tokens.first().map(String::as_str));
        let mut rest = tokens.get(1..).unwrap_or_default();
        let mut result = ParseResult::new();

        let scope = match rest.first() {
            Some(first) if self.is_command(first) => {
                rest = &rest[1..];
                debug!(command = %first, "Selected command scope");
                first.clone()
            }
            _ => DEFAULT_SCOPE.to_string(),
        };
        if scope != DEFAULT_SCOPE {
            result.set_command(Some(scope.clone()));
        }

        self.consume(rest, &scope, &mut result)?;
        self.fill_defaults(&scope, &mut result);

        if self.strict && !result.unknowns().is_empty() {
            self.report_unknowns(&program, &result)?;
            return Ok(ParseOutcome::Terminate(Termination::UnknownOptions));
        }

        if let Some(target) = self.help_request(&scope, &result) {
            let text = self.render_help(&program, target.as_deref());
            debug!(command = ?target, "Rendering help");
            self.console.emit(Verbosity::Normal, &text, Stream::Output)?;
            return Ok(ParseOutcome::Terminate(Termination::Help));
        }

        self.check_required(&scope, &result)?;
        Ok(ParseOutcome::Parsed(result))
    }

    fn consume(&self, tokens: &[String], scope: &str, result: &mut ParseResult) -> Result<()> {
        let mut cursor = TokenCursor::new(tokens);
        let mut resolver = Resolver::new(self.declarations.options(), result);

        while let Some(token) = cursor.next() {
            match classify(token) {
                TokenShape::LongWithValue { name, value } => {
                    resolver.resolve_long(name, Some(value), scope, &mut cursor)?
                }
                TokenShape::LongFlag(name) => {
                    resolver.resolve_long(name, None, scope, &mut cursor)?
                }
                TokenShape::ShortCluster(cluster) => {
                    resolver.resolve_cluster(cluster, scope, &mut cursor)?
                }
                TokenShape::Positional(token) => resolver.stand_alone(token),
            }
        }
        Ok(())
    }

    fn fill_defaults(&self, scope: &str, result: &mut ParseResult) {
        for spec in self.scoped_options(scope) {
            if let Some(default) = &spec.default_value {
                let value = if spec.repeats {
                    Value::Multi(vec![default.clone()])
                } else {
                    Value::Single(default.clone())
                };
                result.set_default(&spec.key(), value);
            }
        }
    }

    fn report_unknowns(&mut self, program: &str, result: &ParseResult) -> Result<()> {
        debug!(unknowns = ?result.unknowns(), "Rejecting unknown options");
        for unknown in result.unknowns() {
            let line = format!("{program}: invalid option -- {unknown}\n");
            self.console.emit(Verbosity::Quiet, &line, Stream::Error)?;
        }
        if self.help.is_some() {
            let hint = format!("Try '{program} --help' for more information.\n");
            self.console.emit(Verbosity::Quiet, &hint, Stream::Error)?;
        }
        Ok(())
    }

    /// Returns `Some(target)` when help was asked for; `target` is the
    /// command whose page to show, `None` for the global page.
    fn help_request(&self, scope: &str, result: &ParseResult) -> Option<Option<String>> {
        self.help.as_ref()?;

        if scope == HELP && self.help_command_available() {
            let target = result
                .stand_alones()
                .first()
                .filter(|name| self.declarations.commands().contains(name))
                .cloned();
            return Some(target);
        }

        if result.flag(HELP) {
            return Some((scope != DEFAULT_SCOPE).then(|| scope.to_string()));
        }
        None
    }

    fn check_required(&self, scope: &str, result: &ParseResult) -> Result<()> {
        let missing: Vec<String> = self
            .scoped_options(scope)
            .filter(|spec| spec.required && !result.contains(&spec.key()))
            .map(OptionSpec::key)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingRequiredOptions(missing))
        }
    }

    /// Options of the active scope followed by the default scope.
    fn scoped_options<'a>(&'a self, scope: &'a str) -> impl Iterator<Item = &'a OptionSpec> + 'a {
        let options = self.declarations.options();
        let command_options = (scope != DEFAULT_SCOPE)
            .then(|| options.in_scope(scope))
            .into_iter()
            .flatten();
        command_options.chain(options.in_scope(DEFAULT_SCOPE))
    }

    fn is_command(&self, token: &str) -> bool {
        let commands = self.declarations.commands();
        !commands.is_empty()
            && (commands.contains(token) || (token == HELP && self.help_command_available()))
    }

    fn help_command_available(&self) -> bool {
        let commands = self.declarations.commands();
        self.help.is_some() && !commands.is_empty() && !commands.contains(HELP)
    }

    fn program_name(&self, first: Option<&str>) -> String {
        self.help
            .as_ref()
            .and_then(|settings| settings.program_name.as_deref())
            .or(first)
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_PROGRAM)
            .to_string()
    }
}
