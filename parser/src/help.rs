//! Help text rendering.
//!
//! [`HelpRenderer`] reads the same declaration tables the parser uses and
//! lays them out as plain text: usage lines, description, commands, options
//! and footer. Option descriptions are word-wrapped into a column.

use argspec_core::{CommandSpec, DEFAULT_SCOPE, Declarations, OptionSpec};

/// Name of the built-in help flag and help command.
pub const HELP: &str = "help";

const DEFAULT_WIDTH: usize = 80;
const INDENT: usize = 2;
const GAP: usize = 2;
const MAX_LABEL_COLUMN: usize = 32;
const MIN_TEXT_WIDTH: usize = 20;

/// Settings passed to [`Parser::enable_help`](crate::Parser::enable_help).
///
/// # Examples
///
/// ```
/// use argspec_parser::HelpSettings;
///
/// let settings = HelpSettings::new()
///     .with_description("Project scaffolding tool")
///     .with_footer("Report bugs to the issue tracker.")
///     .with_program_name("scaffold");
/// assert_eq!(settings.program_name.as_deref(), Some("scaffold"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpSettings {
    /// Text shown under the global usage lines.
    pub description: Option<String>,
    /// Text shown at the end of every help page.
    pub footer: Option<String>,
    /// Program name used in usage lines and diagnostics instead of the
    /// first token.
    pub program_name: Option<String>,
}

impl HelpSettings {
    /// Creates empty settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Sets the footer.
    pub fn with_footer(mut self, footer: &str) -> Self {
        self.footer = Some(footer.to_string());
        self
    }

    /// Sets the program name.
    pub fn with_program_name(mut self, program_name: &str) -> Self {
        self.program_name = Some(program_name.to_string());
        self
    }
}

/// Renders help pages from declaration tables.
///
/// # Examples
///
/// ```
/// use argspec_core::{Declarations, OptionSpec};
/// use argspec_parser::{HelpRenderer, HelpSettings};
///
/// let mut decls = Declarations::new();
/// decls
///     .add_option(OptionSpec::with_value(Some('i'), Some("input")).with_help("Input file"))
///     .unwrap();
///
/// let settings = HelpSettings::new();
/// let text = HelpRenderer::new(&decls, &settings, "app").render(None);
/// assert!(text.starts_with("Usage: app [options]\n"));
/// assert!(text.contains("  -i, --input=<value>  Input file\n"));
/// ```
#[derive(Debug, Clone)]
pub struct HelpRenderer<'a> {
    declarations: &'a Declarations,
    settings: &'a HelpSettings,
    program: &'a str,
    width: usize,
    help_command: bool,
}

impl<'a> HelpRenderer<'a> {
    /// Creates a renderer for the given tables.
    pub fn new(
        declarations: &'a Declarations,
        settings: &'a HelpSettings,
        program: &'a str,
    ) -> Self {
        Self {
            declarations,
            settings,
            program,
            width: DEFAULT_WIDTH,
            help_command: false,
        }
    }

    /// Sets the line width used for wrapping.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Lists the built-in `help` command among the commands.
    pub fn with_help_command(mut self, enabled: bool) -> Self {
        self.help_command = enabled;
        self
    }

    /// Renders the page for a command, or the global page for `None` or an
    /// undeclared command.
    pub fn render(&self, command: Option<&str>) -> String {
        let command = command.and_then(|id| self.declarations.commands().get(id));
        let mut out = String::new();

        for (i, line) in self.usage_lines(command).iter().enumerate() {
            let prefix = if i == 0 { "Usage: " } else { "       " };
            out.push_str(&format!("{prefix}{line}\n"));
        }

        let about = match command {
            Some(spec) => Some(spec.help.as_str()),
            None => self.settings.description.as_deref(),
        };
        if let Some(about) = about.filter(|text| !text.trim().is_empty()) {
            out.push('\n');
            for line in wrap_text(about, self.width) {
                out.push_str(&line);
                out.push('\n');
            }
        }

        if command.is_none() {
            let mut rows: Vec<(String, String)> = self
                .declarations
                .commands()
                .iter()
                .map(|spec| (spec.identifier.clone(), spec.help.clone()))
                .collect();
            if self.help_command && !rows.is_empty() {
                rows.push((HELP.to_string(), "Display help for a command".to_string()));
            }
            self.push_section(&mut out, "Commands:", &rows);
        }

        match command {
            Some(spec) => {
                self.push_section(&mut out, "Options:", &self.option_rows(&spec.identifier));
                self.push_section(&mut out, "Global options:", &self.option_rows(DEFAULT_SCOPE));
            }
            None => self.push_section(&mut out, "Options:", &self.option_rows(DEFAULT_SCOPE)),
        }

        if let Some(footer) = self.settings.footer.as_deref() {
            out.push('\n');
            for line in wrap_text(footer, self.width) {
                out.push_str(&line);
                out.push('\n');
            }
        }

        out
    }

    fn usage_lines(&self, command: Option<&CommandSpec>) -> Vec<String> {
        let program = self.program;
        match command {
            Some(spec) if !spec.usage.is_empty() => spec
                .usage
                .iter()
                .map(|line| format!("{program} {line}"))
                .collect(),
            Some(spec) => vec![format!("{program} {} [options]", spec.identifier)],
            None if self.declarations.commands().is_empty() => {
                vec![format!("{program} [options]")]
            }
            None => {
                let mut lines = vec![format!("{program} <command> [options]")];
                if self.help_command {
                    lines.push(format!("{program} {HELP} <command>"));
                }
                lines
            }
        }
    }

    fn option_rows(&self, scope: &str) -> Vec<(String, String)> {
        self.declarations
            .options()
            .in_scope(scope)
            .map(|spec| (option_label(spec), option_description(spec)))
            .collect()
    }

    fn push_section(&self, out: &mut String, title: &str, rows: &[(String, String)]) {
        if rows.is_empty() {
            return;
        }
        out.push('\n');
        out.push_str(title);
        out.push('\n');

        let column = rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0)
            .min(MAX_LABEL_COLUMN);
        let text_width = self
            .width
            .saturating_sub(INDENT + column + GAP)
            .max(MIN_TEXT_WIDTH);
        let pad = " ".repeat(INDENT + column + GAP);

        for (label, description) in rows {
            let lines = wrap_text(description, text_width);
            let label_len = label.chars().count();
            out.push_str(&" ".repeat(INDENT));
            out.push_str(label);

            let mut lines = lines.into_iter();
            if label_len > column {
                out.push('\n');
            } else if let Some(first) = lines.next() {
                out.push_str(&" ".repeat(column - label_len + GAP));
                out.push_str(&first);
                out.push('\n');
            } else {
                out.push('\n');
            }
            for line in lines {
                out.push_str(&pad);
                out.push_str(&line);
                out.push('\n');
            }
        }
    }
}

/// Returns `--name` for long options and `-x` for short-only options.
pub fn option_display_name(spec: &OptionSpec) -> String {
    match (&spec.name, spec.short_name) {
        (Some(name), _) => format!("--{name}"),
        (None, Some(short)) => format!("-{short}"),
        (None, None) => String::new(),
    }
}

fn option_label(spec: &OptionSpec) -> String {
    let placeholder = spec.value_label.as_deref().unwrap_or("value");
    match (&spec.name, spec.short_name, spec.takes_value) {
        (Some(name), Some(short), true) => format!("-{short}, --{name}=<{placeholder}>"),
        (Some(name), Some(short), false) => format!("-{short}, --{name}"),
        (Some(name), None, true) => format!("    --{name}=<{placeholder}>"),
        (Some(name), None, false) => format!("    --{name}"),
        (None, Some(short), true) => format!("-{short} <{placeholder}>"),
        (None, Some(short), false) => format!("-{short}"),
        (None, None, _) => String::new(),
    }
}

fn option_description(spec: &OptionSpec) -> String {
    let mut parts = Vec::new();
    if !spec.help.trim().is_empty() {
        parts.push(spec.help.trim().to_string());
    }
    if spec.required {
        parts.push("(required)".to_string());
    }
    if let Some(default) = &spec.default_value {
        parts.push(format!("(default: {default})"));
    }
    if spec.repeats {
        parts.push("(repeatable)".to_string());
    }
    parts.join(" ")
}

/// Greedy word wrap. Explicit line breaks are kept; words longer than
/// `width` get a line of their own.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
            } else if current.chars().count() + 1 + word.chars().count() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        lines.push(current);
    }

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}
