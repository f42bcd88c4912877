//! Console I/O collaborator.
//!
//! The parser never touches process streams directly. Help text and
//! diagnostics go through a [`Console`], which hosts can swap out:
//!
//! - [`StdConsole`] binds each [`Stream`] to a [`StreamTarget`]: the process
//!   standard streams (the default) or a file.
//! - [`BufferConsole`] keeps everything in memory; tests and embedding hosts
//!   read the captured text back.
//!
//! Every console carries a [`VerbosityStack`]; [`Console::emit`] drops
//! messages the current level does not admit.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Logical stream selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Input,
    Output,
    Error,
}

/// Backing target of a stream.
///
/// Parsed from `stdin`, `stdout`, `stderr`, `file:///path` or a plain path.
///
/// # Examples
///
/// ```
/// use argspec_parser::StreamTarget;
///
/// assert_eq!("stderr".parse::<StreamTarget>().unwrap(), StreamTarget::Stderr);
/// assert_eq!(
///     "file:///tmp/app.log".parse::<StreamTarget>().unwrap(),
///     StreamTarget::File("/tmp/app.log".into())
/// );
/// assert!("".parse::<StreamTarget>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StreamTarget {
    Stdin,
    Stdout,
    Stderr,
    File(PathBuf),
}

impl FromStr for StreamTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            "" => Err("stream target cannot be empty".to_string()),
            "stdin" => Ok(Self::Stdin),
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            _ => {
                let path = trimmed.strip_prefix("file://").unwrap_or(trimmed);
                if path.is_empty() {
                    return Err(format!("invalid stream target: {s}"));
                }
                Ok(Self::File(PathBuf::from(path)))
            }
        }
    }
}

impl TryFrom<String> for StreamTarget {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StreamTarget> for String {
    fn from(target: StreamTarget) -> Self {
        target.to_string()
    }
}

impl fmt::Display for StreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("stdin"),
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
            Self::File(path) => write!(f, "file://{}", path.display()),
        }
    }
}

/// Targets of the three logical streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamTargets {
    pub input: StreamTarget,
    pub output: StreamTarget,
    pub error: StreamTarget,
}

impl Default for StreamTargets {
    fn default() -> Self {
        Self {
            input: StreamTarget::Stdin,
            output: StreamTarget::Stdout,
            error: StreamTarget::Stderr,
        }
    }
}

impl StreamTargets {
    /// Returns the target bound to a stream.
    pub fn get(&self, stream: Stream) -> &StreamTarget {
        match stream {
            Stream::Input => &self.input,
            Stream::Output => &self.output,
            Stream::Error => &self.error,
        }
    }
}

/// Message verbosity, from least to most chatty.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Silent,
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

/// Stack of verbosity levels. The base level is never popped.
///
/// # Examples
///
/// ```
/// use argspec_parser::{Verbosity, VerbosityStack};
///
/// let mut stack = VerbosityStack::default();
/// assert!(stack.admits(Verbosity::Normal));
///
/// stack.push(Verbosity::Quiet);
/// assert!(!stack.admits(Verbosity::Normal));
/// assert!(stack.admits(Verbosity::Quiet));
///
/// assert_eq!(stack.pop(), Some(Verbosity::Quiet));
/// assert_eq!(stack.pop(), None);
/// assert_eq!(stack.current(), Verbosity::Normal);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerbosityStack {
    base: Verbosity,
    pushed: Vec<Verbosity>,
}

impl VerbosityStack {
    /// Creates a stack with the given base level.
    pub fn new(base: Verbosity) -> Self {
        Self {
            base,
            pushed: Vec::new(),
        }
    }

    /// Makes `level` current until the matching [`pop`](Self::pop).
    pub fn push(&mut self, level: Verbosity) {
        self.pushed.push(level);
    }

    /// Restores the previous level. Returns `None` at the base level.
    pub fn pop(&mut self) -> Option<Verbosity> {
        self.pushed.pop()
    }

    /// Returns the current level.
    pub fn current(&self) -> Verbosity {
        self.pushed.last().copied().unwrap_or(self.base)
    }

    /// Returns `true` if a message at `level` should be written.
    pub fn admits(&self, level: Verbosity) -> bool {
        let current = self.current();
        current != Verbosity::Silent && level <= current
    }
}

/// Blocking text I/O used by the parser and the prompt helper.
pub trait Console {
    /// Writes text to a stream as-is.
    fn write(&mut self, text: &str, stream: Stream) -> io::Result<()>;

    /// Reads one line without its terminator. `None` at end of input.
    fn read_line(&mut self, stream: Stream) -> io::Result<Option<String>>;

    /// Returns the verbosity stack.
    fn verbosity(&mut self) -> &mut VerbosityStack;

    /// Writes text if the current verbosity admits `level`.
    fn emit(&mut self, level: Verbosity, text: &str, stream: Stream) -> io::Result<()> {
        if self.verbosity().admits(level) {
            self.write(text, stream)
        } else {
            Ok(())
        }
    }
}

/// Console backed by process streams or files.
#[derive(Debug, Default)]
pub struct StdConsole {
    targets: StreamTargets,
    readers: HashMap<Stream, BufReader<File>>,
    verbosity: VerbosityStack,
}

impl StdConsole {
    /// Creates a console on stdin, stdout and stderr.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a console with explicit stream targets.
    pub fn with_targets(targets: StreamTargets) -> Self {
        Self {
            targets,
            ..Default::default()
        }
    }

    /// Returns the configured targets.
    pub fn targets(&self) -> &StreamTargets {
        &self.targets
    }
}

impl Console for StdConsole {
    fn write(&mut self, text: &str, stream: Stream) -> io::Result<()> {
        match self.targets.get(stream) {
            StreamTarget::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(text.as_bytes())?;
                out.flush()
            }
            StreamTarget::Stderr => {
                let mut err = io::stderr().lock();
                err.write_all(text.as_bytes())?;
                err.flush()
            }
            StreamTarget::File(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(text.as_bytes())
            }
            StreamTarget::Stdin => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "cannot write to stdin",
            )),
        }
    }

    fn read_line(&mut self, stream: Stream) -> io::Result<Option<String>> {
        let mut line = String::new();
        let read = match self.targets.get(stream) {
            StreamTarget::Stdin => io::stdin().lock().read_line(&mut line)?,
            StreamTarget::File(path) => {
                let reader = match self.readers.entry(stream) {
                    std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
                    std::collections::hash_map::Entry::Vacant(entry) => {
                        entry.insert(BufReader::new(File::open(path)?))
                    }
                };
                reader.read_line(&mut line)?
            }
            StreamTarget::Stdout | StreamTarget::Stderr => {
                return Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    format!("cannot read from {}", self.targets.get(stream)),
                ));
            }
        };
        Ok((read > 0).then(|| trim_line_ending(line)))
    }

    fn verbosity(&mut self) -> &mut VerbosityStack {
        &mut self.verbosity
    }
}

/// In-memory console.
///
/// # Examples
///
/// ```
/// use argspec_parser::{BufferConsole, Console, Stream};
///
/// let mut console = BufferConsole::with_input(["yes"]);
/// console.write("Continue? ", Stream::Output).unwrap();
/// assert_eq!(console.read_line(Stream::Input).unwrap().as_deref(), Some("yes"));
/// assert_eq!(console.read_line(Stream::Input).unwrap(), None);
/// assert_eq!(console.output(), "Continue? ");
/// ```
#[derive(Debug, Default)]
pub struct BufferConsole {
    input: VecDeque<String>,
    output: String,
    error: String,
    verbosity: VerbosityStack,
}

impl BufferConsole {
    /// Creates a console with no queued input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a console that will serve the given input lines in order.
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Queues another input line.
    pub fn push_input(&mut self, line: &str) {
        self.input.push_back(line.to_string());
    }

    /// Returns everything written to the output stream.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Returns everything written to the error stream.
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Clears captured output and error text.
    pub fn clear(&mut self) {
        self.output.clear();
        self.error.clear();
    }
}

impl Console for BufferConsole {
    fn write(&mut self, text: &str, stream: Stream) -> io::Result<()> {
        match stream {
            Stream::Output => self.output.push_str(text),
            Stream::Error => self.error.push_str(text),
            Stream::Input => {
                return Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    "cannot write to the input stream",
                ));
            }
        }
        Ok(())
    }

    fn read_line(&mut self, stream: Stream) -> io::Result<Option<String>> {
        match stream {
            Stream::Input => Ok(self.input.pop_front()),
            _ => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "can only read from the input stream",
            )),
        }
    }

    fn verbosity(&mut self) -> &mut VerbosityStack {
        &mut self.verbosity
    }
}

fn trim_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}
