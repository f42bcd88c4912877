//! Interactive prompt helper.
//!
//! Asks a question on the output stream, reads the answer from the input
//! stream and retries on answers outside the allowed set.

use tracing::debug;

use crate::console::{Console, Stream};
use crate::error::{Error, Result};

const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// A question with optional allowed answers and default.
///
/// # Examples
///
/// ```
/// use argspec_parser::{BufferConsole, Prompt};
///
/// let mut console = BufferConsole::with_input(["maybe", "Y"]);
/// let answer = Prompt::new("Overwrite?")
///     .with_answers(["y", "n"])
///     .with_default("n")
///     .ask(&mut console)
///     .unwrap();
///
/// assert_eq!(answer, "y");
/// assert_eq!(console.output(), "Overwrite? [y/n] (n): Overwrite? [y/n] (n): ");
/// assert_eq!(console.error(), "Please answer one of: y, n\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    question: String,
    answers: Vec<String>,
    default: Option<String>,
    max_attempts: usize,
}

impl Prompt {
    /// Creates a prompt accepting any non-empty answer.
    pub fn new(question: &str) -> Self {
        Self {
            question: question.to_string(),
            answers: Vec::new(),
            default: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Restricts answers to the given set (compared case-insensitively).
    pub fn with_answers<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.answers = answers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the answer used for an empty line.
    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    /// Sets how many answers are read before giving up. Zero counts as one.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Asks until a valid answer is given.
    ///
    /// Returns the allowed answer as declared, the typed answer when no set
    /// is declared, or the default for an empty line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PromptClosed`] at end of input,
    /// [`Error::PromptAttemptsExceeded`] after too many invalid answers, or
    /// [`Error::Io`] on console failures.
    pub fn ask<C: Console + ?Sized>(&self, console: &mut C) -> Result<String> {
        let attempts = self.max_attempts.max(1);
        let text = self.text();

        for attempt in 1..=attempts {
            console.write(&text, Stream::Output)?;
            let Some(line) = console.read_line(Stream::Input)? else {
                return Err(Error::PromptClosed);
            };

            if let Some(answer) = self.accept(line.trim()) {
                return Ok(answer);
            }

            debug!(attempt, answer = %line, "Rejected prompt answer");
            let complaint = if self.answers.is_empty() {
                "Please enter a value\n".to_string()
            } else {
                format!("Please answer one of: {}\n", self.answers.join(", "))
            };
            console.write(&complaint, Stream::Error)?;
        }

        Err(Error::PromptAttemptsExceeded(attempts))
    }

    fn accept(&self, answer: &str) -> Option<String> {
        if answer.is_empty() {
            return self.default.clone();
        }
        if self.answers.is_empty() {
            return Some(answer.to_string());
        }
        self.answers
            .iter()
            .find(|allowed| allowed.eq_ignore_ascii_case(answer))
            .cloned()
    }

    fn text(&self) -> String {
        let mut text = self.question.clone();
        if !self.answers.is_empty() {
            text.push_str(&format!(" [{}]", self.answers.join("/")));
        }
        if let Some(default) = &self.default {
            text.push_str(&format!(" ({default})"));
        }
        text.push_str(": ");
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::BufferConsole;

    #[test]
    fn test_empty_answer_uses_default() {
        let mut console = BufferConsole::with_input([""]);
        let answer = Prompt::new("Name")
            .with_default("world")
            .ask(&mut console)
            .unwrap();
        assert_eq!(answer, "world");
        assert_eq!(console.output(), "Name (world): ");
    }

    #[test]
    fn test_free_form_answer_rejects_empty_without_default() {
        let mut console = BufferConsole::with_input(["  ", " Ada "]);
        let answer = Prompt::new("Name").ask(&mut console).unwrap();
        assert_eq!(answer, "Ada");
        assert_eq!(console.error(), "Please enter a value\n");
    }

    #[test]
    fn test_answers_queued_between_asks() {
        let mut console = BufferConsole::new();
        console.push_input("n");
        let prompt = Prompt::new("Again?").with_answers(["y", "n"]);
        assert_eq!(prompt.ask(&mut console).unwrap(), "n");

        console.push_input("Y");
        assert_eq!(prompt.ask(&mut console).unwrap(), "y");
        assert!(matches!(prompt.ask(&mut console), Err(Error::PromptClosed)));
    }

    #[test]
    fn test_closed_input() {
        let mut console = BufferConsole::new();
        let err = Prompt::new("Name").ask(&mut console).unwrap_err();
        assert!(matches!(err, Error::PromptClosed));
    }

    #[test]
    fn test_attempts_exhausted() {
        let mut console = BufferConsole::with_input(["a", "b", "c", "y"]);
        let err = Prompt::new("Sure?")
            .with_answers(["y", "n"])
            .with_max_attempts(2)
            .ask(&mut console)
            .unwrap_err();
        assert!(matches!(err, Error::PromptAttemptsExceeded(2)));
        assert_eq!(console.error().lines().count(), 2);
    }
}
