//! Token classification.
//!
//! Maps one raw argument to its [`TokenShape`] without looking at any
//! declaration. Every token has exactly one shape.

use std::sync::LazyLock;

use regex::Regex;

/// Shape of a single argument token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenShape<'a> {
    /// `--name=value`
    LongWithValue { name: &'a str, value: &'a str },
    /// `--name`
    LongFlag(&'a str),
    /// `-abc`: one or more short option characters.
    ShortCluster(&'a str),
    /// Anything else.
    Positional(&'a str),
}

impl TokenShape<'_> {
    /// Returns `true` for tokens that do not look like options.
    pub fn is_positional(&self) -> bool {
        matches!(self, TokenShape::Positional(_))
    }
}

/// Regex patterns for argument tokens.
static PATTERNS: LazyLock<TokenPatterns> = LazyLock::new(TokenPatterns::new);

struct TokenPatterns {
    long_with_value: Regex,
    long_flag: Regex,
    short_cluster: Regex,
}

impl TokenPatterns {
    fn new() -> Self {
        Self {
            long_with_value: Regex::new(r"(?s)^--([A-Za-z][A-Za-z0-9_.-]*)=(.*)$")
                .expect("long option with value pattern is valid"),
            long_flag: Regex::new(r"^--([A-Za-z][A-Za-z0-9_.-]*)$")
                .expect("long flag pattern is valid"),
            short_cluster: Regex::new(r"(?s)^-([A-Za-z0-9].*)$")
                .expect("short cluster pattern is valid"),
        }
    }
}

/// Classifies a raw argument.
///
/// # Examples
///
/// ```
/// use argspec_parser::{TokenShape, classify};
///
/// assert_eq!(
///     classify("--input=a.txt"),
///     TokenShape::LongWithValue { name: "input", value: "a.txt" }
/// );
/// assert_eq!(classify("--verbose"), TokenShape::LongFlag("verbose"));
/// assert_eq!(classify("-vxf"), TokenShape::ShortCluster("vxf"));
/// assert_eq!(classify("file.txt"), TokenShape::Positional("file.txt"));
/// assert_eq!(classify("-"), TokenShape::Positional("-"));
/// ```
pub fn classify(token: &str) -> TokenShape<'_> {
    let patterns = &*PATTERNS;

    if let Some(caps) = patterns.long_with_value.captures(token) {
        if let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) {
            return TokenShape::LongWithValue {
                name: name.as_str(),
                value: value.as_str(),
            };
        }
    }

    if let Some(name) = patterns
        .long_flag
        .captures(token)
        .and_then(|caps| caps.get(1))
    {
        return TokenShape::LongFlag(name.as_str());
    }

    if let Some(cluster) = patterns
        .short_cluster
        .captures(token)
        .and_then(|caps| caps.get(1))
    {
        return TokenShape::ShortCluster(cluster.as_str());
    }

    TokenShape::Positional(token)
}
