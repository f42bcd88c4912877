//! Option resolution.
//!
//! Resolves classified tokens against one command scope and writes into the
//! result accumulator. Each resolution step runs either with unknown logging
//! on (unknown options are recorded and stored under their raw key) or off
//! (unknown options are left for the default-scope pass).

use argspec_core::{DEFAULT_SCOPE, OptionSpec, OptionTable, ParseResult, RESERVED_KEYS};
use tracing::debug;

use crate::error::{Error, Result};
use crate::help::option_display_name;
use crate::token::classify;

/// Forward-only cursor over the argument tokens, shared with the resolver so
/// value-taking options can consume the following token.
#[derive(Debug)]
pub(crate) struct TokenCursor<'t> {
    tokens: &'t [String],
    position: usize,
}

impl<'t> TokenCursor<'t> {
    pub(crate) fn new(tokens: &'t [String]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Consumes the next token if it does not look like an option.
    pub(crate) fn next_bare(&mut self) -> Option<&'t str> {
        let token = self.tokens.get(self.position)?;
        if classify(token).is_positional() {
            self.position += 1;
            Some(token.as_str())
        } else {
            None
        }
    }
}

impl<'t> Iterator for TokenCursor<'t> {
    type Item = &'t str;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    Resolved,
    Unresolved,
}

pub(crate) struct Resolver<'a> {
    options: &'a OptionTable,
    result: &'a mut ParseResult,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(options: &'a OptionTable, result: &'a mut ParseResult) -> Self {
        Self { options, result }
    }

    /// Resolves a long option in `scope`, retrying in the default scope when
    /// `scope` does not know it.
    pub(crate) fn resolve_long(
        &mut self,
        name: &str,
        value: Option<&str>,
        scope: &str,
        cursor: &mut TokenCursor<'_>,
    ) -> Result<()> {
        if scope == DEFAULT_SCOPE {
            self.long(name, value, DEFAULT_SCOPE, true, cursor)?;
            return Ok(());
        }
        if self.long(name, value, scope, false, cursor)? == Resolution::Unresolved {
            debug!(option = name, command = scope, "Falling back to default scope");
            self.long(name, value, DEFAULT_SCOPE, true, cursor)?;
        }
        Ok(())
    }

    /// Resolves a short cluster in `scope`; characters `scope` does not know
    /// are retried together against the default scope.
    pub(crate) fn resolve_cluster(
        &mut self,
        cluster: &str,
        scope: &str,
        cursor: &mut TokenCursor<'_>,
    ) -> Result<()> {
        if scope == DEFAULT_SCOPE {
            self.cluster(cluster, DEFAULT_SCOPE, true, cursor)?;
            return Ok(());
        }
        let skipped = self.cluster(cluster, scope, false, cursor)?;
        if !skipped.is_empty() {
            debug!(options = %skipped, command = scope, "Falling back to default scope");
            self.cluster(&skipped, DEFAULT_SCOPE, true, cursor)?;
        }
        Ok(())
    }

    /// Records a positional token.
    pub(crate) fn stand_alone(&mut self, token: &str) {
        self.result.push_stand_alone(token.to_string());
    }

    /// Single-scope long option step.
    fn long(
        &mut self,
        name: &str,
        value: Option<&str>,
        scope: &str,
        log_unknowns: bool,
        cursor: &mut TokenCursor<'_>,
    ) -> Result<Resolution> {
        let options = self.options;
        let Some(spec) = options.get(scope, name) else {
            if log_unknowns {
                self.unknown(name, value);
            }
            return Ok(Resolution::Unresolved);
        };
        self.assign(spec, value, cursor)?;
        Ok(Resolution::Resolved)
    }

    /// Single-scope short cluster step. Returns the characters skipped
    /// because they are unknown in `scope` while logging is off.
    fn cluster(
        &mut self,
        cluster: &str,
        scope: &str,
        log_unknowns: bool,
        cursor: &mut TokenCursor<'_>,
    ) -> Result<String> {
        let options = self.options;
        let mut skipped = String::new();

        for (index, ch) in cluster.char_indices() {
            match options.get_short(scope, ch) {
                Some(spec) if spec.takes_value => {
                    let rest = &cluster[index + ch.len_utf8()..];
                    let attached = (!rest.is_empty()).then_some(rest);
                    self.assign(spec, attached, cursor)?;
                    break;
                }
                Some(spec) => self.result.set_flag(&spec.key()),
                None if log_unknowns => self.unknown(&ch.to_string(), None),
                None => skipped.push(ch),
            }
        }

        Ok(skipped)
    }

    fn assign(
        &mut self,
        spec: &OptionSpec,
        attached: Option<&str>,
        cursor: &mut TokenCursor<'_>,
    ) -> Result<()> {
        let key = spec.key();
        if !spec.takes_value {
            self.result.set_flag(&key);
            return Ok(());
        }

        let value = match attached {
            Some(value) => value.to_string(),
            None => match cursor.next_bare() {
                Some(next) => {
                    debug!(option = %key, value = next, "Took value from next token");
                    next.to_string()
                }
                None => spec
                    .default_value
                    .clone()
                    .ok_or_else(|| Error::MissingValue(option_display_name(spec)))?,
            },
        };
        self.result.set_value(&key, value, spec.repeats);
        Ok(())
    }

    /// Records an unknown option and stores it under its raw key, unless the
    /// key is one of the result's reserved keys.
    fn unknown(&mut self, name: &str, value: Option<&str>) {
        debug!(option = name, "Unknown option");
        self.result.push_unknown(name.to_string());
        if RESERVED_KEYS.contains(&name) {
            return;
        }
        match value {
            Some(value) => self.result.set_value(name, value.to_string(), false),
            None => self.result.set_flag(name),
        }
    }
}
