//! Parse results.
//!
//! A [`ParseResult`] is an ordered mapping from output key to [`Value`],
//! plus the active command, the stand-alone tokens and the unknown options
//! met while parsing. It serializes as a single map in which `command`,
//! `stand_alones` and `unknowns` are reserved keys:
//!
//! ```json
//! { "command": "init", "directory": "./", "stand_alones": ["src"] }
//! ```

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Value stored for one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A flag that was present.
    Flag(bool),
    /// A single-valued option.
    Single(String),
    /// A repeating option, in encounter order.
    Multi(Vec<String>),
}

impl Value {
    /// Returns the value of a single-valued option.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Single(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the values of a repeating option.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::Multi(values) => Some(values),
            _ => None,
        }
    }

    /// Returns `true` for a set flag.
    pub fn is_flag(&self) -> bool {
        matches!(self, Value::Flag(true))
    }
}

/// Outcome of one successful parse.
///
/// # Examples
///
/// ```
/// use argspec_core::{ParseResult, Value};
///
/// let mut result = ParseResult::new();
/// result.set_command(Some("init".into()));
/// result.set_value("directory", "./".into(), false);
/// result.set_flag("verbose");
/// result.push_stand_alone("src".into());
///
/// assert_eq!(result.command(), Some("init"));
/// assert_eq!(result.value("directory"), Some("./"));
/// assert!(result.flag("verbose"));
/// assert!(!result.flag("quiet"));
///
/// let json = serde_json::to_value(&result).unwrap();
/// assert_eq!(
///     json,
///     serde_json::json!({
///         "command": "init",
///         "directory": "./",
///         "verbose": true,
///         "stand_alones": ["src"],
///     })
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    command: Option<String>,
    values: Vec<(String, Value)>,
    stand_alones: Vec<String>,
    unknowns: Vec<String>,
}

impl ParseResult {
    /// Creates an empty result in the default scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active command, `None` for the default scope.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Sets the active command.
    pub fn set_command(&mut self, command: Option<String>) {
        self.command = command;
    }

    /// Looks up the value stored under a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Returns `true` if the key holds any value.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns `true` if the key holds a set flag.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(Value::is_flag)
    }

    /// Returns the value of a single-valued option.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns the values of a repeating option.
    pub fn list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(Value::as_list)
    }

    /// Iterates over keys and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stores `true` under the key.
    pub fn set_flag(&mut self, key: &str) {
        self.put(key, Value::Flag(true));
    }

    /// Stores a value under the key. With `repeats`, the value is appended
    /// to the key's list; otherwise it replaces any previous value.
    pub fn set_value(&mut self, key: &str, value: String, repeats: bool) {
        if !repeats {
            self.put(key, Value::Single(value));
            return;
        }
        match self.get_mut(key) {
            Some(Value::Multi(values)) => values.push(value),
            Some(other) => *other = Value::Multi(vec![value]),
            None => self.values.push((key.to_string(), Value::Multi(vec![value]))),
        }
    }

    /// Stores a value only if the key is still absent.
    pub fn set_default(&mut self, key: &str, value: Value) {
        if !self.contains(key) {
            self.values.push((key.to_string(), value));
        }
    }

    /// Returns the positional tokens.
    pub fn stand_alones(&self) -> &[String] {
        &self.stand_alones
    }

    /// Records a positional token.
    pub fn push_stand_alone(&mut self, token: String) {
        self.stand_alones.push(token);
    }

    /// Returns the unknown options in encounter order.
    pub fn unknowns(&self) -> &[String] {
        &self.unknowns
    }

    /// Records an unknown option.
    pub fn push_unknown(&mut self, option: String) {
        self.unknowns.push(option);
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.values
            .iter_mut()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    fn put(&mut self, key: &str, value: Value) {
        match self.get_mut(key) {
            Some(existing) => *existing = value,
            None => self.values.push((key.to_string(), value)),
        }
    }
}

impl Serialize for ParseResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(command) = &self.command {
            map.serialize_entry("command", command)?;
        }
        for (key, value) in &self.values {
            map.serialize_entry(key, value)?;
        }
        if !self.stand_alones.is_empty() {
            map.serialize_entry("stand_alones", &self.stand_alones)?;
        }
        if !self.unknowns.is_empty() {
            map.serialize_entry("unknowns", &self.unknowns)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeating_values_accumulate_in_order() {
        let mut result = ParseResult::new();
        result.set_value("tag", "one".into(), true);
        result.set_value("tag", "two".into(), true);

        assert_eq!(
            result.list("tag"),
            Some(&["one".to_string(), "two".to_string()][..])
        );
    }

    #[test]
    fn test_single_value_is_replaced() {
        let mut result = ParseResult::new();
        result.set_value("input", "a".into(), false);
        result.set_value("input", "b".into(), false);

        assert_eq!(result.value("input"), Some("b"));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_default_does_not_override() {
        let mut result = ParseResult::new();
        result.set_value("format", "json".into(), false);
        result.set_default("format", Value::Single("text".into()));
        result.set_default("level", Value::Single("info".into()));

        assert_eq!(result.value("format"), Some("json"));
        assert_eq!(result.value("level"), Some("info"));
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut result = ParseResult::new();
        result.set_flag("b");
        result.set_flag("a");
        result.set_value("c", "x".into(), false);

        let keys: Vec<&str> = result.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_serialize_omits_empty_reserved_keys() {
        let mut result = ParseResult::new();
        result.set_flag("verbose");

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"verbose":true}"#);
    }

    #[test]
    fn test_serialize_reserved_keys() {
        let mut result = ParseResult::new();
        result.set_value("m", "one".into(), true);
        result.push_unknown("x".into());

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"m":["one"],"unknowns":["x"]}"#);
    }
}
