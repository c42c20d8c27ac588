//! Per-document metadata: the ordered key/value mapping read from front matter.

use serde::Serialize;
use serde_yaml::{Mapping, Value};

/// Canonical markup of the document body.
pub const CONTENT_KEY: &str = "content";
/// Stylesheet href relative to the document's own directory.
pub const STYLESHEET_KEY: &str = "_stylesheet_";
/// Resolved document language.
pub const LANG_KEY: &str = "lang";
/// Resolved document title.
pub const TITLE_KEY: &str = "title";

/// Ordered mapping of front-matter keys to typed values.
///
/// Keys keep the order in which they were declared. The compiler extends the
/// mapping in place with derived keys before handing it to a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FileMetadata {
    entries: Mapping,
}

impl FileMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_mapping(entries: Mapping) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace a value, keeping the original position of existing keys
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.entries.insert(Value::from(key), value.into());
    }

    /// Non-empty string value
    ///
    /// Numbers and booleans are not coerced; `title: 1984` is read as a string
    /// by YAML only when quoted.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Boolean flag; `"true"`/`"yes"` strings are accepted as well
    pub fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => {
                matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "on")
            }
            _ => false,
        }
    }

    /// Integer value, `0` when missing or not a number
    pub fn int(&self, key: &str) -> i64 {
        match self.get(key) {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// List of strings
    ///
    /// A sequence yields its scalar items; a single string is split on commas
    /// and whitespace, so `properties: nav, svg` reads as `["nav", "svg"]`.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(Value::String(s)) => s
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|part| !part.is_empty())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().filter_map(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
