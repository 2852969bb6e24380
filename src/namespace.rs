//! The resolved value set returned by a parse.

use std::fmt;
use std::ops::Index;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use toml::{Table, Value};

use crate::error::TomlParseError;

/// Option name → resolved value.
///
/// One entry per declared option after a parse; helper options are never
/// present. Values are `toml::Value` scalars, so a namespace can be written
/// straight back to a config file or deserialized into a typed struct:
///
/// ```ignore
/// #[derive(Deserialize)]
/// struct Train { foo: i64, bar: String }
///
/// let train: Train = parser.try_parse_from(args)?.deserialize_into()?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(Table);

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set `key`, returning the previous value.
    pub fn insert<V: Into<Value>>(&mut self, key: impl Into<String>, value: V) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Remove every key in `keys` that is present.
    pub fn strip<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        for key in keys {
            self.0.remove(key);
        }
    }

    /// Copy every entry of `other` into `self`; `other` wins on collision.
    pub fn merge(&mut self, other: Namespace) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_integer()
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_float()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Deserialize a single value.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, TomlParseError> {
        let value = self
            .get(key)
            .ok_or_else(|| TomlParseError::NotDeclared(key.to_string()))?;
        value
            .clone()
            .try_into()
            .map_err(|e: toml::de::Error| TomlParseError::InvalidValue {
                key: key.into(),
                reason: e.to_string(),
            })
    }

    /// Deserialize the whole namespace into `T`.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, TomlParseError> {
        Value::Table(self.0.clone())
            .try_into()
            .map_err(|e: toml::de::Error| TomlParseError::InvalidValue {
                key: "<namespace>".into(),
                reason: e.to_string(),
            })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_table(&self) -> &Table {
        &self.0
    }

    pub fn into_table(self) -> Table {
        self.0
    }
}

impl From<Table> for Namespace {
    fn from(table: Table) -> Self {
        Self(table)
    }
}

impl IntoIterator for Namespace {
    type Item = (String, Value);
    type IntoIter = <Table as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Panics if `key` is absent, like indexing a `toml::Table`.
impl Index<&str> for Namespace {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        &self.0[key]
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{key} = {}", format_value(value))?;
        }
        Ok(())
    }
}

/// Format a value for display.
pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}
