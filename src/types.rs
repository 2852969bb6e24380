//! Value kinds, declaration specs, and parser policies.
//!
//! Every option has exactly one [`OptionKind`]. Kinds are inferred from a
//! default value (or a config value, for options synthesized during a merge)
//! by [`OptionKind::classify`], which is the single place where the set of
//! supported kinds is decided. Anything that does not classify (arrays,
//! datetimes, tables) is rejected by name instead of being coerced.

use std::fmt;

use toml::Value;

/// The value kind of a declared option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// A boolean switch, rendered as `--name` / `--no-name`.
    Flag,
    /// A signed 64-bit integer taking a value.
    Integer,
    /// A 64-bit float taking a value.
    Float,
    /// A string taking a value.
    String,
}

impl OptionKind {
    /// Classify a value. Returns `None` for kinds that cannot back an option.
    pub fn classify(value: &Value) -> Option<OptionKind> {
        match value {
            Value::Boolean(_) => Some(OptionKind::Flag),
            Value::Integer(_) => Some(OptionKind::Integer),
            Value::Float(_) => Some(OptionKind::Float),
            Value::String(_) => Some(OptionKind::String),
            Value::Datetime(_) | Value::Array(_) | Value::Table(_) => None,
        }
    }

    /// Whether the command-line form consumes a value token.
    pub fn takes_value(self) -> bool {
        self != OptionKind::Flag
    }

    /// Convert `value` to this kind. Only integer → float widening is
    /// performed; any other mismatch hands the value back unchanged.
    pub(crate) fn coerce(self, value: Value) -> Result<Value, Value> {
        match (self, value) {
            (OptionKind::Flag, v @ Value::Boolean(_))
            | (OptionKind::Integer, v @ Value::Integer(_))
            | (OptionKind::Float, v @ Value::Float(_))
            | (OptionKind::String, v @ Value::String(_)) => Ok(v),
            (OptionKind::Float, Value::Integer(i)) => Ok(Value::Float(i as f64)),
            (_, other) => Err(other),
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionKind::Flag => "boolean",
            OptionKind::Integer => "integer",
            OptionKind::Float => "float",
            OptionKind::String => "string",
        };
        f.write_str(name)
    }
}

/// What to do with a config key that matches no declared option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeyPolicy {
    /// Declare a new option whose kind is inferred from the config value.
    #[default]
    Synthesize,
    /// Fail with [`UnknownKey`](crate::TomlParseError::UnknownKey).
    Reject,
}

/// Declaration of a command-line option.
///
/// ```ignore
/// parser.add(Argument::new("--learning-rate", 0.01).help("Optimizer step size"))?;
/// parser.add(Argument::new("epochs", 10).kind(OptionKind::Float))?;
/// ```
///
/// The name may be written argparse-style with leading dashes, in which case
/// the remaining dashes become underscores in the option name
/// (`--learning-rate` → `learning_rate`). A bare name is used as-is. Either
/// way the option name is also the config-file key and the key in the
/// resolved [`Namespace`](crate::Namespace).
///
/// Only the leading `--` is stripped, so `"---x"` becomes the name `_x`. A
/// name whose long flag would be empty, start with `-` or contain `=` (such
/// as `_x` or `a=b`) is rejected with
/// [`InvalidName`](crate::TomlParseError::InvalidName) when declared.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub(crate) name: String,
    pub(crate) kind: Option<OptionKind>,
    pub(crate) default: Value,
    pub(crate) help: Option<String>,
}

impl Argument {
    pub fn new<V: Into<Value>>(name: &str, default: V) -> Self {
        let name = match name.strip_prefix("--") {
            Some(flag) => flag.replace('-', "_"),
            None => name.to_string(),
        };
        Self {
            name,
            kind: None,
            default: default.into(),
            help: None,
        }
    }

    /// Declare the kind explicitly instead of inferring it from the default.
    pub fn kind(mut self, kind: OptionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Help text shown by `--help`.
    pub fn help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_two_leading_dashes_are_stripped() {
        assert_eq!(Argument::new("---x", 1).name(), "_x");
        assert_eq!(Argument::new("--learning-rate", 1).name(), "learning_rate");
    }

    #[test]
    fn classify_scalars() {
        assert_eq!(
            OptionKind::classify(&Value::Boolean(true)),
            Some(OptionKind::Flag)
        );
        assert_eq!(
            OptionKind::classify(&Value::Integer(3)),
            Some(OptionKind::Integer)
        );
        assert_eq!(
            OptionKind::classify(&Value::Float(0.5)),
            Some(OptionKind::Float)
        );
        assert_eq!(
            OptionKind::classify(&Value::String("x".into())),
            Some(OptionKind::String)
        );
    }

    #[test]
    fn classify_rejects_containers() {
        assert_eq!(OptionKind::classify(&Value::Array(vec![])), None);
        assert_eq!(OptionKind::classify(&Value::Table(toml::Table::new())), None);
    }

    #[test]
    fn coerce_widens_integer_to_float() {
        assert_eq!(
            OptionKind::Float.coerce(Value::Integer(2)),
            Ok(Value::Float(2.0))
        );
    }

    #[test]
    fn coerce_refuses_narrowing_and_cross_kind() {
        assert!(OptionKind::Integer.coerce(Value::Float(2.5)).is_err());
        assert!(OptionKind::Flag.coerce(Value::String("true".into())).is_err());
        assert!(OptionKind::String.coerce(Value::Integer(1)).is_err());
    }

    #[test]
    fn dashed_name_becomes_underscored() {
        let arg = Argument::new("--learning-rate", 0.1);
        assert_eq!(arg.name(), "learning_rate");
    }

    #[test]
    fn bare_name_kept_verbatim() {
        let arg = Argument::new("batch-size", 32);
        assert_eq!(arg.name(), "batch-size");
    }

    #[test]
    fn unknown_key_policy_defaults_to_synthesize() {
        assert_eq!(UnknownKeyPolicy::default(), UnknownKeyPolicy::Synthesize);
    }
}
