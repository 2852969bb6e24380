//! The set of declared options.
//!
//! The registry owns every option the parser knows about, in declaration
//! order, starting with the three helper options that steer the merge
//! (`config`, `root_table`, `table`). Helpers are always present and are
//! stripped from resolved output; their names are reserved.

use std::collections::HashSet;

use toml::Value;

use crate::error::TomlParseError;
use crate::types::{Argument, OptionKind};

/// Path to the configuration file (`--config` / `--toml`).
pub const CONFIG: &str = "config";
/// Table supplying the base default layer (`--root-table`).
pub const ROOT_TABLE: &str = "root_table";
/// Table supplying the override default layer (`--table`).
pub const TABLE: &str = "table";

/// Names of the helper options, in the order they are declared.
pub const HELPER_NAMES: [&str; 3] = [CONFIG, ROOT_TABLE, TABLE];

/// Long flags clap claims for itself.
const ENGINE_FLAGS: [&str; 1] = ["help"];

/// An option as held by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredOption {
    pub name: String,
    pub kind: OptionKind,
    pub default: Value,
    pub help: Option<String>,
    pub(crate) long: String,
    pub(crate) aliases: Vec<&'static str>,
    pub(crate) synthesized: bool,
}

impl DeclaredOption {
    /// Whether this option was created from a config key rather than declared.
    pub fn is_synthesized(&self) -> bool {
        self.synthesized
    }

    /// The long flag without leading dashes.
    pub fn long(&self) -> &str {
        &self.long
    }

    /// Long flag of the `--no-*` form, for flags.
    pub(crate) fn negated_long(&self) -> Option<String> {
        (self.kind == OptionKind::Flag).then(|| format!("no-{}", self.long))
    }

    /// Every long flag this option answers to on the command line.
    fn flag_names(&self) -> Vec<String> {
        let mut names = vec![self.long.clone()];
        names.extend(self.aliases.iter().map(|a| a.to_string()));
        names.extend(self.negated_long());
        names
    }
}

#[derive(Debug, Clone)]
pub struct Registry {
    options: Vec<DeclaredOption>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        let helper = |name: &str, aliases: Vec<&'static str>, help: &str| DeclaredOption {
            name: name.to_string(),
            kind: OptionKind::String,
            default: Value::String(String::new()),
            help: Some(help.to_string()),
            long: name.replace('_', "-"),
            aliases,
            synthesized: false,
        };
        Self {
            options: vec![
                helper(CONFIG, vec!["toml"], "Path to the configuration file"),
                helper(
                    ROOT_TABLE,
                    vec![],
                    "Table in the configuration file that counts for all runs. \
                     Defaults to the top-level keys without a [table]",
                ),
                helper(
                    TABLE,
                    vec![],
                    "Table in the configuration file whose keys override the root table",
                ),
            ],
        }
    }

    pub fn is_helper(name: &str) -> bool {
        HELPER_NAMES.contains(&name)
    }

    /// All options, helpers first.
    pub fn options(&self) -> &[DeclaredOption] {
        &self.options
    }

    /// The three helper options.
    pub fn helpers(&self) -> &[DeclaredOption] {
        &self.options[..HELPER_NAMES.len()]
    }

    pub fn find(&self, name: &str) -> Option<&DeclaredOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Register an option. The kind comes from `arg.kind` when given,
    /// otherwise from the default's own kind.
    pub fn declare(&mut self, arg: Argument) -> Result<&DeclaredOption, TomlParseError> {
        self.insert(arg, false)
    }

    /// Register an option discovered in a config file.
    pub(crate) fn synthesize(
        &mut self,
        key: &str,
        value: Value,
    ) -> Result<&DeclaredOption, TomlParseError> {
        self.insert(Argument::new(key, value), true)
    }

    fn insert(
        &mut self,
        arg: Argument,
        synthesized: bool,
    ) -> Result<&DeclaredOption, TomlParseError> {
        let Argument {
            name,
            kind,
            default,
            help,
        } = arg;

        let long = name.replace('_', "-");
        if !is_valid_long(&long) {
            return Err(TomlParseError::InvalidName(name));
        }
        if Self::is_helper(&name) {
            return Err(TomlParseError::ReservedName(name));
        }

        let inferred = OptionKind::classify(&default).ok_or_else(|| {
            TomlParseError::UnsupportedValue {
                key: name.clone(),
                kind: default.type_str(),
            }
        })?;
        let kind = kind.unwrap_or(inferred);
        let default = kind
            .coerce(default)
            .map_err(|found| TomlParseError::TypeMismatch {
                key: name.clone(),
                expected: kind,
                found: found.type_str(),
            })?;

        let option = DeclaredOption {
            long,
            name,
            kind,
            default,
            help,
            aliases: vec![],
            synthesized,
        };
        self.check_collision(&option)?;

        self.options.push(option);
        Ok(&self.options[self.options.len() - 1])
    }

    fn check_collision(&self, option: &DeclaredOption) -> Result<(), TomlParseError> {
        let new_flags = option.flag_names();
        if new_flags.iter().any(|f| ENGINE_FLAGS.contains(&f.as_str())) {
            return Err(TomlParseError::ReservedName(option.name.clone()));
        }

        for existing in &self.options {
            let taken: HashSet<String> = existing.flag_names().into_iter().collect();
            let clash = existing.name == option.name || new_flags.iter().any(|f| taken.contains(f));
            if !clash {
                continue;
            }
            return Err(if Self::is_helper(&existing.name) {
                TomlParseError::ReservedName(option.name.clone())
            } else {
                TomlParseError::DuplicateArgument(option.name.clone())
            });
        }
        Ok(())
    }

    /// Overwrite the default of an existing option, keeping its kind.
    pub fn set_default(&mut self, name: &str, value: Value) -> Result<(), TomlParseError> {
        let option = self
            .options
            .iter_mut()
            .find(|o| o.name == name)
            .ok_or_else(|| TomlParseError::NotDeclared(name.to_string()))?;

        option.default =
            option
                .kind
                .coerce(value)
                .map_err(|found| TomlParseError::TypeMismatch {
                    key: name.to_string(),
                    expected: option.kind,
                    found: found.type_str(),
                })?;
        Ok(())
    }
}

/// Whether `long` can be typed as `--long` and parsed back unambiguously.
fn is_valid_long(long: &str) -> bool {
    !long.is_empty()
        && !long.starts_with('-')
        && !long.contains('=')
        && !long.contains(char::is_whitespace)
}
