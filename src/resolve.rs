//! Core resolution: merge command-line input with config-file defaults.
//!
//! Precedence, per option:
//!
//! ```text
//! registration default
//!        ↑ overridden by
//! top-level / root-table value
//!        ↑ overridden by
//! override-table value
//!        ↑ overridden by
//! explicit command-line value
//! ```
//!
//! Steps, strictly in order:
//!
//! 1. Sniff the helper options from the tokens (unknown flags tolerated)
//! 2. Parse the tokens and an empty token list through the declared options;
//!    an option whose two values differ is *explicit*
//! 3. No config path: strict parse of the tokens, strip helpers, done
//! 4. Load the config file
//! 5-7. Compute the layered defaults (see [`merge`](crate::merge))
//! 8. Apply them to the registry: update declared defaults, synthesize or
//!    reject unknown keys
//! 9. Strict parse of the tokens against the updated registry; explicit
//!    options keep their typed value
//! 10. Strip helpers
//!
//! Explicit detection compares values, so an option typed with a value equal
//! to its default counts as not given and the config file wins for it.

use std::ffi::OsString;
use std::path::Path;

use toml::Table;

use crate::cli;
use crate::error::TomlParseError;
use crate::file;
use crate::flatten::table_names;
use crate::merge;
use crate::namespace::Namespace;
use crate::registry::{self, HELPER_NAMES, Registry};
use crate::types::{OptionKind, UnknownKeyPolicy};
use crate::validate;

/// Everything a resolve call needs besides the tokens.
pub struct Resolver<'a> {
    pub name: &'a str,
    pub about: Option<&'a str>,
    pub registry: &'a mut Registry,
    pub unknown_keys: UnknownKeyPolicy,
}

/// Values of the helper options. Empty strings count as absent.
#[derive(Debug, Default, PartialEq)]
pub struct Helpers {
    pub config: Option<String>,
    pub root_table: Option<String>,
    pub table: Option<String>,
}

impl Helpers {
    fn from_namespace(namespace: &Namespace) -> Self {
        let get = |key: &str| {
            namespace
                .get_str(key)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            config: get(registry::CONFIG),
            root_table: get(registry::ROOT_TABLE),
            table: get(registry::TABLE),
        }
    }

    /// Tables the defaults are drawn from, highest priority first.
    fn sections(&self) -> Vec<&str> {
        [self.table.as_deref(), self.root_table.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }
}

impl Resolver<'_> {
    pub fn resolve(&mut self, tokens: &[OsString]) -> Result<Namespace, TomlParseError> {
        let helpers = self.sniff_helpers(tokens)?;
        let (typed, explicit) = self.detect_explicit(tokens)?;

        let Some(config_path) = helpers.config.as_deref() else {
            tracing::debug!(event = "tomlparse.resolve.no_config");
            return self.final_parse(tokens, &typed, &explicit);
        };

        let config = file::load_config(Path::new(config_path))?;
        let defaults = merge::layered_defaults(
            &config.tree,
            helpers.root_table.as_deref(),
            helpers.table.as_deref(),
        )?;

        tracing::debug!(
            event = "tomlparse.resolve.defaults_layered",
            path = %config.path.display(),
            root_table = helpers.root_table.as_deref().unwrap_or(""),
            table = helpers.table.as_deref().unwrap_or(""),
            tables = ?table_names(&config.tree),
            keys = defaults.len()
        );

        if self.unknown_keys == UnknownKeyPolicy::Reject {
            reject_helper_keys(&defaults)?;
            validate::reject_unknown_keys(self.registry, &defaults, &config, &helpers.sections())?;
        }
        self.apply_defaults(defaults)?;

        self.final_parse(tokens, &typed, &explicit)
    }

    /// Step 1: the helper values, ignoring every non-helper token.
    fn sniff_helpers(&self, tokens: &[OsString]) -> Result<Helpers, TomlParseError> {
        let helpers = self.registry.helpers();
        let known = cli::retain_known(helpers, tokens);
        let namespace = cli::parse_tokens(self.name, self.about, helpers, &known)?;
        Ok(Helpers::from_namespace(&namespace))
    }

    /// Step 2: the "as typed" namespace and the names of explicit options.
    fn detect_explicit(
        &self,
        tokens: &[OsString],
    ) -> Result<(Namespace, Vec<String>), TomlParseError> {
        let options = self.registry.options();
        let known = cli::retain_known(options, tokens);
        let pure_defaults = cli::parse_tokens(self.name, self.about, options, &[])?;
        let typed = cli::parse_tokens(self.name, self.about, options, &known)?;

        let explicit: Vec<String> = typed
            .iter()
            .filter(|(key, value)| pure_defaults.get(key) != Some(*value))
            .map(|(key, _)| key.to_string())
            .collect();

        tracing::debug!(event = "tomlparse.resolve.explicit_detected", options = ?explicit);
        Ok((typed, explicit))
    }

    /// Step 8: push merged defaults into the registry.
    fn apply_defaults(&mut self, defaults: Table) -> Result<(), TomlParseError> {
        for (key, value) in defaults {
            if Registry::is_helper(&key) {
                return Err(TomlParseError::ReservedName(key));
            }
            if self.registry.find(&key).is_some() {
                self.registry.set_default(&key, value)?;
                continue;
            }

            let kind = OptionKind::classify(&value).ok_or_else(|| {
                TomlParseError::UnsupportedValue {
                    key: key.clone(),
                    kind: value.type_str(),
                }
            })?;
            match self.unknown_keys {
                UnknownKeyPolicy::Synthesize => {
                    self.registry.synthesize(&key, value)?;
                    tracing::debug!(
                        event = "tomlparse.resolve.option_synthesized",
                        option = %key,
                        kind = %kind
                    );
                }
                UnknownKeyPolicy::Reject => {
                    return Err(TomlParseError::NotDeclared(key));
                }
            }
        }
        Ok(())
    }

    /// Steps 9 and 10.
    ///
    /// Options seen in step 2 take their typed value when explicit and their
    /// (possibly merged) default otherwise. Options synthesized since then
    /// keep whatever the final parse gave them.
    fn final_parse(
        &self,
        tokens: &[OsString],
        typed: &Namespace,
        explicit: &[String],
    ) -> Result<Namespace, TomlParseError> {
        let mut resolved =
            cli::parse_tokens(self.name, self.about, self.registry.options(), tokens)?;
        for (key, typed_value) in typed.iter() {
            let value = if explicit.iter().any(|e| e == key) {
                typed_value.clone()
            } else {
                match self.registry.find(key) {
                    Some(option) => option.default.clone(),
                    None => continue,
                }
            };
            resolved.insert(key, value);
        }
        resolved.strip(HELPER_NAMES);
        Ok(resolved)
    }
}

fn reject_helper_keys(defaults: &Table) -> Result<(), TomlParseError> {
    match defaults.keys().find(|key| Registry::is_helper(key)) {
        Some(key) => Err(TomlParseError::ReservedName(key.clone())),
        None => Ok(()),
    }
}
