use std::ffi::OsString;

use clap::Command;
use toml::Value;

use crate::cli;
use crate::error::TomlParseError;
use crate::namespace::Namespace;
use crate::registry::{DeclaredOption, Registry};
use crate::resolve::Resolver;
use crate::types::{Argument, UnknownKeyPolicy};

/// A command-line parser whose defaults can come from a TOML file.
///
/// Every parser carries three helper options next to the ones you declare:
///
/// - `--config` (alias `--toml`): path of the config file to read.
/// - `--root-table`: table whose keys apply to every run, instead of the
///   file's top-level keys.
/// - `--table`: table whose keys override the root table.
///
/// Helpers never appear in the resolved [`Namespace`].
///
/// Parsing does not change the parser: config defaults and synthesized
/// options live only for the duration of one call, so the same parser can
/// resolve any number of token lists.
#[derive(Debug, Clone)]
pub struct ArgumentParser {
    name: String,
    about: Option<String>,
    registry: Registry,
    unknown_keys: UnknownKeyPolicy,
}

impl ArgumentParser {
    /// Create a parser. `name` is the program name shown in usage and help.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            about: None,
            registry: Registry::new(),
            unknown_keys: UnknownKeyPolicy::default(),
        }
    }

    /// Description shown at the top of `--help`.
    pub fn about(mut self, about: &str) -> Self {
        self.about = Some(about.to_string());
        self
    }

    /// Enable or disable strict mode (default: `false`).
    /// In strict mode, config keys with no declared option produce errors.
    pub fn strict(self, strict: bool) -> Self {
        self.unknown_keys(if strict {
            UnknownKeyPolicy::Reject
        } else {
            UnknownKeyPolicy::Synthesize
        })
    }

    /// Set the policy for config keys with no declared option
    /// (default: [`UnknownKeyPolicy::Synthesize`]).
    pub fn unknown_keys(mut self, policy: UnknownKeyPolicy) -> Self {
        self.unknown_keys = policy;
        self
    }

    /// Declare an option, exiting with a usage error if the declaration is
    /// invalid. The chaining counterpart of [`add`](Self::add).
    pub fn arg(mut self, arg: Argument) -> Self {
        if let Err(e) = self.add(arg) {
            self.exit(e);
        }
        self
    }

    /// Declare an option.
    pub fn add(&mut self, arg: Argument) -> Result<(), TomlParseError> {
        self.registry.declare(arg).map(|_| ())
    }

    /// Declare an option from a name and a default, inferring its kind.
    pub fn add_argument<V: Into<Value>>(
        &mut self,
        name: &str,
        default: V,
    ) -> Result<(), TomlParseError> {
        self.add(Argument::new(name, default))
    }

    pub fn find(&self, name: &str) -> Option<&DeclaredOption> {
        self.registry.find(name)
    }

    /// All options, the three helpers first.
    pub fn options(&self) -> &[DeclaredOption] {
        self.registry.options()
    }

    /// Replace the registration default of `name`.
    ///
    /// Works for helpers too, e.g. to read a config file unless the command
    /// line names another one.
    pub fn set_default<V: Into<Value>>(
        &mut self,
        name: &str,
        value: V,
    ) -> Result<(), TomlParseError> {
        self.registry.set_default(name, value.into())
    }

    /// The clap command for the declared options, as used without a config.
    pub fn command(&self) -> Command {
        cli::build_command(&self.name, self.about.as_deref(), self.registry.options())
    }

    /// Resolve `tokens` (without the program name).
    pub fn try_parse_from<I, T>(&self, tokens: I) -> Result<Namespace, TomlParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let tokens: Vec<OsString> = tokens.into_iter().map(Into::into).collect();
        let mut registry = self.registry.clone();
        Resolver {
            name: &self.name,
            about: self.about.as_deref(),
            registry: &mut registry,
            unknown_keys: self.unknown_keys,
        }
        .resolve(&tokens)
    }

    /// Resolve `tokens` into an existing namespace. Resolved values replace
    /// same-named entries; other entries are left alone.
    pub fn try_parse_into<I, T>(
        &self,
        tokens: I,
        namespace: &mut Namespace,
    ) -> Result<(), TomlParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        namespace.merge(self.try_parse_from(tokens)?);
        Ok(())
    }

    /// Like [`try_parse_from`](Self::try_parse_from), but prints the error
    /// (or help) and exits the process on failure.
    pub fn parse_from<I, T>(&self, tokens: I) -> Namespace
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        match self.try_parse_from(tokens) {
            Ok(namespace) => namespace,
            Err(e) => self.exit(e),
        }
    }

    /// Resolve the process's own arguments, exiting on failure.
    pub fn parse(&self) -> Namespace {
        self.parse_from(std::env::args_os().skip(1))
    }

    /// Report `err` the way clap reports usage errors and exit.
    pub fn exit(&self, err: TomlParseError) -> ! {
        err.into_clap_error(&mut self.command()).exit()
    }
}
