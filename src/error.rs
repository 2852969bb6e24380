use std::path::PathBuf;

use clap::error::ErrorKind;
use thiserror::Error;

use crate::types::OptionKind;

#[derive(Debug, Error)]
pub enum TomlParseError {
    #[error("Argument '{0}' is already declared")]
    DuplicateArgument(String),

    #[error("Argument name '{0}' is reserved")]
    ReservedName(String),

    #[error("Invalid argument name '{0}'")]
    InvalidName(String),

    #[error("Argument '{0}' is not declared")]
    NotDeclared(String),

    #[error("Configuration file \"{path}\" doesn't exist")]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Specified root table \"{0}\" doesn't exist in the configuration file")]
    RootTableNotFound(String),

    #[error("No table \"{0}\" present in the configuration file")]
    TableNotFound(String),

    #[error("\"{name}\" is a {kind} in the configuration file, not a table")]
    NotATable { name: String, kind: &'static str },

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("{}", join_errors(.0))]
    UnknownKeys(Vec<TomlParseError>),

    #[error("Unsupported value for '{key}': expected a boolean, number or string, found {kind}")]
    UnsupportedValue { key: String, kind: &'static str },

    #[error("Invalid value for '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: OptionKind,
        found: &'static str,
    },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to edit {path}: {source}")]
    EditError {
        path: PathBuf,
        source: toml_edit::TomlError,
    },

    #[error(transparent)]
    Cli(#[from] clap::Error),
}

fn join_errors(errors: &[TomlParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl TomlParseError {
    /// Render this error through `cmd` so it is reported the way clap reports
    /// its own usage errors: `error: ...` plus the usage line, exit status 2.
    ///
    /// Errors that already came from clap are returned untouched.
    pub fn into_clap_error(self, cmd: &mut clap::Command) -> clap::Error {
        match self {
            TomlParseError::Cli(err) => err,
            other => {
                let kind = other.error_kind();
                cmd.error(kind, other)
            }
        }
    }

    fn error_kind(&self) -> ErrorKind {
        match self {
            TomlParseError::Cli(err) => err.kind(),
            TomlParseError::DuplicateArgument(_) | TomlParseError::ReservedName(_) => {
                ErrorKind::ArgumentConflict
            }
            TomlParseError::ConfigNotFound { .. }
            | TomlParseError::IoError { .. }
            | TomlParseError::EditError { .. } => ErrorKind::Io,
            TomlParseError::UnknownKey { .. } | TomlParseError::UnknownKeys(_) => {
                ErrorKind::UnknownArgument
            }
            TomlParseError::UnsupportedValue { .. }
            | TomlParseError::TypeMismatch { .. }
            | TomlParseError::InvalidValue { .. } => ErrorKind::ValueValidation,
            TomlParseError::InvalidName(_)
            | TomlParseError::NotDeclared(_)
            | TomlParseError::ParseError { .. }
            | TomlParseError::RootTableNotFound(_)
            | TomlParseError::TableNotFound(_)
            | TomlParseError::NotATable { .. } => ErrorKind::InvalidValue,
        }
    }
}
