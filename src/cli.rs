//! Clap adapter.
//!
//! The registry is the source of truth; clap only sees a snapshot of it. For
//! every parse a fresh [`clap::Command`] is built from the current option set,
//! so defaults updated by a config merge (and options synthesized from it)
//! show up in `--help` and in the parse without any mutation of clap state.
//!
//! Defaults are not handed to clap. clap reports what was on the command
//! line; [`namespace_from_matches`] fills in the registry default for
//! everything else.

use std::collections::HashMap;
use std::ffi::OsString;

use clap::{Arg, ArgAction, ArgMatches, Command};
use toml::Value;

use crate::namespace::{Namespace, format_value};
use crate::registry::DeclaredOption;
use crate::types::OptionKind;

/// Build a clap command exposing `options`.
pub fn build_command(name: &str, about: Option<&str>, options: &[DeclaredOption]) -> Command {
    let mut cmd = Command::new(name.to_string()).args_override_self(true);
    if let Some(about) = about {
        cmd = cmd.about(about.to_string());
    }
    for option in options {
        cmd = cmd.args(to_args(option));
    }
    cmd
}

fn to_args(option: &DeclaredOption) -> Vec<Arg> {
    let mut help = option.help.clone().unwrap_or_default();
    let shown_default = format_value(&option.default);
    if !shown_default.is_empty() {
        if !help.is_empty() {
            help.push(' ');
        }
        help.push_str(&format!("[default: {shown_default}]"));
    }

    let arg = Arg::new(option.name.clone())
        .long(option.long.clone())
        .aliases(option.aliases.iter().copied())
        .help(help);

    match option.kind {
        OptionKind::Flag => {
            let negated = negated_id(option);
            vec![
                arg.action(ArgAction::SetTrue)
                    .overrides_with(negated.clone()),
                Arg::new(negated.clone())
                    .long(negated)
                    .action(ArgAction::SetTrue)
                    .overrides_with(option.name.clone())
                    .help(format!("Disable --{}", option.long)),
            ]
        }
        OptionKind::Integer => vec![
            arg.action(ArgAction::Set)
                .value_name("INT")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64)),
        ],
        OptionKind::Float => vec![
            arg.action(ArgAction::Set)
                .value_name("FLOAT")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(f64)),
        ],
        OptionKind::String => vec![
            arg.action(ArgAction::Set)
                .value_name("STRING")
                .value_parser(clap::value_parser!(String)),
        ],
    }
}

/// Clap id (and long flag) of the `--no-*` form of a flag.
fn negated_id(option: &DeclaredOption) -> String {
    format!("no-{}", option.long)
}

/// Parse `tokens` (without the program name) against `options`.
pub fn parse_tokens(
    name: &str,
    about: Option<&str>,
    options: &[DeclaredOption],
    tokens: &[OsString],
) -> Result<Namespace, clap::Error> {
    let mut cmd = build_command(name, about, options);
    let argv = std::iter::once(OsString::from(name)).chain(tokens.iter().cloned());
    let matches = cmd.try_get_matches_from_mut(argv)?;
    Ok(namespace_from_matches(options, &matches))
}

/// One entry per option: the command-line value if present, else its default.
pub fn namespace_from_matches(options: &[DeclaredOption], matches: &ArgMatches) -> Namespace {
    let mut namespace = Namespace::new();
    for option in options {
        let id = option.name.as_str();
        let typed = match option.kind {
            OptionKind::Flag => {
                if matches.get_flag(id) {
                    Some(Value::Boolean(true))
                } else if matches.get_flag(&negated_id(option)) {
                    Some(Value::Boolean(false))
                } else {
                    None
                }
            }
            OptionKind::Integer => matches.get_one::<i64>(id).map(|v| Value::Integer(*v)),
            OptionKind::Float => matches.get_one::<f64>(id).map(|v| Value::Float(*v)),
            OptionKind::String => matches.get_one::<String>(id).cloned().map(Value::String),
        };
        namespace.insert(
            option.name.clone(),
            typed.unwrap_or_else(|| option.default.clone()),
        );
    }
    namespace
}

/// Keep only the tokens that belong to `options`.
///
/// Recognized: `--name`, `--name=value`, `--name value`, aliases, and
/// `--no-name` for flags. An unknown long option is dropped together with a
/// following token that looks like its value. Unknown short options, stray
/// positionals, and everything after `--` are dropped.
pub fn retain_known(options: &[DeclaredOption], tokens: &[OsString]) -> Vec<OsString> {
    let mut takes_value: HashMap<String, bool> = HashMap::new();
    for option in options {
        takes_value.insert(option.long.clone(), option.kind.takes_value());
        for alias in &option.aliases {
            takes_value.insert(alias.to_string(), option.kind.takes_value());
        }
        if let Some(negated) = option.negated_long() {
            takes_value.insert(negated, false);
        }
    }

    let mut kept = Vec::new();
    let mut iter = tokens.iter().peekable();
    while let Some(token) = iter.next() {
        let Some(text) = token.to_str() else {
            continue;
        };
        if text == "--" {
            break;
        }
        let Some(flag) = text.strip_prefix("--") else {
            continue;
        };
        let (flag, inline_value) = match flag.split_once('=') {
            Some((flag, _)) => (flag, true),
            None => (flag, false),
        };

        match takes_value.get(flag) {
            Some(&needs_value) => {
                kept.push(token.clone());
                if needs_value
                    && !inline_value
                    && let Some(value) = iter.next()
                {
                    kept.push(value.clone());
                }
            }
            None => {
                if !inline_value
                    && let Some(next) = iter.peek()
                    && next.to_str().is_some_and(looks_like_value)
                {
                    iter.next();
                }
            }
        }
    }
    kept
}

fn looks_like_value(token: &str) -> bool {
    !token.starts_with('-') || token.parse::<f64>().is_ok()
}
