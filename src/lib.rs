//! Command-line options whose defaults can come from a TOML file.
//!
//! Declare options the way you would with any argument parser, then let your
//! users keep the values they always pass in a checked-in config file. Named
//! tables in that file hold alternate setups (experiment variants, deploy
//! targets) that are selected from the command line.
//!
//! ```ignore
//! let parser = ArgumentParser::new("train")
//!     .arg(Argument::new("--epochs", 10))
//!     .arg(Argument::new("--learning-rate", 0.01));
//!
//! let args = parser.parse();
//! let epochs = args.get_integer("epochs");
//! ```
//!
//! ```text
//! $ train --config experiments.toml --table big --epochs 3
//! ```
//!
//! # Helper options
//!
//! Every parser has three options of its own:
//!
//! | Flag | Meaning |
//! |------|---------|
//! | `--config PATH` (or `--toml PATH`) | config file to read |
//! | `--root-table NAME` | table whose keys apply to every run |
//! | `--table NAME` | table whose keys override the root table |
//!
//! They configure the merge and are removed from the resolved [`Namespace`].
//! Without `--config` the parse is exactly a plain clap parse of the declared
//! options.
//!
//! # Layer precedence
//!
//! ```text
//! Registration default   Argument::new(name, default)
//!        ↑ overridden by
//! Root values            --root-table, else the file's top-level keys
//!        ↑ overridden by
//! Override values        --table
//!        ↑ overridden by
//! Command line           --name value
//! ```
//!
//! Tables are one level deep. Keys nested deeper than the selected table are
//! ignored, and with `--root-table` the top-level keys are still used for
//! anything the root table does not set.
//!
//! # Explicit values
//!
//! clap does not say whether a value came from the command line or from a
//! default, so an option counts as *explicitly given* when its parsed value
//! differs from its default. The known gap: typing the default value itself
//! (`--epochs 10` when the default is 10) looks like not typing it, and the
//! config file wins for that option.
//!
//! # Unknown config keys
//!
//! A key with no declared option is handled per [`UnknownKeyPolicy`]:
//!
//! - **[`Synthesize`](UnknownKeyPolicy::Synthesize)** (default) declares an
//!   option for it, typed after the config value. It shows up in `--help`
//!   and can be overridden from the command line in the same run.
//! - **[`Reject`](UnknownKeyPolicy::Reject)** (`.strict(true)`) fails with
//!   the file path, key and line:
//!
//! ```text
//! Unknown key 'lerning_rate' in experiments.toml (line 5)
//! ```
//!
//! Values must be booleans, integers, floats or strings. Arrays, datetimes
//! and tables in an option position are rejected with the key's name.
//!
//! # Writing back
//!
//! [`write_to_toml`] stores a resolved namespace in a config file, at the top
//! level or under a table, keeping the file's comments. [`load_from_toml`]
//! reads a file with the same errors `--config` reports.
//!
//! # Error handling
//!
//! All fallible operations return [`TomlParseError`]. The `parse`/`parse_from`
//! entry points and [`ArgumentParser::arg`] instead print the error the way
//! clap prints usage errors and exit with status 2. See the [`error`] module
//! for the full set.

pub mod error;
pub mod types;

mod cli;
mod file;
mod flatten;
pub(crate) mod merge;
mod namespace;
mod parser;
mod persist;
mod registry;
mod resolve;
mod validate;

#[cfg(test)]
mod fixtures;

pub use error::TomlParseError;
pub use file::load_from_toml;
pub use namespace::Namespace;
pub use parser::ArgumentParser;
pub use persist::{set_in_document, write_to_toml};
pub use registry::{CONFIG, DeclaredOption, HELPER_NAMES, ROOT_TABLE, TABLE};
pub use types::{Argument, OptionKind, UnknownKeyPolicy};
