//! Reject mode: report config keys that match no declared option.
//!
//! Each unknown key is reported with the config path and a best-effort line
//! number. Because the merged defaults no longer remember which layer a key
//! came from, the line search looks in the override table first, then the
//! root table, then the top level.

use toml::Table;

use crate::error::TomlParseError;
use crate::file::ConfigFile;
use crate::registry::Registry;

/// Fail if any key of `defaults` has no declared option.
///
/// `sections` lists the tables the defaults were drawn from, highest priority
/// first; the top level is always searched last.
pub fn reject_unknown_keys(
    registry: &Registry,
    defaults: &Table,
    file: &ConfigFile,
    sections: &[&str],
) -> Result<(), TomlParseError> {
    let errors: Vec<TomlParseError> = defaults
        .keys()
        .filter(|key| registry.find(key).is_none())
        .map(|key| TomlParseError::UnknownKey {
            key: key.clone(),
            path: file.path.clone(),
            line: locate_key(&file.content, key, sections),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(TomlParseError::UnknownKeys(errors))
    }
}

fn locate_key(content: &str, key: &str, sections: &[&str]) -> usize {
    sections
        .iter()
        .map(|&section| find_key_line(content, Some(section), key))
        .chain(std::iter::once_with(|| find_key_line(content, None, key)))
        .find(|&line| line != 0)
        .unwrap_or(0)
}

/// Find the 1-indexed line on which `key` is assigned inside `[section]`
/// (or at the top level for `None`).
///
/// Handles `[section]` headers and bare `key = value` lines only; quoted keys
/// and inline tables are not recognized. Returns 0 when not found.
fn find_key_line(content: &str, section: Option<&str>, key: &str) -> usize {
    let mut current: Option<String> = None;

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with('[') && !trimmed.starts_with("[[") {
            let header = trimmed.trim_start_matches('[').trim_end_matches(']').trim();
            current = Some(header.to_string());
            continue;
        }

        if current.as_deref() == section
            && let Some(after_key) = trimmed.strip_prefix(key)
            && after_key.trim_start().starts_with('=')
        {
            return i + 1;
        }
    }
    0
}
