//! Config file loading.
//!
//! The file is read fully and closed before parsing. A missing file is its
//! own error so the user sees the path they typed rather than an OS error.
//! Other I/O failures (permissions, directories) keep their source.

use std::path::{Path, PathBuf};

use toml::Table;

use crate::error::TomlParseError;

/// A loaded config file: where it came from, its text, and the parsed tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub content: String,
    pub tree: Table,
}

/// Read and parse the config file at `path`.
pub fn load_config(path: &Path) -> Result<ConfigFile, TomlParseError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(TomlParseError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(TomlParseError::IoError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let tree: Table = toml::from_str(&content).map_err(|e| TomlParseError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(
        event = "tomlparse.config.loaded",
        path = %path.display(),
        keys = tree.len()
    );

    Ok(ConfigFile {
        path: path.to_path_buf(),
        content,
        tree,
    })
}

/// Load the config file at `path` as a plain table, with the same errors
/// a `--config` path would produce.
pub fn load_from_toml(path: impl AsRef<Path>) -> Result<Table, TomlParseError> {
    load_config(path.as_ref()).map(|file| file.tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{CONFIG_TOML, config_file};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_existing_file() {
        let (_dir, path) = config_file(CONFIG_TOML);
        let file = load_config(&path).unwrap();
        assert_eq!(file.path, path);
        assert_eq!(file.content, CONFIG_TOML);
        assert_eq!(file.tree["foo"].as_integer(), Some(10));
        assert_eq!(file.tree["bar"].as_str(), Some("hello"));
    }

    #[test]
    fn missing_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(&err, TomlParseError::ConfigNotFound { path: p } if p == &path));
        assert!(err.to_string().contains("missing.toml"));
        assert!(err.to_string().contains("doesn't exist"));
    }

    #[test]
    fn malformed_file_names_path() {
        let (_dir, path) = config_file("foo = = 1\n");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, TomlParseError::ParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn directory_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, TomlParseError::IoError { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_returns_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, path) = config_file("foo = 1\n");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

        let result = load_config(&path);
        // Running as root bypasses permission bits.
        if fs::read_to_string(&path).is_err() {
            assert!(matches!(result, Err(TomlParseError::IoError { .. })));
        }

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[test]
    fn load_from_toml_returns_the_tree() {
        let (_dir, path) = config_file(CONFIG_TOML);
        let tree = load_from_toml(&path).unwrap();
        assert_eq!(tree["general"]["foo"].as_integer(), Some(20));
    }

    #[test]
    fn empty_file_is_an_empty_tree() {
        let (_dir, path) = config_file("");
        let file = load_config(&path).unwrap();
        assert!(file.tree.is_empty());
    }
}
