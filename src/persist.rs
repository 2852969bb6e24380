//! Write-back: store a resolved namespace in a TOML file.
//!
//! Uses `toml_edit` so an existing file keeps its comments, key order and
//! unrelated keys. Values go to the top level or into a named table, which is
//! created when missing. Creates parent directories as needed.

use std::path::Path;

use toml::Value;
use toml_edit::{DocumentMut, Item, TableLike};

use crate::error::TomlParseError;
use crate::namespace::Namespace;

/// Pure function: patch a TOML document string with every entry of `namespace`.
///
/// If `content` is `None` (file doesn't exist yet), starts from an empty
/// document. `path` is only used to name the file in errors.
///
/// Returns the modified document string.
pub fn set_in_document(
    path: &Path,
    content: Option<&str>,
    namespace: &Namespace,
    table: Option<&str>,
) -> Result<String, TomlParseError> {
    let mut doc: DocumentMut =
        content
            .unwrap_or_default()
            .parse()
            .map_err(|e| TomlParseError::EditError {
                path: path.to_path_buf(),
                source: e,
            })?;

    let target: &mut dyn TableLike = match table {
        None => doc.as_table_mut(),
        Some(name) => {
            let item = doc.as_table_mut().entry(name).or_insert_with(toml_edit::table);
            let kind = item.type_name();
            item.as_table_like_mut()
                .ok_or_else(|| TomlParseError::NotATable {
                    name: name.to_string(),
                    kind,
                })?
        }
    };

    for (key, value) in namespace.iter() {
        let item = toml_edit::value(edit_value(key, value)?);
        match target.get_mut(key) {
            Some(existing) => *existing = item,
            None => {
                target.insert(key, item);
            }
        }
    }

    Ok(doc.to_string())
}

/// I/O wrapper: reads the file (if it exists), patches it, writes it back.
pub fn write_to_toml(
    namespace: &Namespace,
    path: impl AsRef<Path>,
    table: Option<&str>,
) -> Result<(), TomlParseError> {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(c) => Some(c),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(TomlParseError::IoError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let new_content = set_in_document(path, content.as_deref(), namespace, table)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| TomlParseError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, &new_content).map_err(|e| TomlParseError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(
        event = "tomlparse.persist.written",
        path = %path.display(),
        table = table.unwrap_or(""),
        keys = namespace.len()
    );
    Ok(())
}

fn edit_value(key: &str, value: &Value) -> Result<toml_edit::Value, TomlParseError> {
    match value {
        Value::Boolean(b) => Ok((*b).into()),
        Value::Integer(i) => Ok((*i).into()),
        Value::Float(f) => Ok((*f).into()),
        Value::String(s) => Ok(s.as_str().into()),
        other => Err(TomlParseError::InvalidValue {
            key: key.to_string(),
            reason: format!("a {} cannot be written back", other.type_str()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn namespace() -> Namespace {
        let mut ns = Namespace::new();
        ns.insert("foo", 3);
        ns.insert("bar", "hey");
        ns.insert("cache", true);
        ns
    }

    fn set(content: Option<&str>, table: Option<&str>) -> Result<String, TomlParseError> {
        set_in_document(Path::new("config.toml"), content, &namespace(), table)
    }

    #[test]
    fn new_document_gets_every_key() {
        let result = set(None, None).unwrap();
        let tree: toml::Table = toml::from_str(&result).unwrap();
        assert_eq!(tree["foo"].as_integer(), Some(3));
        assert_eq!(tree["bar"].as_str(), Some("hey"));
        assert_eq!(tree["cache"].as_bool(), Some(true));
    }

    #[test]
    fn existing_keys_are_replaced_in_place() {
        let content = "# run settings\nfoo = 10 # epochs\nother = 1\n";
        let result = set(Some(content), None).unwrap();
        assert!(result.contains("# run settings"));
        assert!(result.contains("foo = 3"));
        assert!(result.contains("other = 1"));
        assert!(!result.contains("foo = 10"));
    }

    #[test]
    fn named_table_is_created() {
        let result = set(Some("foo = 10\n"), Some("main")).unwrap();
        let tree: toml::Table = toml::from_str(&result).unwrap();
        assert_eq!(tree["foo"].as_integer(), Some(10));
        assert_eq!(tree["main"]["foo"].as_integer(), Some(3));
        assert_eq!(tree["main"]["bar"].as_str(), Some("hey"));
    }

    #[test]
    fn existing_table_is_patched() {
        let content = "[main]\n# kept\nbar = \"old\"\nseed = 1\n";
        let result = set(Some(content), Some("main")).unwrap();
        assert!(result.contains("# kept"));
        assert!(result.contains("seed = 1"));
        assert!(result.contains("bar = \"hey\""));
    }

    #[test]
    fn non_table_target_is_rejected() {
        let err = set(Some("main = 1\n"), Some("main")).unwrap_err();
        assert!(matches!(err, TomlParseError::NotATable { name, .. } if name == "main"));
    }

    #[test]
    fn malformed_document_is_an_edit_error() {
        let err = set(Some("foo = = 1\n"), None).unwrap_err();
        assert!(matches!(err, TomlParseError::EditError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn array_values_are_rejected() {
        let mut ns = Namespace::new();
        ns.insert("layers", vec![64, 32]);
        let err = set_in_document(Path::new("c.toml"), None, &ns, None).unwrap_err();
        assert!(matches!(err, TomlParseError::InvalidValue { key, .. } if key == "layers"));
    }

    #[test]
    fn write_creates_file_and_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("runs").join("config.toml");

        write_to_toml(&namespace(), &path, Some("general")).unwrap();

        let tree: toml::Table = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(tree["general"]["foo"].as_integer(), Some(3));
    }

    #[test]
    fn write_modifies_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "# keep me\nfoo = 10\n").unwrap();

        write_to_toml(&namespace(), &path, None).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("# keep me"));
        assert!(content.contains("foo = 3"));
        assert!(!content.contains("10"));
    }
}
