//! Two-tier table layering: compute the default set a config file supplies.
//!
//! ```text
//! top-level leaf keys
//!        ↑ overridden by
//! root table leaf keys    --root-table NAME
//!        ↑ overridden by
//! override table leaves   --table NAME
//! ```
//!
//! All layers are sparse and merged key-by-key. Nested tables inside a layer
//! are ignored.

use toml::{Table, Value};

use crate::error::TomlParseError;
use crate::flatten::leaf_entries;

/// Shallow merge: every key of `overlay` replaces the same key in `base`.
pub fn layer(mut base: Table, overlay: Table) -> Table {
    for (key, value) in overlay {
        base.insert(key, value);
    }
    base
}

/// Base layer. With a root table, its leaves win over the top-level leaves;
/// without one, the top-level leaves alone.
pub fn base_layer(tree: &Table, root_table: Option<&str>) -> Result<Table, TomlParseError> {
    let top_level = leaf_entries(tree);
    match root_table {
        Some(name) => {
            let root = lookup_table(tree, name)
                .ok_or_else(|| TomlParseError::RootTableNotFound(name.to_string()))??;
            Ok(layer(top_level, leaf_entries(root)))
        }
        None => Ok(top_level),
    }
}

/// Override layer: the leaves of the named table, or nothing.
pub fn override_layer(tree: &Table, table: Option<&str>) -> Result<Table, TomlParseError> {
    match table {
        Some(name) => {
            let overrides = lookup_table(tree, name)
                .ok_or_else(|| TomlParseError::TableNotFound(name.to_string()))??;
            Ok(leaf_entries(overrides))
        }
        None => Ok(Table::new()),
    }
}

/// The merged default mapping: override layer over base layer.
pub fn layered_defaults(
    tree: &Table,
    root_table: Option<&str>,
    table: Option<&str>,
) -> Result<Table, TomlParseError> {
    let base = base_layer(tree, root_table)?;
    let overrides = override_layer(tree, table)?;
    Ok(layer(base, overrides))
}

/// `None` if `name` is absent, an error if it is present but not a table.
fn lookup_table<'a>(tree: &'a Table, name: &str) -> Option<Result<&'a Table, TomlParseError>> {
    tree.get(name).map(|value| match value {
        Value::Table(t) => Ok(t),
        other => Err(TomlParseError::NotATable {
            name: name.to_string(),
            kind: other.type_str(),
        }),
    })
}
