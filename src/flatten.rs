//! Leaf extraction: drop nested tables from a config table.
//!
//! Only one level of tables carries meaning for default lookup. When a table
//! is used as a layer of defaults, its own sub-tables are not options, so they
//! are removed and every other key is kept as-is.

use toml::{Table, Value};

/// Return the entries of `table` whose values are not tables.
pub fn leaf_entries(table: &Table) -> Table {
    table
        .iter()
        .filter(|(_, value)| !value.is_table())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Names of the entries of `table` whose values are tables.
pub fn table_names(table: &Table) -> Vec<&str> {
    table
        .iter()
        .filter(|(_, value)| matches!(value, Value::Table(_)))
        .map(|(key, _)| key.as_str())
        .collect()
}
