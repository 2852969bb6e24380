#[cfg(test)]
pub mod test {
    use std::path::PathBuf;

    use tempfile::TempDir;

    use crate::parser::ArgumentParser;

    /// Top-level keys plus two tables.
    pub const CONFIG_TOML: &str = r#"
foo = 10
bar = "hello"

[general]
foo = 20

[main]
bar = "hey"
"#;

    /// Tables only; every default comes from `--root-table` / `--table`.
    pub const COMBINED_TOML: &str = r#"
[general]
foo = 20

[main]
bar = "hey"
"#;

    /// Write `content` as `config.toml` inside a fresh temp dir.
    ///
    /// Keep the `TempDir` alive for as long as the path is used.
    pub fn config_file(content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    /// Parser with `--foo` (integer, default 0) and `--bar` (string, default "").
    pub fn foo_bar_parser() -> ArgumentParser {
        let mut parser = ArgumentParser::new("test");
        parser.add_argument("--foo", 0).unwrap();
        parser.add_argument("--bar", "").unwrap();
        parser
    }

    #[test]
    fn fixture_config_parses() {
        let table: toml::Table = toml::from_str(CONFIG_TOML).unwrap();
        assert_eq!(table["foo"].as_integer(), Some(10));
        assert_eq!(table["general"]["foo"].as_integer(), Some(20));
        assert_eq!(table["main"]["bar"].as_str(), Some("hey"));
    }
}
