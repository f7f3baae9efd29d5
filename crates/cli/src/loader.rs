use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

/// Parse YAML or JSON text (JSON is a subset of YAML).
pub fn parse_value(text: &str) -> Result<Value> {
    serde_yaml::from_str(text).context("invalid YAML/JSON")
}

/// Read and parse a YAML or JSON file.
pub fn read_value(path: &Path) -> Result<Value> {
    debug!(path = %path.display(), "reading file");
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_value(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Inline text, or the contents of a file when prefixed with `@`.
pub fn read_inline_or_file(arg: &str) -> Result<Value> {
    match arg.strip_prefix('@') {
        Some(path) => read_value(Path::new(path)),
        None => parse_value(arg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn parses_json_and_yaml() {
        assert_eq!(parse_value(r#"{"a": [1, 2]}"#).unwrap(), json!({"a": [1, 2]}));
        assert_eq!(parse_value("a: [1, 2]").unwrap(), json!({"a": [1, 2]}));
    }

    #[test]
    fn reads_file_via_at_prefix() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "platform: LANDSAT_8").unwrap();
        let arg = format!("@{}", file.path().display());
        assert_eq!(
            read_inline_or_file(&arg).unwrap(),
            json!({"platform": "LANDSAT_8"})
        );
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_value(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }
}
