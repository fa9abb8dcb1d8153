//! Pre-load checks for input files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::io::config::SourceConfig;

/// Read an input file after checking that it exists, has an accepted
/// extension and is not blank.
///
/// A leading UTF-8 byte-order mark is dropped. A file holding only whitespace
/// is rejected; an empty collection must be written as `[]`.
pub fn read_source(path: &Path, source: &SourceConfig) -> Result<String> {
    if !path.is_file() {
        bail!("File: {} does not exist.", path.display());
    }
    if !has_accepted_extension(path, &source.extensions) {
        bail!(
            "File: {} is not a {} file.",
            path.display(),
            describe_extensions(&source.extensions)
        );
    }
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let contents = match raw.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => raw,
    };
    if contents.trim().is_empty() {
        bail!(
            "File: {} is empty. Please include \"[]\" if you intended to pass in an empty array.",
            path.display()
        );
    }
    debug!(path = %path.display(), bytes = contents.len(), "source read");
    Ok(contents)
}

fn has_accepted_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|accepted| normalize(accepted).eq_ignore_ascii_case(ext))
}

fn normalize(extension: &str) -> &str {
    extension.trim().trim_start_matches('.')
}

fn describe_extensions(extensions: &[String]) -> String {
    extensions
        .iter()
        .map(|ext| format!(".{}", normalize(ext)))
        .collect::<Vec<_>>()
        .join(" or ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_only() -> SourceConfig {
        SourceConfig::default()
    }

    #[test]
    fn missing_file_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("missing.json");
        let err = read_source(&path, &json_only()).expect_err("expected error");
        assert!(err.to_string().ends_with("does not exist."));
    }

    #[test]
    fn directory_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("folder.json");
        fs::create_dir(&dir).expect("mkdir");
        let err = read_source(&dir, &json_only()).expect_err("expected error");
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn wrong_extension_is_rejected_before_reading() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("file.txt");
        fs::write(&path, "").expect("write");
        let err = read_source(&path, &json_only()).expect_err("expected error");
        assert!(err.to_string().contains("is not a .json file."));
    }

    #[test]
    fn extension_match_ignores_case() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("STATE.JSON");
        fs::write(&path, "[]").expect("write");
        assert_eq!(read_source(&path, &json_only()).expect("read"), "[]");
    }

    #[test]
    fn configured_extensions_are_accepted() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("rules.jsonc");
        fs::write(&path, "[]").expect("write");
        let source = SourceConfig {
            extensions: vec!["json".to_string(), ".jsonc".to_string()],
        };
        assert!(read_source(&path, &source).is_ok());
        assert!(read_source(&path, &json_only()).is_err());
    }

    #[test]
    fn leading_byte_order_mark_is_dropped() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("state.json");
        fs::write(&path, "\u{feff}[{\"Key\":\"a\",\"Value\":\"1\"}]").expect("write");
        let contents = read_source(&path, &json_only()).expect("read");
        assert_eq!(contents, "[{\"Key\":\"a\",\"Value\":\"1\"}]");
    }

    #[test]
    fn byte_order_mark_with_whitespace_is_blank() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("state.json");
        fs::write(&path, "\u{feff}  \n").expect("write");
        let err = read_source(&path, &json_only()).expect_err("expected error");
        assert!(err.to_string().contains("is empty"));
    }

    #[test]
    fn blank_file_requests_explicit_empty_array() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("state.json");
        fs::write(&path, " \n\t").expect("write");
        let err = read_source(&path, &json_only()).expect_err("expected error");
        assert!(err.to_string().contains("Please include \"[]\""));
    }
}
