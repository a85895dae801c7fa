use std::fs;
use std::path::{Path, PathBuf};

use crate::tree::PageRecord;

/// File names Roam gives its JSON exports.
const EXPORT_PREFIX: &str = "Roam-Export-";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Unsupported export file: {0}")]
    UnsupportedExtension(PathBuf),
    #[error("No Roam exports in directory: {0}")]
    NoExports(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid export JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode a Roam JSON export: a list of pages
pub fn parse_export(json: &str) -> Result<Vec<PageRecord>, LoadError> {
    Ok(serde_json::from_str(json)?)
}

/// Load a `.json` export, or the latest `Roam-Export-*.json` in a directory
pub fn load_export(path: &Path) -> Result<Vec<PageRecord>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let file = if path.is_dir() {
        latest_export(path)?
    } else {
        path.to_path_buf()
    };
    if file.extension().is_none_or(|ext| ext != "json") {
        return Err(LoadError::UnsupportedExtension(file));
    }
    log::info!("Loading Roam export {}", file.display());
    parse_export(&fs::read_to_string(&file)?)
}

fn latest_export(dir: &Path) -> Result<PathBuf, LoadError> {
    let mut exports = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_export = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(EXPORT_PREFIX) && n.ends_with(".json"));
        if is_export {
            exports.push(path);
        }
    }
    exports.sort();
    exports
        .pop()
        .ok_or_else(|| LoadError::NoExports(dir.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EXPORT: &str = r#"[{"title": "Page", "children": [{"string": "q #ankify", "uid": "aaaaaaaaa"}]}]"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_json_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "graph.json", EXPORT);

        let pages = load_export(&path).unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].children[0].uid, "aaaaaaaaa");
    }

    #[test]
    fn test_directory_picks_latest_export() {
        // Given two exports and an unrelated file
        let dir = TempDir::new().unwrap();
        write(&dir, "Roam-Export-1600000000000.json", r#"[{"title": "Old"}]"#);
        write(&dir, "Roam-Export-1700000000000.json", r#"[{"title": "New"}]"#);
        write(&dir, "notes.json", r#"[{"title": "Other"}]"#);

        // When loading the directory
        let pages = load_export(dir.path()).unwrap();

        // Then the lexicographically last export wins
        assert_eq!(pages[0].title, "New");
    }

    #[test]
    fn test_directory_without_exports() {
        let dir = TempDir::new().unwrap();
        write(&dir, "notes.json", "[]");
        assert!(matches!(load_export(dir.path()), Err(LoadError::NoExports(_))));
    }

    #[test]
    fn test_missing_path() {
        let result = load_export(Path::new("/this/path/does/not/exist.json"));
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "graph.edn", "[]");
        assert!(matches!(load_export(&path), Err(LoadError::UnsupportedExtension(_))));
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_export(r#"[{"children": []}]"#).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
        assert!(err.to_string().starts_with("Invalid export JSON"));
    }
}
