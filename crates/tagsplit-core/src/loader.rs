use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::parse;
use crate::parse::spec::SwaggerDocument;

/// Source of parsed specification documents.
pub trait SpecLoader {
    fn load(&self, path: &Path) -> Result<SwaggerDocument, LoadError>;
}

/// Reads specs from disk. `.json` files are parsed as JSON, anything else as YAML.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSpecLoader;

impl SpecLoader for FileSpecLoader {
    fn load(&self, path: &Path) -> Result<SwaggerDocument, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
        let parsed = match ext {
            "json" => parse::from_json(&content),
            _ => parse::from_yaml(&content),
        };

        parsed.map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("spec.json");
        let yaml_path = dir.path().join("spec.yml");
        fs::write(&json_path, r#"{"swagger": "2.0", "paths": {"/a": {"get": {}}}}"#).unwrap();
        fs::write(&yaml_path, "swagger: '2.0'\npaths:\n  /a:\n    get: {}\n").unwrap();

        let from_json = FileSpecLoader.load(&json_path).unwrap();
        let from_yaml = FileSpecLoader.load(&yaml_path).unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSpecLoader.load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_parse_error_keeps_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{").unwrap();
        match FileSpecLoader.load(&path).unwrap_err() {
            LoadError::Parse { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected parse error, got {other}"),
        }
    }
}
