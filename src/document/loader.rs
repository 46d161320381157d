//! Document loaders.
//!
//! The builder only needs `load(path) -> Value`. [`FileLoader`] reads YAML or
//! JSON from disk; [`MemoryLoader`] serves documents registered in memory,
//! which keeps tests hermetic and lets applications embed their layouts.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Value;

/// Source of parsed documents.
pub trait DocumentLoader {
    /// Load and parse the document at `path`. Loads are synchronous and
    /// never retried.
    fn load(&self, path: &Path) -> Result<Value>;
}

/// Document syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Pick the syntax from a file extension. Anything that is not `.json`
    /// is read as YAML, which is also a superset of JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Parse document text. `path` is only used for error messages.
pub fn parse_str(source: &str, format: Format, path: &Path) -> Result<Value> {
    let parsed = match format {
        Format::Yaml => serde_yaml::from_str::<Value>(source).map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str::<Value>(source).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| Error::Parse {
        path: path.to_path_buf(),
        message,
    })
}

// =============================================================================
// File Loader
// =============================================================================

/// Reads documents from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl DocumentLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<Value> {
        let source = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded document {}", path.display());
        parse_str(&source, Format::from_path(path), path)
    }
}

// =============================================================================
// Memory Loader
// =============================================================================

/// Serves documents registered in memory, keyed by path.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    documents: RefCell<HashMap<PathBuf, Value>>,
    loads: Cell<usize>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already parsed document.
    pub fn insert(&self, path: impl Into<PathBuf>, document: Value) {
        self.documents.borrow_mut().insert(path.into(), document);
    }

    /// Parse and register a document, picking the syntax from the path.
    pub fn insert_str(&self, path: impl Into<PathBuf>, source: &str) -> Result<()> {
        let path = path.into();
        let document = parse_str(source, Format::from_path(&path), &path)?;
        self.insert(path, document);
        Ok(())
    }

    /// Builder-style variant of [`insert_str`](Self::insert_str).
    pub fn with(self, path: impl Into<PathBuf>, source: &str) -> Result<Self> {
        self.insert_str(path, source)?;
        Ok(self)
    }

    /// Number of successful loads served so far.
    pub fn load_count(&self) -> usize {
        self.loads.get()
    }
}

impl DocumentLoader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<Value> {
        let document = self.documents.borrow().get(path).cloned();
        match document {
            Some(document) => {
                self.loads.set(self.loads.get() + 1);
                Ok(document)
            }
            None => Err(Error::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such document"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.yml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("layout")), Format::Yaml);
    }

    #[test]
    fn test_yaml_keeps_key_order() {
        let value = parse_str("Root:\n  b: 1\n  a: 2\n  c: 3\n", Format::Yaml, Path::new("x")).unwrap();
        let keys: Vec<&String> = value["Root"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn test_yaml_and_json_agree() {
        let yaml = parse_str("Label:\n  text: hi\n  pack: [true]\n", Format::Yaml, Path::new("a")).unwrap();
        let json = parse_str(r#"{"Label": {"text": "hi", "pack": [true]}}"#, Format::Json, Path::new("b")).unwrap();
        assert_eq!(yaml, json);
    }

    #[test]
    fn test_parse_error_is_load_kind() {
        let err = parse_str("{ not json", Format::Json, Path::new("bad.json")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Load);
    }

    #[test]
    fn test_memory_loader() {
        let loader = MemoryLoader::new();
        loader.insert("root.yaml", json!({ "Root": {} }));
        assert_eq!(loader.load(Path::new("root.yaml")).unwrap(), json!({ "Root": {} }));
        assert_eq!(loader.load_count(), 1);

        let err = loader.load(Path::new("missing.yaml")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Load);
        assert_eq!(loader.load_count(), 1);
    }

    #[test]
    fn test_file_loader_missing_file() {
        let err = FileLoader.load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
