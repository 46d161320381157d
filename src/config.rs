//! Builder configuration.
//!
//! Plain data with a `Default`, like component props: override only what you
//! need with `..Default::default()`, or deserialize it from a document.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::Value;

/// What to do when a document registers an `id` that is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateIds {
    /// Later registration wins (logged as a warning).
    #[default]
    Replace,
    /// Fail the construction pass with a definition error.
    Reject,
}

/// Settings for one builder session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Base directory for relative branch document paths.
    pub document_root: Option<PathBuf>,
    /// Policy for repeated `id` registrations.
    pub duplicate_ids: DuplicateIds,
    /// Raise `<<SubtreeAdded>>` on the parent after each successful graft.
    pub notify_parent: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            document_root: None,
            duplicate_ids: DuplicateIds::Replace,
            notify_parent: true,
        }
    }
}

impl BuilderConfig {
    /// Read a configuration from a loaded document value.
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| Error::definition("config", e.to_string()))
    }

    /// Resolve a branch document path against `document_root`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.document_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}
