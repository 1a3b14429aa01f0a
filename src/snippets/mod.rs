//! Named program snippets stored on disk.
//!
//! Each snippet is one `<name>.json` file holding `{"name": ..., "code": ...}`.
//! Names are restricted to letters, digits, `-` and `_` so they map to a
//! single file inside the store directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

mod example;

pub use example::EXAMPLE_PROGRAM;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Error)]
pub enum SnippetError {
    #[error("invalid snippet name '{0}': use letters, digits, '-' or '_'")]
    InvalidName(String),

    #[error("snippet code is empty")]
    EmptyCode,

    #[error("snippet '{0}' not found")]
    NotFound(String),

    #[error("snippet store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed snippet file: {0}")]
    Format(#[from] serde_json::Error),
}

/// Directory-backed snippet storage
#[derive(Debug, Clone)]
pub struct SnippetStore {
    dir: PathBuf,
}

impl SnippetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SnippetStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save or overwrite a snippet, creating the directory on first use
    pub fn save(&self, name: &str, code: &str) -> Result<(), SnippetError> {
        let path = self.path_for(name)?;
        if code.trim().is_empty() {
            return Err(SnippetError::EmptyCode);
        }

        fs::create_dir_all(&self.dir)?;
        let snippet = Snippet {
            name: name.to_string(),
            code: code.to_string(),
        };
        fs::write(&path, serde_json::to_string_pretty(&snippet)?)?;

        debug!(name, path = %path.display(), "snippet saved");
        Ok(())
    }

    pub fn load(&self, name: &str) -> Result<Snippet, SnippetError> {
        let path = self.path_for(name)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(SnippetError::NotFound(name.to_string()))
            }
            Err(err) => return Err(err.into()),
        };

        debug!(name, path = %path.display(), "snippet loaded");
        Ok(serde_json::from_str(&content)?)
    }

    /// Names of all stored snippets, sorted. A missing directory lists nothing.
    pub fn list(&self) -> Result<Vec<String>, SnippetError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, SnippetError> {
        if !is_valid_name(name) {
            return Err(SnippetError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
