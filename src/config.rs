//! Runtime configuration (pseudostep.toml)
//!
//! ```toml
//! [limits]
//! max_call_depth = 200
//! max_loop_iterations = 1000000
//! max_trace_steps = 5000000
//! max_trace_bytes = 536870912
//! max_array_cells = 1000000
//!
//! [snippets]
//! dir = "snippets"
//! ```
//!
//! Every key is optional and falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory by [`Config::discover`]
pub const CONFIG_FILE_NAME: &str = "pseudostep.toml";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub limits: Limits,

    #[serde(default)]
    pub snippets: SnippetConfig,
}

/// Resource ceilings enforced by the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum nesting of procedure activations
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: usize,

    /// Maximum iterations of one FOR or WHILE activation
    #[serde(default = "default_max_loop_iterations")]
    pub max_loop_iterations: usize,

    /// Maximum number of recorded steps per run
    #[serde(default = "default_max_trace_steps")]
    pub max_trace_steps: usize,

    /// Estimated bytes the recorded steps of one run may occupy
    #[serde(default = "default_max_trace_bytes")]
    pub max_trace_bytes: usize,

    /// Largest number of cells a single ARRAY declaration may allocate
    #[serde(default = "default_max_array_cells")]
    pub max_array_cells: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_call_depth: default_max_call_depth(),
            max_loop_iterations: default_max_loop_iterations(),
            max_trace_steps: default_max_trace_steps(),
            max_trace_bytes: default_max_trace_bytes(),
            max_array_cells: default_max_array_cells(),
        }
    }
}

fn default_max_call_depth() -> usize {
    200
}

fn default_max_loop_iterations() -> usize {
    1_000_000
}

fn default_max_trace_steps() -> usize {
    5_000_000
}

fn default_max_trace_bytes() -> usize {
    512 * 1024 * 1024
}

fn default_max_array_cells() -> usize {
    1_000_000
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetConfig {
    /// Directory holding saved snippets
    #[serde(default = "default_snippet_dir")]
    pub dir: PathBuf,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        SnippetConfig {
            dir: default_snippet_dir(),
        }
    }
}

fn default_snippet_dir() -> PathBuf {
    PathBuf::from("snippets")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Load configuration from an explicit file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load `pseudostep.toml` from the working directory, or defaults if absent
    pub fn discover() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").expect("Parsing failed");
        assert_eq!(config, Config::default());
        assert_eq!(config.limits.max_call_depth, 200);
        assert_eq!(config.snippets.dir, PathBuf::from("snippets"));
    }

    #[test]
    fn test_partial_limits() {
        let config = Config::parse("[limits]\nmax_loop_iterations = 50\n").expect("Parsing failed");
        assert_eq!(config.limits.max_loop_iterations, 50);
        assert_eq!(config.limits.max_trace_steps, 5_000_000);
        assert_eq!(config.limits.max_array_cells, 1_000_000);
    }

    #[test]
    fn test_memory_limits() {
        let config = Config::parse("[limits]\nmax_trace_bytes = 4096\nmax_array_cells = 10\n")
            .expect("Parsing failed");
        assert_eq!(config.limits.max_trace_bytes, 4096);
        assert_eq!(config.limits.max_array_cells, 10);
        assert_eq!(config.limits.max_call_depth, 200);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::parse("[limits\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[snippets]\ndir = \"saved\"\n").unwrap();

        let config = Config::load(&path).expect("Loading failed");
        assert_eq!(config.snippets.dir, PathBuf::from("saved"));

        let missing = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
