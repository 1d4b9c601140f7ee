//! # CLI Configuration
//!
//! Optional YAML file controlling where generated artifacts go:
//!
//! ```yaml
//! output_dir: dist
//! types_file: types.ts
//! ```
//!
//! Precedence: command-line flag, then config file, then default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default directory for generated artifacts, relative to the working
/// directory.
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

/// Default filename of the generated type declarations.
pub const DEFAULT_TYPES_FILE: &str = "types.ts";

/// Resolved CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Directory the declarations file is written into.
    pub output_dir: PathBuf,
    /// Declarations filename inside `output_dir`.
    pub types_file: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            types_file: DEFAULT_TYPES_FILE.to_string(),
        }
    }
}

impl CliConfig {
    /// Load the config file if one is given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Apply a `--output-dir` override.
    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        self
    }

    /// Where the declarations file is written.
    pub fn types_path(&self) -> PathBuf {
        self.output_dir.join(&self.types_file)
    }
}
