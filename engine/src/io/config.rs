//! Engine configuration, read from a TOML file (default `engine.toml`).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default config file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "engine.toml";

/// Engine configuration (TOML).
///
/// Missing fields default to the behaviour of a plain two-argument run: no
/// pass limit and `.json` sources only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Give up after this many passes without reaching a fixed point.
    /// Unset means unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_passes: Option<u32>,

    pub source: SourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    /// Accepted input file extensions, compared case-insensitively, without the dot.
    pub extensions: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["json".to_string()],
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_passes == Some(0) {
            return Err(anyhow!("max_passes must be > 0"));
        }
        if self.source.extensions.is_empty()
            || self
                .source
                .extensions
                .iter()
                .any(|ext| ext.trim().trim_start_matches('.').is_empty())
        {
            return Err(anyhow!(
                "source.extensions must be a non-empty array of non-blank extensions"
            ));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `EngineConfig::default()`.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config not found, using defaults");
        let cfg = EngineConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: EngineConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(path = %path.display(), max_passes = ?cfg.max_passes, "config loaded");
    Ok(cfg)
}
