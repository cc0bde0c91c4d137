use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Relative location of the project config file.
pub const CONFIG_PATH: &str = ".roadmap/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapConfig {
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Acceptance rules applied to a roadmap before it is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default = "default_min_concepts")]
    pub min_concepts: usize,
    #[serde(default = "default_max_concepts")]
    pub max_concepts: usize,
    /// Drop dependencies that name unknown concepts instead of rejecting.
    #[serde(default = "default_true")]
    pub drop_dangling_edges: bool,
    #[serde(default = "default_true")]
    pub enforce_difficulty: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            min_concepts: default_min_concepts(),
            max_concepts: default_max_concepts(),
            drop_dangling_edges: default_true(),
            enforce_difficulty: default_true(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `pretty`, `text` or `json`. Unset means pick by terminal.
    #[serde(default)]
    pub format: Option<String>,
}

/// Load `<project_root>/.roadmap/config.toml`, or defaults if it is absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(project_root: &Path) -> Result<RoadmapConfig> {
    let path = config_path(project_root);
    if !path.exists() {
        return Ok(RoadmapConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<RoadmapConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

#[must_use]
pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_PATH)
}

const fn default_true() -> bool {
    true
}

const fn default_min_concepts() -> usize {
    1
}

const fn default_max_concepts() -> usize {
    64
}
