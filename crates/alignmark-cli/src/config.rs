//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use alignmark_core::align::ScoringScheme;

/// Top-level alignmark configuration, loaded from `alignmark.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmarkConfig {
    /// Alignment scoring constants.
    #[serde(default)]
    pub scoring: ScoringScheme,
    /// Worker threads for batch grading; 0 = one per core.
    #[serde(default)]
    pub parallelism: usize,
    /// Required digit count of student ids in submission filenames.
    #[serde(default = "default_id_digits")]
    pub student_id_digits: usize,
}

fn default_id_digits() -> usize {
    10
}

impl Default for AlignmarkConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringScheme::default(),
            parallelism: 0,
            student_id_digits: default_id_digits(),
        }
    }
}

/// Load config from an explicit path, `<workdir>/alignmark.toml`, or the
/// defaults — in that order.
pub fn load_config(path: Option<&Path>, workdir: &Path) -> Result<AlignmarkConfig> {
    let config_path = match path {
        Some(p) => {
            anyhow::ensure!(p.exists(), "config file not found: {}", p.display());
            Some(p.to_path_buf())
        }
        None => {
            let local = workdir.join("alignmark.toml");
            local.exists().then_some(local)
        }
    };

    match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))
        }
        None => Ok(AlignmarkConfig::default()),
    }
}
