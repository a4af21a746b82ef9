use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Operator configuration at `<state-root>/config.toml`. A missing file
/// means defaults; a malformed one is a structural error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct UpliftConfig {
    #[serde(default = "default_refresh_interval_days")]
    pub refresh_interval_days: u32,
    #[serde(default)]
    pub catalog_source: Option<PathBuf>,
    #[serde(default)]
    pub include_vc: bool,
}

impl Default for UpliftConfig {
    fn default() -> Self {
        Self {
            refresh_interval_days: default_refresh_interval_days(),
            catalog_source: None,
            include_vc: false,
        }
    }
}

fn default_refresh_interval_days() -> u32 {
    7
}

pub(crate) fn load_config(root: &Path) -> Result<UpliftConfig> {
    let path = root.join("config.toml");
    if !path.exists() {
        return Ok(UpliftConfig::default());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed reading config: {}", path.display()))?;
    let config: UpliftConfig = toml::from_str(&content)
        .with_context(|| format!("failed parsing config: {}", path.display()))?;
    if config.refresh_interval_days == 0 {
        return Err(anyhow!(
            "refresh_interval_days must be at least 1: {}",
            path.display()
        ));
    }
    Ok(config)
}
