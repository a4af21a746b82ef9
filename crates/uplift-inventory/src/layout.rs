use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Paths of the installed-package state under a state root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLayout {
    root: PathBuf,
}

impl InventoryLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pkgs_dir(&self) -> PathBuf {
        self.root.join("pkgs")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.join("state")
    }

    pub fn installed_state_dir(&self) -> PathBuf {
        self.state_dir().join("installed")
    }

    pub fn package_state_dir(&self, name: &str) -> PathBuf {
        self.installed_state_dir().join(name)
    }

    pub fn receipt_path(&self, name: &str, release_label: &str) -> PathBuf {
        self.package_state_dir(name)
            .join(format!("{release_label}.receipt"))
    }

    pub fn package_dir(&self, name: &str, release_label: &str) -> PathBuf {
        self.pkgs_dir().join(name).join(release_label)
    }

    pub fn selected_path(&self) -> PathBuf {
        self.state_dir().join("selected.toml")
    }

    pub fn ensure_base_dirs(&self) -> Result<()> {
        for dir in [
            self.pkgs_dir(),
            self.state_dir(),
            self.installed_state_dir(),
        ] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(())
    }
}

pub fn default_state_root() -> Result<PathBuf> {
    if let Ok(root) = std::env::var("UPLIFT_ROOT") {
        if !root.trim().is_empty() {
            return Ok(PathBuf::from(root));
        }
    }

    if cfg!(windows) {
        let app_data = std::env::var("LOCALAPPDATA")
            .context("LOCALAPPDATA is not set; cannot resolve Windows state root")?;
        return Ok(PathBuf::from(app_data).join("Uplift"));
    }

    let home = std::env::var("HOME").context("HOME is not set; cannot resolve state root")?;
    Ok(PathBuf::from(home).join(".uplift"))
}
