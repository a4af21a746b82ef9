use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Paths of the cached catalog under a state root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLayout {
    root: PathBuf,
}

impl CatalogLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog_dir(&self) -> PathBuf {
        self.root.join("catalog")
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.catalog_dir().join("catalog.toml")
    }

    pub fn refresh_stamp_path(&self) -> PathBuf {
        self.catalog_dir().join("refresh.json")
    }

    pub fn ensure_base_dirs(&self) -> Result<()> {
        let dir = self.catalog_dir();
        fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))
    }
}
