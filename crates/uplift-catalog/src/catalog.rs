use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use uplift_core::AvailablePackage;

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default = "catalog_file_version")]
    version: u32,
    #[serde(default)]
    packages: Vec<AvailablePackage>,
}

fn catalog_file_version() -> u32 {
    1
}

/// The set of packages currently offered for install, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    packages: BTreeMap<String, AvailablePackage>,
}

impl Catalog {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(input).context("failed to parse package catalog")?;
        if file.version != 1 {
            return Err(anyhow!("unsupported catalog version: {}", file.version));
        }

        let mut packages = BTreeMap::new();
        for package in file.packages {
            if package.name.trim().is_empty() {
                return Err(anyhow!("catalog package name must not be empty"));
            }
            let name = package.name.clone();
            if packages.insert(name.clone(), package).is_some() {
                return Err(anyhow!("duplicate catalog entry '{name}'"));
            }
        }

        Ok(Self { packages })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed reading catalog: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed parsing catalog: {}", path.display()))
    }

    pub fn get(&self, name: &str) -> Option<&AvailablePackage> {
        self.packages.get(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn packages(&self) -> impl Iterator<Item = &AvailablePackage> {
        self.packages.values()
    }
}
