use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uplift_core::{InstalledPackage, ReleaseVersion};

use crate::layout::InventoryLayout;

pub const RECEIPT_FORMAT_VERSION: u32 = 1;

/// One installed release of a package; VC checkouts get a single receipt
/// with `release: None` under the `vc` label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageReceipt {
    pub version: u32,
    pub name: String,
    pub release: Option<ReleaseVersion>,
    pub vc_tracked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_path: Option<String>,
    pub installed_at_unix: u64,
}

impl PackageReceipt {
    pub fn release_label(&self) -> String {
        match &self.release {
            Some(release) => release.to_string(),
            None => "vc".to_string(),
        }
    }
}

pub fn write_receipt(layout: &InventoryLayout, receipt: &PackageReceipt) -> Result<PathBuf> {
    let dir = layout.package_state_dir(&receipt.name);
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let path = layout.receipt_path(&receipt.name, &receipt.release_label());
    let content = serde_json::to_string_pretty(receipt)
        .with_context(|| format!("failed serializing receipt: {}", path.display()))?;
    fs::write(&path, content)
        .with_context(|| format!("failed writing receipt: {}", path.display()))?;
    Ok(path)
}

pub fn remove_receipt(layout: &InventoryLayout, name: &str, release_label: &str) -> Result<()> {
    let path = layout.receipt_path(name, release_label);
    match fs::remove_file(&path) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed removing receipt: {}", path.display()));
        }
    }

    // Drop the per-name directory once its last receipt is gone.
    let _ = fs::remove_dir(layout.package_state_dir(name));
    Ok(())
}

pub fn read_package_receipts(layout: &InventoryLayout, name: &str) -> Result<Vec<PackageReceipt>> {
    let dir = layout.package_state_dir(name);
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut receipts = Vec::new();
    for entry in fs::read_dir(&dir)
        .with_context(|| format!("failed reading install state directory: {}", dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|value| value.to_str()) != Some("receipt") {
            continue;
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed reading receipt: {}", path.display()))?;
        let receipt: PackageReceipt = serde_json::from_str(&raw)
            .with_context(|| format!("failed parsing receipt: {}", path.display()))?;
        receipts.push(receipt);
    }

    receipts.sort_by(|left, right| left.release.cmp(&right.release));
    Ok(receipts)
}

pub fn read_all_receipts(layout: &InventoryLayout) -> Result<Vec<PackageReceipt>> {
    let dir = layout.installed_state_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut receipts = Vec::new();
    for entry in fs::read_dir(&dir)
        .with_context(|| format!("failed reading install state directory: {}", dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        receipts.extend(read_package_receipts(layout, &name)?);
    }

    receipts.sort_by(|left, right| {
        left.name
            .cmp(&right.name)
            .then_with(|| left.release.cmp(&right.release))
    });
    Ok(receipts)
}

/// Collapse receipts to one installed record per name, ordered by name.
///
/// A VC receipt wins over any stale versioned receipts for the same name;
/// otherwise the highest release wins (an interrupted upgrade can leave
/// two versioned receipts behind). This ordering is the stable input
/// ordering candidate indices are derived from.
pub fn read_installed_packages(layout: &InventoryLayout) -> Result<Vec<InstalledPackage>> {
    let mut by_name: BTreeMap<String, InstalledPackage> = BTreeMap::new();
    for receipt in read_all_receipts(layout)? {
        let entry = InstalledPackage {
            name: receipt.name.clone(),
            version: receipt.release.clone(),
            vc_tracked: receipt.vc_tracked,
        };
        let keep_existing = match by_name.get(&receipt.name) {
            Some(existing) if existing.vc_tracked => true,
            Some(existing) => !entry.vc_tracked && existing.version >= entry.version,
            None => false,
        };
        if !keep_existing {
            by_name.insert(receipt.name.clone(), entry);
        }
    }

    Ok(by_name.into_values().collect())
}
