use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use uplift_core::{AvailablePackage, PackageStore, ReleaseVersion};

use crate::current_unix_timestamp;
use crate::git::{git_available, run_git_pull};
use crate::layout::InventoryLayout;
use crate::receipts::{
    read_package_receipts, remove_receipt, write_receipt, PackageReceipt, RECEIPT_FORMAT_VERSION,
};

/// Filesystem-backed package store: one payload directory and one receipt
/// per installed release, VC checkouts synced through git.
#[derive(Debug)]
pub struct FsPackageStore {
    layout: InventoryLayout,
    vc_supported: bool,
}

impl FsPackageStore {
    pub fn open(layout: InventoryLayout) -> Self {
        let vc_supported = git_available();
        Self {
            layout,
            vc_supported,
        }
    }

    pub fn layout(&self) -> &InventoryLayout {
        &self.layout
    }

    fn vc_receipt(&self, name: &str) -> Result<PackageReceipt> {
        read_package_receipts(&self.layout, name)?
            .into_iter()
            .find(|receipt| receipt.vc_tracked)
            .ok_or_else(|| {
                anyhow!("vc-sync-failed: package '{name}' has no version-controlled install")
            })
    }
}

impl PackageStore for FsPackageStore {
    fn supports_vc(&self) -> bool {
        self.vc_supported
    }

    fn install(&mut self, package: &AvailablePackage) -> Result<()> {
        self.layout.ensure_base_dirs()?;

        let release_label = package.version.to_string();
        let payload_dir = self.layout.package_dir(&package.name, &release_label);
        fs::create_dir_all(&payload_dir)
            .with_context(|| format!("failed to create {}", payload_dir.display()))?;
        write_payload_manifest(&payload_dir, package)?;

        write_receipt(
            &self.layout,
            &PackageReceipt {
                version: RECEIPT_FORMAT_VERSION,
                name: package.name.clone(),
                release: Some(package.version.clone()),
                vc_tracked: false,
                checkout_path: None,
                installed_at_unix: current_unix_timestamp(),
            },
        )?;
        Ok(())
    }

    fn installed_version(&self, name: &str) -> Result<Option<ReleaseVersion>> {
        let newest = read_package_receipts(&self.layout, name)?
            .into_iter()
            .filter_map(|receipt| receipt.release)
            .max();
        Ok(newest)
    }

    fn remove(&mut self, name: &str, version: &ReleaseVersion) -> Result<()> {
        let release_label = version.to_string();
        let payload_dir = self.layout.package_dir(name, &release_label);
        if payload_dir.exists() {
            fs::remove_dir_all(&payload_dir)
                .with_context(|| format!("failed removing {}", payload_dir.display()))?;
        }
        let _ = fs::remove_dir(self.layout.pkgs_dir().join(name));

        remove_receipt(&self.layout, name, &release_label)
    }

    fn vc_sync(&mut self, name: &str) -> Result<()> {
        if !self.vc_supported {
            return Err(anyhow!(
                "vc-sync-failed: package '{name}' cannot sync: git is not available"
            ));
        }

        let receipt = self.vc_receipt(name)?;
        let checkout = receipt.checkout_path.as_deref().ok_or_else(|| {
            anyhow!("vc-sync-failed: package '{name}' has no recorded checkout path")
        })?;
        let checkout: PathBuf = checkout.into();
        if !checkout.exists() {
            return Err(anyhow!(
                "vc-sync-failed: package '{}' checkout is missing: {}",
                name,
                checkout.display()
            ));
        }

        run_git_pull(&checkout, name)
    }
}

fn write_payload_manifest(payload_dir: &Path, package: &AvailablePackage) -> Result<()> {
    let path = payload_dir.join("package.json");
    let content = serde_json::to_string_pretty(package)
        .with_context(|| format!("failed serializing payload manifest: {}", path.display()))?;
    fs::write(&path, content)
        .with_context(|| format!("failed writing payload manifest: {}", path.display()))
}
