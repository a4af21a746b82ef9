use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::layout::CatalogLayout;
use crate::{current_unix_timestamp, unique_suffix};

#[derive(Debug, Serialize, Deserialize)]
struct RefreshStampFile {
    version: u32,
    refreshed_at_unix: u64,
    package_count: u64,
    status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub package_count: u64,
}

/// When the catalog was last refreshed, or `None` if the stamp was never
/// written or cannot be read. Callers treat `None` as "refresh now".
pub fn read_refresh_stamp(layout: &CatalogLayout) -> Option<u64> {
    let content = fs::read_to_string(layout.refresh_stamp_path()).ok()?;
    let stamp = serde_json::from_str::<RefreshStampFile>(&content).ok()?;
    (stamp.status == "ready").then_some(stamp.refreshed_at_unix)
}

pub fn write_refresh_stamp(
    layout: &CatalogLayout,
    refreshed_at_unix: u64,
    package_count: u64,
) -> Result<()> {
    let path = layout.refresh_stamp_path();
    let stamp = RefreshStampFile {
        version: 1,
        refreshed_at_unix,
        package_count,
        status: "ready".to_string(),
    };
    let content = serde_json::to_string_pretty(&stamp).with_context(|| {
        format!(
            "catalog-refresh-failed: failed serializing stamp {}",
            path.display()
        )
    })?;
    fs::write(&path, content).with_context(|| {
        format!(
            "catalog-refresh-failed: failed writing stamp {}",
            path.display()
        )
    })
}

/// Replace the cached catalog with the contents of `source`.
///
/// The source is validated before anything is touched, staged beside the
/// cache, and renamed into place; a failed stage leaves the previous
/// cache and stamp as they were.
pub fn refresh_catalog(layout: &CatalogLayout, source: &Path) -> Result<RefreshOutcome> {
    layout.ensure_base_dirs()?;

    let content = fs::read_to_string(source).with_context(|| {
        format!(
            "catalog-refresh-failed: failed reading source catalog {}",
            source.display()
        )
    })?;
    let catalog = Catalog::from_toml_str(&content).with_context(|| {
        format!(
            "catalog-refresh-failed: invalid source catalog {}",
            source.display()
        )
    })?;
    let package_count = catalog.len() as u64;

    let staged = layout
        .catalog_dir()
        .join(format!("tmp-catalog-{}", unique_suffix()));
    fs::write(&staged, &content).with_context(|| {
        format!(
            "catalog-refresh-failed: failed staging catalog {}",
            staged.display()
        )
    })?;

    let destination = layout.catalog_path();
    if let Err(err) = fs::rename(&staged, &destination) {
        let _ = fs::remove_file(&staged);
        return Err(err).with_context(|| {
            format!(
                "catalog-refresh-failed: failed replacing catalog {}",
                destination.display()
            )
        });
    }

    write_refresh_stamp(layout, current_unix_timestamp(), package_count)?;
    Ok(RefreshOutcome { package_count })
}
