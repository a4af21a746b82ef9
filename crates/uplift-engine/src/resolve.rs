use anyhow::{bail, Result};
use uplift_core::{is_upgrade, AvailablePackage, InstalledPackage, UpgradeCandidate};

/// Scan installed packages against the catalog and produce the upgrade
/// candidates, preserving the input ordering.
///
/// VC-tracked packages bypass version comparison entirely: they are
/// emitted iff `include_vc` is set, regardless of catalog contents.
/// Requesting VC mode without VC support is rejected before any lookup
/// happens. Pure apart from the lookup; safe to call repeatedly.
pub fn resolve_candidates<F>(
    installed: &[InstalledPackage],
    include_vc: bool,
    vc_supported: bool,
    mut lookup: F,
) -> Result<Vec<UpgradeCandidate>>
where
    F: FnMut(&str) -> Option<AvailablePackage>,
{
    if include_vc && !vc_supported {
        bail!("unsupported-mode: version-controlled upgrades are not supported by this package store");
    }

    let mut candidates = Vec::new();
    for package in installed {
        if package.vc_tracked {
            if include_vc {
                candidates.push(UpgradeCandidate::vc(package.clone()));
            }
            continue;
        }

        let Some(installed_version) = package.version.as_ref() else {
            continue;
        };
        let Some(available) = lookup(&package.name) else {
            continue;
        };
        if is_upgrade(installed_version, Some(&available.version)) {
            candidates.push(UpgradeCandidate::versioned(package.clone(), available));
        }
    }

    Ok(candidates)
}
