use anyhow::Result;
use uplift_core::{PackageStore, ReleaseVersion, UpgradeCandidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeFailureKind {
    InstallFailed,
    VcSyncFailed,
}

impl UpgradeFailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InstallFailed => "install-failed",
            Self::VcSyncFailed => "vc-sync-failed",
        }
    }
}

/// One candidate's upgrade failure, collected rather than propagated so a
/// batch always attempts every selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeFailure {
    pub name: String,
    pub kind: UpgradeFailureKind,
    pub message: String,
}

impl UpgradeFailure {
    fn install_failed(name: &str, err: &anyhow::Error) -> Self {
        Self {
            name: name.to_string(),
            kind: UpgradeFailureKind::InstallFailed,
            message: format!("{err:#}"),
        }
    }

    fn vc_sync_failed(name: &str, err: &anyhow::Error) -> Self {
        Self {
            name: name.to_string(),
            kind: UpgradeFailureKind::VcSyncFailed,
            message: format!("{err:#}"),
        }
    }
}

/// Upgrade one candidate against the package store.
///
/// VC candidates are a single sync call. Versioned candidates install the
/// new release first, then confirm it reports installed before the old
/// release is removed — the confirm-and-remove step runs on the way out
/// whether or not the install call succeeded, and the old release is
/// never touched until the new one is confirmed present. A failed install
/// therefore leaves the package exactly as it was.
pub fn upgrade_candidate(
    store: &mut dyn PackageStore,
    candidate: &UpgradeCandidate,
) -> Result<(), UpgradeFailure> {
    let name = candidate.name();
    let Some(available) = candidate.available() else {
        return store
            .vc_sync(name)
            .map_err(|err| UpgradeFailure::vc_sync_failed(name, &err));
    };

    let install_result = store.install(available);
    let replace_result = remove_old_if_replaced(store, candidate, &available.version);

    if let Err(err) = install_result {
        return Err(UpgradeFailure::install_failed(name, &err));
    }
    replace_result.map_err(|err| UpgradeFailure::install_failed(name, &err))
}

fn remove_old_if_replaced(
    store: &mut dyn PackageStore,
    candidate: &UpgradeCandidate,
    new_version: &ReleaseVersion,
) -> Result<()> {
    let name = candidate.name();
    let Some(old_version) = candidate.installed().version.as_ref() else {
        return Ok(());
    };
    if old_version == new_version {
        return Ok(());
    }

    let now_installed = store.installed_version(name)?;
    if now_installed.as_ref() != Some(new_version) {
        return Ok(());
    }

    store.remove(name, old_version)
}
