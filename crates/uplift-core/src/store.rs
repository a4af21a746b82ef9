use anyhow::Result;

use crate::package::AvailablePackage;
use crate::version::ReleaseVersion;

/// The external package store the upgrade engine drives.
///
/// Implementations own all side effects; the engine holds no persistent
/// state. `install` must not record the package as an explicit operator
/// request, and `remove` must not clear such a record for the name — the
/// explicitly-requested bookkeeping belongs to the store and survives
/// upgrades untouched.
pub trait PackageStore {
    /// Whether VC-tracked packages can be synced at all.
    fn supports_vc(&self) -> bool;

    /// Install a discrete release, leaving any older release in place.
    fn install(&mut self, package: &AvailablePackage) -> Result<()>;

    /// The newest release currently reported installed for `name`, or
    /// `None` when no versioned install exists.
    fn installed_version(&self, name: &str) -> Result<Option<ReleaseVersion>>;

    /// Force-remove exactly one installed release of `name`.
    fn remove(&mut self, name: &str, version: &ReleaseVersion) -> Result<()>;

    /// Sync a VC-tracked package to its latest upstream state.
    fn vc_sync(&mut self, name: &str) -> Result<()>;
}
