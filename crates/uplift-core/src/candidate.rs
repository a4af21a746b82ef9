use crate::package::{AvailablePackage, InstalledPackage};

/// A package together with the information needed to upgrade it.
///
/// `available` is `None` iff the candidate is VC-tracked: checkouts have
/// no discrete version to compare against and upgrade by syncing instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeCandidate {
    installed: InstalledPackage,
    available: Option<AvailablePackage>,
}

impl UpgradeCandidate {
    pub fn versioned(installed: InstalledPackage, available: AvailablePackage) -> Self {
        Self {
            installed,
            available: Some(available),
        }
    }

    pub fn vc(installed: InstalledPackage) -> Self {
        Self {
            installed,
            available: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.installed.name
    }

    pub fn is_vc(&self) -> bool {
        self.available.is_none()
    }

    pub fn installed(&self) -> &InstalledPackage {
        &self.installed
    }

    pub fn available(&self) -> Option<&AvailablePackage> {
        self.available.as_ref()
    }

    /// Display form shared by every surface that lists candidates.
    pub fn describe(&self) -> String {
        match (&self.available, &self.installed.version) {
            (Some(available), Some(installed)) => {
                format!("{} ({}) => ({})", self.name(), installed, available.version)
            }
            (Some(available), None) => format!("{} => ({})", self.name(), available.version),
            (None, Some(installed)) => format!("{} ({}) (vc)", self.name(), installed),
            (None, None) => format!("{} (vc)", self.name()),
        }
    }
}
