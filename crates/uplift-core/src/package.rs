use serde::{Deserialize, Serialize};

use crate::version::ReleaseVersion;

/// One installed package as reported by the package store. A fresh set is
/// read on every resolution pass; records are replaced, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    /// `None` for unversioned installs, i.e. version-control checkouts.
    pub version: Option<ReleaseVersion>,
    pub vc_tracked: bool,
}

/// One catalog entry offering a discrete release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailablePackage {
    pub name: String,
    pub version: ReleaseVersion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}
