mod candidate;
mod package;
mod store;
mod version;

pub use candidate::UpgradeCandidate;
pub use package::{AvailablePackage, InstalledPackage};
pub use store::PackageStore;
pub use version::{is_upgrade, ReleaseVersion};
