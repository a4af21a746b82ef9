mod catalog;
mod layout;
mod refresh;

pub use catalog::Catalog;
pub use layout::CatalogLayout;
pub use refresh::{read_refresh_stamp, refresh_catalog, write_refresh_stamp, RefreshOutcome};

use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

pub(crate) fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
}
