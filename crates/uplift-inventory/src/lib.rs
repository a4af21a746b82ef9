mod git;
mod layout;
mod receipts;
mod selected;
mod store;

pub use layout::{default_state_root, InventoryLayout};
pub use receipts::{
    read_all_receipts, read_installed_packages, read_package_receipts, remove_receipt,
    write_receipt, PackageReceipt, RECEIPT_FORMAT_VERSION,
};
pub use selected::{mark_selected, read_selected_names, unmark_selected};
pub use store::FsPackageStore;

use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
