// ABOUTME: Layout persistence for folder-layout.
// ABOUTME: Stores one layout document per folder on a vault backend.

mod fs_vault;
mod memory;
mod store;

pub use fs_vault::FsVault;
pub use memory::MemoryVault;
pub use store::{LayoutStore, StoreError, LAYOUT_FILE_NAME};
