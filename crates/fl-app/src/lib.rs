// ABOUTME: Folder layout save/restore orchestration.
// ABOUTME: Combines the layout store, rewriter, and input dispatcher against a host workspace.

mod controller;
mod document;
mod plugin;

pub use controller::{DefaultLayout, LayoutController, LayoutError, OpenOutcome};
pub use document::{DocumentError, DocumentWorkspace, WORKSPACE_FILE};
pub use plugin::FolderLayout;
