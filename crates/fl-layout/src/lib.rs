// ABOUTME: Workspace layout documents for folder-layout.
// ABOUTME: Models the pane tree, rewrites file references, and defines the window system interface.

mod rewrite;
mod tree;
mod workspace;

pub use fl_core::Orientation;
pub use rewrite::{to_absolute, to_folder_relative};
pub use tree::{Extra, LayoutNode, Leaf, LeafState, Root, Split, Tabs, Zone};
pub use workspace::Workspace;
