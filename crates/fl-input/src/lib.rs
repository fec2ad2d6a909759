// ABOUTME: Input handling for folder-layout.
// ABOUTME: Tracks held keys and maps explorer clicks and key holds to layout actions.

mod dispatcher;
mod explorer;
mod sidebar;

pub use dispatcher::{
    ExplorerTarget, FolderAction, InteractionContext, ModifierState, SidebarIntent,
    TriggerDispatcher,
};
pub use explorer::ExplorerIndex;
pub use sidebar::{apply_sidebar_intent, force_sidebar};
