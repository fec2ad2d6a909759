// ABOUTME: Interface to the host's window and pane system.
// ABOUTME: Layout operations read and replace arrangements only through this trait.

use fl_core::{HostError, OpenOptions, Orientation, PaneId, Side};

use crate::Root;

pub trait Workspace {
    /// Snapshot of the live window arrangement
    fn current_arrangement(&self) -> Root;

    /// Swap the whole arrangement in one update
    fn replace_arrangement(&mut self, root: Root) -> Result<(), HostError>;

    /// Show `path` in `pane`
    fn open_file_in_pane(
        &mut self,
        pane: &PaneId,
        path: &str,
        options: OpenOptions,
    ) -> Result<(), HostError>;

    /// Split `pane`, returning the new empty pane
    fn split_pane(&mut self, pane: &PaneId, orientation: Orientation) -> Result<PaneId, HostError>;

    /// Add an empty tab next to `pane` in its tab group
    fn new_tab(&mut self, pane: &PaneId) -> Result<PaneId, HostError>;

    /// The main-area pane most recently focused
    fn most_recent_pane(&self) -> Option<PaneId>;

    fn is_sidebar_visible(&self, side: Side) -> bool;

    fn toggle_sidebar(&mut self, side: Side);

    /// Show a short message to the user
    fn notice(&mut self, message: &str);

    /// Vault paths of every file open in the main area
    fn open_files(&self) -> Vec<String> {
        self.current_arrangement().open_files()
    }
}
