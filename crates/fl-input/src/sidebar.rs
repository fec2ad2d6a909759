// ABOUTME: Forces sidebar visibility without redundant toggles.
// ABOUTME: The window system only offers a toggle, so the current state is checked first.

use fl_core::Side;
use fl_layout::Workspace;

use crate::SidebarIntent;

/// Make `side` visible or hidden. Returns whether a toggle was issued.
pub fn force_sidebar<W: Workspace + ?Sized>(workspace: &mut W, side: Side, visible: bool) -> bool {
    if workspace.is_sidebar_visible(side) == visible {
        return false;
    }
    workspace.toggle_sidebar(side);
    true
}

/// Apply a dispatcher intent to the left sidebar
pub fn apply_sidebar_intent<W: Workspace + ?Sized>(
    workspace: &mut W,
    intent: SidebarIntent,
) -> bool {
    force_sidebar(workspace, Side::Left, intent == SidebarIntent::Show)
}
