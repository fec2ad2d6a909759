// ABOUTME: Rewrites file references in a layout between vault and folder-relative form.
// ABOUTME: Only the main area is rewritten; sidebars and ribbons pass through.

use fl_core::path;

use crate::Root;

/// Make every main-area reference relative to `folder`.
///
/// References outside `folder` are removed rather than stored dangling.
/// Returns how many were removed.
pub fn to_folder_relative(root: &mut Root, folder: &str) -> usize {
    let mut dropped = 0;
    root.walk_main_leaves_mut(&mut |leaf| {
        let Some(current) = leaf.content_ref() else {
            return;
        };
        let relative = path::relative_to(current, folder).map(str::to_string);
        if relative.is_none() {
            tracing::debug!("Dropping reference outside {:?}: {}", folder, current);
            dropped += 1;
        }
        leaf.set_content_ref(relative);
    });
    dropped
}

/// Resolve every main-area reference against `folder`
pub fn to_absolute(root: &mut Root, folder: &str) {
    root.walk_main_leaves_mut(&mut |leaf| {
        if let Some(relative) = leaf.content_ref() {
            let absolute = path::join(folder, relative);
            leaf.set_content_ref(Some(absolute));
        }
    });
}
