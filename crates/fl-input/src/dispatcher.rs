// ABOUTME: Resolves explorer clicks and key presses against configured bindings.
// ABOUTME: Owns the held-key set, which is cleared whenever the window loses focus.

use std::collections::BTreeSet;

use fl_core::{Bindings, EntryKind, InFlight, Modifier, Trigger, VaultEntry};

use crate::ExplorerIndex;

/// What a folder click should do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FolderAction {
    Save,
    OpenSaved,
    OpenDefault,
    /// Let the host expand/collapse the folder as usual
    PassThrough,
}

/// Modifier flags reported with a pointer event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl ModifierState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(mut self, modifier: Modifier) -> Self {
        match modifier {
            Modifier::Shift => self.shift = true,
            Modifier::Ctrl => self.ctrl = true,
            Modifier::Alt => self.alt = true,
            Modifier::Meta => self.meta = true,
        }
        self
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Shift => self.shift,
            Modifier::Ctrl => self.ctrl,
            Modifier::Alt => self.alt,
            Modifier::Meta => self.meta,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerTarget {
    pub path: String,
    pub kind: EntryKind,
}

/// Everything known about one explorer interaction
#[derive(Debug, Clone)]
pub struct InteractionContext {
    pub held: BTreeSet<String>,
    pub modifiers: ModifierState,
    pub target: ExplorerTarget,
}

impl InteractionContext {
    pub fn is_active(&self, trigger: &Trigger) -> bool {
        match trigger {
            Trigger::Disabled => false,
            Trigger::Modifier(m) => {
                self.modifiers.contains(*m) || m.key_codes().iter().any(|c| self.held.contains(*c))
            }
            Trigger::Key(code) => self.held.contains(code),
        }
    }
}

/// Request to force the left sidebar into a state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarIntent {
    Show,
    Hide,
}

pub struct TriggerDispatcher {
    bindings: Bindings,
    held: BTreeSet<String>,
    explorer: ExplorerIndex,
}

impl TriggerDispatcher {
    /// `in_flight` is the controller's guard; explorer refreshes that
    /// arrive while it is held are dropped
    pub fn new(bindings: Bindings, in_flight: InFlight) -> Self {
        warn_overlaps(&bindings);
        Self {
            bindings,
            held: BTreeSet::new(),
            explorer: ExplorerIndex::new(in_flight),
        }
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn set_bindings(&mut self, bindings: Bindings) {
        warn_overlaps(&bindings);
        self.bindings = bindings;
    }

    pub fn held_keys(&self) -> impl Iterator<Item = &str> {
        self.held.iter().map(String::as_str)
    }

    /// Record a key press. Auto-repeat presses are ignored.
    pub fn key_down(&mut self, code: &str) -> Option<SidebarIntent> {
        if !self.held.insert(code.to_string()) {
            return None;
        }
        self.sidebar_trigger_matches(code).then(|| {
            tracing::debug!("Sidebar hold pressed ({})", code);
            SidebarIntent::Show
        })
    }

    pub fn key_up(&mut self, code: &str) -> Option<SidebarIntent> {
        if !self.held.remove(code) {
            return None;
        }
        (self.sidebar_trigger_matches(code) && !self.sidebar_held()).then(|| {
            tracing::debug!("Sidebar hold released ({})", code);
            SidebarIntent::Hide
        })
    }

    /// The window lost focus: key releases will not be seen, so forget
    /// every held key
    pub fn focus_lost(&mut self) -> Option<SidebarIntent> {
        let was_holding_sidebar = self.sidebar_held();
        self.held.clear();
        was_holding_sidebar.then_some(SidebarIntent::Hide)
    }

    /// Build the context for a click on `path`, or `None` if the explorer
    /// does not show that path
    pub fn context_for(&self, path: &str, modifiers: ModifierState) -> Option<InteractionContext> {
        let kind = self.explorer.kind_of(path)?;
        Some(self.context(
            ExplorerTarget {
                path: path.to_string(),
                kind,
            },
            modifiers,
        ))
    }

    pub fn context(&self, target: ExplorerTarget, modifiers: ModifierState) -> InteractionContext {
        InteractionContext {
            held: self.held.clone(),
            modifiers,
            target,
        }
    }

    /// Pick the single action for an interaction: save, then open-saved,
    /// then open-default, else pass through
    pub fn resolve(&self, ctx: &InteractionContext) -> FolderAction {
        if ctx.target.kind != EntryKind::Folder {
            return FolderAction::PassThrough;
        }
        let action = if ctx.is_active(&self.bindings.save) {
            FolderAction::Save
        } else if ctx.is_active(&self.bindings.open_saved) {
            FolderAction::OpenSaved
        } else if ctx.is_active(&self.bindings.open_default) {
            FolderAction::OpenDefault
        } else {
            FolderAction::PassThrough
        };
        tracing::debug!("Click on {} resolved to {:?}", ctx.target.path, action);
        action
    }

    /// The host's explorer now shows `items`
    pub fn explorer_changed(&mut self, items: impl IntoIterator<Item = VaultEntry>) -> bool {
        self.explorer.refresh(items)
    }

    pub fn explorer(&self) -> &ExplorerIndex {
        &self.explorer
    }

    fn sidebar_trigger_matches(&self, code: &str) -> bool {
        match &self.bindings.sidebar_hold {
            Trigger::Disabled => false,
            Trigger::Modifier(m) => m.key_codes().contains(&code),
            Trigger::Key(bound) => bound == code,
        }
    }

    fn sidebar_held(&self) -> bool {
        self.held.iter().any(|code| self.sidebar_trigger_matches(code))
    }
}

fn warn_overlaps(bindings: &Bindings) {
    for (a, b) in bindings.overlaps() {
        tracing::warn!("Bindings {} and {} share a trigger; {} takes priority", a, b, a);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher(bindings: Bindings) -> TriggerDispatcher {
        let mut d = TriggerDispatcher::new(bindings, InFlight::new());
        d.explorer_changed([
            VaultEntry::folder("Projects"),
            VaultEntry::folder("Projects/Alpha"),
            VaultEntry::file("Projects/Alpha/a.md"),
        ]);
        d
    }

    fn click(d: &TriggerDispatcher, path: &str, modifiers: ModifierState) -> FolderAction {
        let ctx = d.context_for(path, modifiers).unwrap();
        d.resolve(&ctx)
    }

    #[test]
    fn default_bindings_map_modifiers_to_actions() {
        let d = dispatcher(Bindings::default());
        let alt = ModifierState::empty().with(Modifier::Alt);
        let ctrl = ModifierState::empty().with(Modifier::Ctrl);
        let shift = ModifierState::empty().with(Modifier::Shift);
        assert_eq!(click(&d, "Projects/Alpha", alt), FolderAction::Save);
        assert_eq!(click(&d, "Projects/Alpha", ctrl), FolderAction::OpenSaved);
        assert_eq!(click(&d, "Projects/Alpha", shift), FolderAction::OpenDefault);
        assert_eq!(
            click(&d, "Projects/Alpha", ModifierState::empty()),
            FolderAction::PassThrough
        );
    }

    #[test]
    fn save_wins_over_open() {
        let d = dispatcher(Bindings::default());
        let both = ModifierState::empty()
            .with(Modifier::Alt)
            .with(Modifier::Ctrl)
            .with(Modifier::Shift);
        assert_eq!(click(&d, "Projects/Alpha", both), FolderAction::Save);

        let shared = Bindings {
            save: Trigger::Modifier(Modifier::Meta),
            open_saved: Trigger::Modifier(Modifier::Meta),
            ..Bindings::default()
        };
        let d = dispatcher(shared);
        let meta = ModifierState::empty().with(Modifier::Meta);
        assert_eq!(click(&d, "Projects/Alpha", meta), FolderAction::Save);
    }

    #[test]
    fn disabled_binding_never_matches() {
        let d = dispatcher(Bindings {
            save: Trigger::Disabled,
            ..Bindings::default()
        });
        let alt = ModifierState::empty().with(Modifier::Alt);
        assert_eq!(click(&d, "Projects/Alpha", alt), FolderAction::PassThrough);
    }

    #[test]
    fn files_pass_through() {
        let d = dispatcher(Bindings::default());
        let alt = ModifierState::empty().with(Modifier::Alt);
        assert_eq!(click(&d, "Projects/Alpha/a.md", alt), FolderAction::PassThrough);
    }

    #[test]
    fn key_code_bindings_use_held_keys() {
        let mut d = dispatcher(Bindings {
            open_default: Trigger::Key("KeyD".to_string()),
            ..Bindings::default()
        });
        assert_eq!(
            click(&d, "Projects/Alpha", ModifierState::empty()),
            FolderAction::PassThrough
        );
        d.key_down("KeyD");
        assert_eq!(
            click(&d, "Projects/Alpha", ModifierState::empty()),
            FolderAction::OpenDefault
        );
        d.key_up("KeyD");
        assert_eq!(
            click(&d, "Projects/Alpha", ModifierState::empty()),
            FolderAction::PassThrough
        );
    }

    #[test]
    fn held_modifier_key_counts_without_pointer_flag() {
        let mut d = dispatcher(Bindings::default());
        d.key_down("AltRight");
        assert_eq!(
            click(&d, "Projects/Alpha", ModifierState::empty()),
            FolderAction::Save
        );
    }

    #[test]
    fn focus_loss_clears_stuck_keys() {
        let mut d = dispatcher(Bindings::default());
        d.key_down("AltLeft");
        d.key_down("KeyQ");
        assert_eq!(d.focus_lost(), None);
        assert_eq!(d.held_keys().count(), 0);
        assert_eq!(
            click(&d, "Projects/Alpha", ModifierState::empty()),
            FolderAction::PassThrough
        );
    }

    #[test]
    fn sidebar_hold_shows_then_hides() {
        let mut d = dispatcher(Bindings {
            sidebar_hold: Trigger::Key("Backquote".to_string()),
            ..Bindings::default()
        });
        assert_eq!(d.key_down("Backquote"), Some(SidebarIntent::Show));
        // Auto-repeat
        assert_eq!(d.key_down("Backquote"), None);
        assert_eq!(d.key_down("KeyA"), None);
        assert_eq!(d.key_up("KeyA"), None);
        assert_eq!(d.key_up("Backquote"), Some(SidebarIntent::Hide));
        assert_eq!(d.key_up("Backquote"), None);
    }

    #[test]
    fn sidebar_modifier_hides_only_after_both_sides_released() {
        let mut d = dispatcher(Bindings {
            sidebar_hold: Trigger::Modifier(Modifier::Ctrl),
            open_saved: Trigger::Disabled,
            ..Bindings::default()
        });
        assert_eq!(d.key_down("ControlLeft"), Some(SidebarIntent::Show));
        assert_eq!(d.key_down("ControlRight"), Some(SidebarIntent::Show));
        assert_eq!(d.key_up("ControlLeft"), None);
        assert_eq!(d.key_up("ControlRight"), Some(SidebarIntent::Hide));
    }

    #[test]
    fn focus_loss_releases_sidebar_hold() {
        let mut d = dispatcher(Bindings {
            sidebar_hold: Trigger::Key("Backquote".to_string()),
            ..Bindings::default()
        });
        d.key_down("Backquote");
        assert_eq!(d.focus_lost(), Some(SidebarIntent::Hide));
    }

    #[test]
    fn unknown_path_has_no_context() {
        let d = dispatcher(Bindings::default());
        assert!(d.context_for("Elsewhere", ModifierState::empty()).is_none());
    }
}
