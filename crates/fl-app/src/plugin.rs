// ABOUTME: Entry point the host calls into for explorer clicks, key events, and settings changes.
// ABOUTME: Routes clicks through the trigger dispatcher to the layout controller.

use fl_core::{Settings, Vault, VaultEntry};
use fl_input::{apply_sidebar_intent, FolderAction, ModifierState, TriggerDispatcher};
use fl_layout::Workspace;

use crate::LayoutController;

pub struct FolderLayout<V> {
    controller: LayoutController<V>,
    dispatcher: TriggerDispatcher,
}

impl<V: Vault> FolderLayout<V> {
    pub fn new(vault: V, settings: Settings) -> Self {
        let bindings = settings.bindings.clone();
        let controller = LayoutController::new(vault, settings);
        let dispatcher = TriggerDispatcher::new(bindings, controller.in_flight().clone());
        Self {
            controller,
            dispatcher,
        }
    }

    pub fn controller(&self) -> &LayoutController<V> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut LayoutController<V> {
        &mut self.controller
    }

    pub fn dispatcher(&self) -> &TriggerDispatcher {
        &self.dispatcher
    }

    /// A click on `path` in the file explorer. Returns whether the click was
    /// consumed; `false` lets the host handle it.
    pub fn click<W: Workspace + ?Sized>(
        &mut self,
        workspace: &mut W,
        path: &str,
        modifiers: ModifierState,
    ) -> bool {
        let Some(ctx) = self.dispatcher.context_for(path, modifiers) else {
            tracing::debug!("Click on {} which the explorer does not show", path);
            return false;
        };
        match self.dispatcher.resolve(&ctx) {
            FolderAction::PassThrough => false,
            action => self.controller.handle(workspace, action, &ctx.target.path),
        }
    }

    pub fn key_down<W: Workspace + ?Sized>(&mut self, workspace: &mut W, code: &str) {
        if let Some(intent) = self.dispatcher.key_down(code) {
            apply_sidebar_intent(workspace, intent);
        }
    }

    pub fn key_up<W: Workspace + ?Sized>(&mut self, workspace: &mut W, code: &str) {
        if let Some(intent) = self.dispatcher.key_up(code) {
            apply_sidebar_intent(workspace, intent);
        }
    }

    pub fn focus_lost<W: Workspace + ?Sized>(&mut self, workspace: &mut W) {
        if let Some(intent) = self.dispatcher.focus_lost() {
            apply_sidebar_intent(workspace, intent);
        }
    }

    pub fn explorer_changed(&mut self, items: impl IntoIterator<Item = VaultEntry>) -> bool {
        self.dispatcher.explorer_changed(items)
    }

    /// New settings take effect for the next interaction
    pub fn apply_settings(&mut self, settings: Settings) {
        self.dispatcher.set_bindings(settings.bindings.clone());
        self.controller.set_settings(settings);
    }
}
