// ABOUTME: Saves and restores per-folder window layouts.
// ABOUTME: Falls back to a default split or tabbed layout when a folder has none saved.

use fl_core::{path, InFlight, InFlightGuard, OpenOptions, Settings, Vault, VaultError};
use fl_input::FolderAction;
use fl_layout::{to_absolute, to_folder_relative, Root, Workspace};
use fl_store::{LayoutStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error(
        "Close or move files outside {folder} before saving its layout: {}",
        .outside.join(", ")
    )]
    ScopeViolation { folder: String, outside: Vec<String> },

    #[error("Could not store layout: {0}")]
    Storage(#[source] StoreError),

    #[error("No saved layout at {0}")]
    NotFound(String),

    #[error("Saved layout is unreadable: {0}")]
    Parse(#[source] StoreError),

    #[error("No files in {0}")]
    EmptyFolder(String),

    #[error("No pane to open files in")]
    NoPane,

    #[error("Window system error: {0}")]
    Host(#[from] fl_core::HostError),

    #[error("Another layout operation is in progress")]
    Busy,
}

impl From<StoreError> for LayoutError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(path) => LayoutError::NotFound(path),
            e if e.is_parse_error() => LayoutError::Parse(e),
            e => LayoutError::Storage(e),
        }
    }
}

/// Shape produced by opening a folder without a saved layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultLayout {
    /// One pane per file
    Split { panes: usize },
    /// Every file as a tab of one pane
    Tabs { tabs: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    Restored,
    Default(DefaultLayout),
    /// The saved layout could not be read; the default layout was opened instead
    Fallback { reason: String, layout: DefaultLayout },
}

pub struct LayoutController<V> {
    store: LayoutStore<V>,
    settings: Settings,
    in_flight: InFlight,
}

impl<V: Vault> LayoutController<V> {
    pub fn new(vault: V, settings: Settings) -> Self {
        Self {
            store: LayoutStore::new(vault),
            settings,
            in_flight: InFlight::new(),
        }
    }

    /// Guard held for the duration of every operation
    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn store(&self) -> &LayoutStore<V> {
        &self.store
    }

    pub fn vault(&self) -> &V {
        self.store.vault()
    }

    pub fn vault_mut(&mut self) -> &mut V {
        self.store.vault_mut()
    }

    fn enter(&self) -> Result<InFlightGuard, LayoutError> {
        self.in_flight.try_enter().ok_or(LayoutError::Busy)
    }

    /// Save the live arrangement as the layout of `folder`.
    ///
    /// Every open file must lie inside `folder`; nothing is written otherwise.
    /// Only the main area is stored.
    pub fn save<W: Workspace + ?Sized>(
        &mut self,
        workspace: &mut W,
        folder: &str,
    ) -> Result<(), LayoutError> {
        let _guard = self.enter()?;
        let folder = path::normalize_folder(folder);

        let outside: Vec<String> = workspace
            .open_files()
            .into_iter()
            .filter(|file| !path::is_inside(file, folder))
            .collect();
        if !outside.is_empty() {
            return Err(LayoutError::ScopeViolation {
                folder: display_folder(folder).to_string(),
                outside,
            });
        }

        let mut root = Root::new(workspace.current_arrangement().main);
        to_folder_relative(&mut root, folder);
        self.store.save(folder, &root).map_err(LayoutError::Storage)?;
        tracing::info!("Saved layout for {}", display_folder(folder));
        Ok(())
    }

    /// Restore the saved layout of `folder`, or open its default layout if
    /// it has none. Only the main area is replaced; everything else in the
    /// live window is kept.
    pub fn open<W: Workspace + ?Sized>(
        &mut self,
        workspace: &mut W,
        folder: &str,
    ) -> Result<OpenOutcome, LayoutError> {
        let _guard = self.enter()?;
        let folder = path::normalize_folder(folder);

        if !self.store.exists(folder) {
            tracing::debug!("No saved layout for {}", display_folder(folder));
            return self
                .open_default_unguarded(workspace, folder)
                .map(OpenOutcome::Default);
        }

        let mut saved = match self.store.load(folder) {
            Ok(root) => root,
            Err(StoreError::NotFound(_)) => {
                return self
                    .open_default_unguarded(workspace, folder)
                    .map(OpenOutcome::Default);
            }
            Err(e) if e.is_parse_error() => {
                tracing::warn!("Falling back to default layout: {}", e);
                let layout = self.open_default_unguarded(workspace, folder)?;
                return Ok(OpenOutcome::Fallback {
                    reason: e.to_string(),
                    layout,
                });
            }
            Err(e) => return Err(e.into()),
        };

        to_absolute(&mut saved, folder);

        let mut root = workspace.current_arrangement();
        root.main = saved.main;
        workspace.replace_arrangement(root)?;
        tracing::info!("Restored layout for {}", display_folder(folder));
        Ok(OpenOutcome::Restored)
    }

    /// Open every file under `folder`: one pane per file below the split
    /// threshold, otherwise tabs in a single pane
    pub fn open_default<W: Workspace + ?Sized>(
        &mut self,
        workspace: &mut W,
        folder: &str,
    ) -> Result<DefaultLayout, LayoutError> {
        let _guard = self.enter()?;
        self.open_default_unguarded(workspace, path::normalize_folder(folder))
    }

    fn open_default_unguarded<W: Workspace + ?Sized>(
        &mut self,
        workspace: &mut W,
        folder: &str,
    ) -> Result<DefaultLayout, LayoutError> {
        let layout_file = LayoutStore::<V>::layout_path(folder);
        let entries = match self.store.vault().list_recursive(folder) {
            Ok(entries) => entries,
            Err(VaultError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(LayoutError::Storage(e.into())),
        };
        let files: Vec<String> = entries
            .into_iter()
            .filter(|e| e.is_file() && e.path != layout_file)
            .map(|e| e.path)
            .collect();

        let Some((first, rest)) = files.split_first() else {
            return Err(LayoutError::EmptyFolder(display_folder(folder).to_string()));
        };

        let pane = workspace.most_recent_pane().ok_or(LayoutError::NoPane)?;
        workspace.open_file_in_pane(&pane, first, OpenOptions::active())?;

        let threshold = self.settings.split_threshold as usize;
        let layout = if files.len() < threshold {
            let mut current = pane;
            for file in rest {
                let next = workspace.split_pane(&current, self.settings.split_direction)?;
                workspace.open_file_in_pane(&next, file, OpenOptions::active())?;
                current = next;
            }
            DefaultLayout::Split { panes: files.len() }
        } else {
            let mut current = pane;
            for file in rest {
                let tab = workspace.new_tab(&current)?;
                workspace.open_file_in_pane(&tab, file, OpenOptions::background())?;
                current = tab;
            }
            DefaultLayout::Tabs { tabs: files.len() }
        };

        tracing::info!("Opened {} as {:?}", display_folder(folder), layout);
        Ok(layout)
    }

    /// Run one explorer action, reporting any failure as a notice.
    ///
    /// Returns whether the action was consumed; `false` means the host
    /// should handle the click natively.
    pub fn handle<W: Workspace + ?Sized>(
        &mut self,
        workspace: &mut W,
        action: FolderAction,
        folder: &str,
    ) -> bool {
        let shown = display_folder(path::normalize_folder(folder));
        let result = match action {
            FolderAction::PassThrough => return false,
            FolderAction::Save => self
                .save(workspace, folder)
                .map(|()| Some(format!("Saved layout for {}", shown))),
            FolderAction::OpenSaved => self.open(workspace, folder).map(|outcome| match outcome {
                OpenOutcome::Fallback { reason, .. } => {
                    Some(format!("{}; opened default layout instead", reason))
                }
                OpenOutcome::Restored | OpenOutcome::Default(_) => None,
            }),
            FolderAction::OpenDefault => self.open_default(workspace, folder).map(|_| None),
        };

        match result {
            Ok(Some(message)) => workspace.notice(&message),
            Ok(None) => {}
            Err(LayoutError::Busy) => {
                tracing::debug!("Dropped {:?} on {}: operation in flight", action, folder);
            }
            Err(e) => {
                tracing::error!("{:?} on {} failed: {}", action, folder, e);
                workspace.notice(&e.to_string());
            }
        }
        true
    }
}

fn display_folder(folder: &str) -> &str {
    if path::is_root(folder) {
        "/"
    } else {
        folder
    }
}
