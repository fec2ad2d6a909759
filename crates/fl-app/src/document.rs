// ABOUTME: Window system backed by the host's persisted workspace document.
// ABOUTME: Applies pane operations to the document tree and collects user notices.

use std::collections::HashSet;

use serde_json::Value;

use fl_core::{HostError, OpenOptions, Orientation, PaneId, Side, Vault, VaultError};
use fl_layout::{Leaf, Root, Split, Tabs, Workspace, Zone};

/// Vault path of the host's workspace document
pub const WORKSPACE_FILE: &str = ".obsidian/workspace.json";

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Storage error: {0}")]
    Vault(#[from] VaultError),

    #[error("Workspace document is not valid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Workspace document contains an empty split")]
    Malformed,
}

#[derive(Debug, Clone)]
pub struct DocumentWorkspace {
    root: Root,
    next_id: u64,
    notices: Vec<String>,
}

impl DocumentWorkspace {
    pub fn new(root: Root) -> Self {
        let mut workspace = Self {
            root,
            next_id: 0,
            notices: Vec::new(),
        };
        workspace.fill_missing_ids();
        workspace
    }

    /// A window with one empty pane and no sidebars
    pub fn empty() -> Self {
        Self::new(Root::new(Split::new(
            Orientation::Vertical,
            vec![Tabs::new(vec![Leaf::empty("main").into()]).into()],
        )))
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, DocumentError> {
        let root: Root = serde_json::from_slice(bytes)?;
        if !root.is_well_formed() {
            return Err(DocumentError::Malformed);
        }
        Ok(Self::new(root))
    }

    /// Read the workspace document from the vault, starting empty if there is none
    pub fn load<V: Vault + ?Sized>(vault: &V) -> Result<Self, DocumentError> {
        match vault.read(WORKSPACE_FILE) {
            Ok(bytes) => Self::from_json(&bytes),
            Err(VaultError::NotFound(_)) => {
                tracing::info!("No {}, starting with an empty window", WORKSPACE_FILE);
                Ok(Self::empty())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save<V: Vault + ?Sized>(&self, vault: &mut V) -> Result<(), DocumentError> {
        let json = serde_json::to_vec_pretty(&self.root)?;
        vault.write(WORKSPACE_FILE, &json)?;
        Ok(())
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    fn active_id(&self) -> Option<&str> {
        self.root.extra.get("active").and_then(Value::as_str)
    }

    fn set_active(&mut self, pane: &PaneId) {
        self.root
            .extra
            .insert("active".to_string(), Value::String(pane.to_string()));
    }

    fn taken_ids(&self) -> HashSet<String> {
        let mut taken = HashSet::new();
        self.root.walk_leaves(&mut |leaf| taken.extend(leaf.id.clone()));
        taken
    }

    fn fresh_id(&mut self) -> PaneId {
        let taken = self.taken_ids();
        loop {
            self.next_id += 1;
            let id = format!("{:016x}", self.next_id);
            if !taken.contains(&id) {
                return PaneId(id);
            }
        }
    }

    fn fill_missing_ids(&mut self) {
        let mut taken = self.taken_ids();
        let mut next = self.next_id;
        self.root.assign_missing_ids(|| loop {
            next += 1;
            let id = format!("{:016x}", next);
            if taken.insert(id.clone()) {
                return id;
            }
        });
        self.next_id = next;
    }

    fn sidebar_zone(&mut self, side: Side) -> Option<&mut Zone> {
        match side {
            Side::Left => self.root.left.as_mut(),
            Side::Right => self.root.right.as_mut(),
        }
    }
}

impl Workspace for DocumentWorkspace {
    fn current_arrangement(&self) -> Root {
        self.root.clone()
    }

    fn replace_arrangement(&mut self, root: Root) -> Result<(), HostError> {
        if !root.is_well_formed() {
            return Err(HostError::Rejected(
                "layout contains an empty split".to_string(),
            ));
        }
        self.root = root;
        self.fill_missing_ids();
        Ok(())
    }

    fn open_file_in_pane(
        &mut self,
        pane: &PaneId,
        path: &str,
        options: OpenOptions,
    ) -> Result<(), HostError> {
        let leaf = self
            .root
            .find_main_leaf_mut(pane)
            .ok_or_else(|| HostError::UnknownPane(pane.clone()))?;
        leaf.set_content_ref(Some(path.to_string()));
        if options.active {
            self.set_active(pane);
        }
        Ok(())
    }

    fn split_pane(&mut self, pane: &PaneId, orientation: Orientation) -> Result<PaneId, HostError> {
        let id = self.fresh_id();
        if !self.root.split(pane, orientation, Leaf::empty(id.as_str())) {
            return Err(HostError::UnknownPane(pane.clone()));
        }
        Ok(id)
    }

    fn new_tab(&mut self, pane: &PaneId) -> Result<PaneId, HostError> {
        let id = self.fresh_id();
        if !self.root.add_tab(pane, Leaf::empty(id.as_str())) {
            return Err(HostError::UnknownPane(pane.clone()));
        }
        Ok(id)
    }

    fn most_recent_pane(&self) -> Option<PaneId> {
        let main = self.root.main_leaf_ids();
        self.active_id()
            .and_then(|active| main.iter().find(|id| id.as_str() == active).cloned())
            .or_else(|| main.into_iter().next())
    }

    fn is_sidebar_visible(&self, side: Side) -> bool {
        let zone = match side {
            Side::Left => self.root.left.as_ref(),
            Side::Right => self.root.right.as_ref(),
        };
        zone.is_some_and(|z| z.field("collapsed").and_then(Value::as_bool) != Some(true))
    }

    fn toggle_sidebar(&mut self, side: Side) {
        let visible = self.is_sidebar_visible(side);
        match self.sidebar_zone(side) {
            Some(zone) => zone.set_field("collapsed", Value::Bool(visible)),
            None => tracing::debug!("No {:?} sidebar to toggle", side),
        }
    }

    fn notice(&mut self, message: &str) {
        tracing::info!("Notice: {}", message);
        self.notices.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fl_store::MemoryVault;
    use serde_json::json;

    fn document() -> DocumentWorkspace {
        let root: Root = serde_json::from_value(json!({
            "main": {
                "type": "split",
                "direction": "vertical",
                "children": [
                    { "type": "tabs", "children": [
                        {
                            "type": "leaf",
                            "id": "a",
                            "state": { "type": "markdown", "state": { "file": "x.md" } }
                        }
                    ] }
                ]
            },
            "left": { "type": "split", "direction": "horizontal", "collapsed": true, "children": [
                { "type": "leaf", "state": { "type": "file-explorer", "state": {} } }
            ] },
            "active": "a"
        }))
        .unwrap();
        DocumentWorkspace::new(root)
    }

    #[test]
    fn missing_ids_are_assigned() {
        let ws = document();
        let mut ids = Vec::new();
        ws.root().walk_leaves(&mut |leaf| ids.push(leaf.id.clone()));
        assert!(ids.iter().all(Option::is_some));
        assert_eq!(ids[0].as_deref(), Some("a"));
    }

    #[test]
    fn most_recent_is_active_pane() {
        let mut ws = document();
        assert_eq!(ws.most_recent_pane(), Some(PaneId::from("a")));
        let b = ws.split_pane(&PaneId::from("a"), Orientation::Vertical).unwrap();
        ws.open_file_in_pane(&b, "y.md", OpenOptions::active()).unwrap();
        assert_eq!(ws.most_recent_pane(), Some(b));
        assert_eq!(ws.open_files(), vec!["x.md", "y.md"]);
    }

    #[test]
    fn unknown_pane_is_an_error() {
        let mut ws = document();
        let ghost = PaneId::from("ghost");
        assert!(matches!(
            ws.open_file_in_pane(&ghost, "z.md", OpenOptions::active()),
            Err(HostError::UnknownPane(_))
        ));
        assert!(ws.split_pane(&ghost, Orientation::Vertical).is_err());
        assert!(ws.new_tab(&ghost).is_err());
    }

    #[test]
    fn sidebar_toggle_flips_collapsed() {
        let mut ws = document();
        assert!(!ws.is_sidebar_visible(Side::Left));
        ws.toggle_sidebar(Side::Left);
        assert!(ws.is_sidebar_visible(Side::Left));
        assert_eq!(
            ws.root().left.as_ref().unwrap().field("collapsed"),
            Some(&Value::Bool(false))
        );
        // No right sidebar at all
        assert!(!ws.is_sidebar_visible(Side::Right));
        ws.toggle_sidebar(Side::Right);
        assert!(!ws.is_sidebar_visible(Side::Right));
    }

    #[test]
    fn load_and_save_through_vault() {
        let mut vault = MemoryVault::new();
        let ws = DocumentWorkspace::load(&vault).unwrap();
        assert_eq!(ws.root().main_panes().len(), 1);

        document().save(&mut vault).unwrap();
        let reloaded = DocumentWorkspace::load(&vault).unwrap();
        assert_eq!(reloaded.root(), document().root());
    }

    #[test]
    fn malformed_document_is_rejected() {
        let err = DocumentWorkspace::from_json(
            br#"{"main": {"type": "tabs", "children": []}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DocumentError::Malformed));
    }
}
