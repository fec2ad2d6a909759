// ABOUTME: Tree structure for workspace pane layout documents.
// ABOUTME: Supports leaf traversal, validation, splitting, and tab insertion.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use fl_core::{Orientation, PaneId};

/// Fields the engine does not interpret, kept verbatim
pub type Extra = Map<String, Value>;

/// View state of a leaf: `state.type` and `state.state`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafState {
    #[serde(rename = "type")]
    pub view_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A single pane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<LeafState>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Leaf {
    /// A pane showing nothing
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            state: Some(LeafState {
                view_type: "empty".to_string(),
                state: Some(Map::new()),
                extra: Extra::new(),
            }),
            extra: Extra::new(),
        }
    }

    /// A markdown pane showing `path`
    pub fn showing(id: impl Into<String>, path: impl Into<String>) -> Self {
        let mut leaf = Self::empty(id);
        leaf.set_content_ref(Some(path.into()));
        leaf
    }

    /// The file this pane displays (`state.state.file`), if any
    pub fn content_ref(&self) -> Option<&str> {
        self.state
            .as_ref()?
            .state
            .as_ref()?
            .get("file")?
            .as_str()
            .filter(|s| !s.is_empty())
    }

    /// Point the pane at `path`, or clear its reference.
    ///
    /// Only `state.state.file` is written (plus `state.type` when an empty
    /// pane starts showing a file); every other field is left as it was.
    pub fn set_content_ref(&mut self, path: Option<String>) {
        match path {
            Some(path) => {
                let state = self.state.get_or_insert_with(|| LeafState {
                    view_type: "markdown".to_string(),
                    state: None,
                    extra: Extra::new(),
                });
                if state.view_type == "empty" {
                    state.view_type = "markdown".to_string();
                }
                state
                    .state
                    .get_or_insert_with(Map::new)
                    .insert("file".to_string(), Value::String(path));
            }
            None => {
                if let Some(inner) = self.state.as_mut().and_then(|s| s.state.as_mut()) {
                    inner.remove("file");
                }
            }
        }
    }

    pub fn pane_id(&self) -> Option<PaneId> {
        self.id.as_deref().map(PaneId::from)
    }
}

/// A container dividing space between its children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "direction", default)]
    pub orientation: Orientation,
    pub children: Vec<LayoutNode>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Split {
    pub fn new(orientation: Orientation, children: Vec<LayoutNode>) -> Self {
        Self {
            id: None,
            orientation,
            children,
            extra: Extra::new(),
        }
    }
}

/// A tab group: one visible pane cycling through several leaves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tabs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub children: Vec<LayoutNode>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Tabs {
    pub fn new(children: Vec<LayoutNode>) -> Self {
        Self {
            id: None,
            children,
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayoutNode {
    Leaf(Leaf),
    Split(Split),
    Tabs(Tabs),
}

impl From<Leaf> for LayoutNode {
    fn from(leaf: Leaf) -> Self {
        LayoutNode::Leaf(leaf)
    }
}

impl From<Split> for LayoutNode {
    fn from(split: Split) -> Self {
        LayoutNode::Split(split)
    }
}

impl From<Tabs> for LayoutNode {
    fn from(tabs: Tabs) -> Self {
        LayoutNode::Tabs(tabs)
    }
}

impl LayoutNode {
    pub fn id(&self) -> Option<&str> {
        match self {
            LayoutNode::Leaf(leaf) => leaf.id.as_deref(),
            LayoutNode::Split(split) => split.id.as_deref(),
            LayoutNode::Tabs(tabs) => tabs.id.as_deref(),
        }
    }

    pub fn children(&self) -> &[LayoutNode] {
        match self {
            LayoutNode::Leaf(_) => &[],
            LayoutNode::Split(split) => &split.children,
            LayoutNode::Tabs(tabs) => &tabs.children,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<LayoutNode>> {
        match self {
            LayoutNode::Leaf(_) => None,
            LayoutNode::Split(split) => Some(&mut split.children),
            LayoutNode::Tabs(tabs) => Some(&mut tabs.children),
        }
    }

    /// Visit every leaf depth-first, left to right
    pub fn walk_leaves<'a, F: FnMut(&'a Leaf)>(&'a self, visit: &mut F) {
        match self {
            LayoutNode::Leaf(leaf) => visit(leaf),
            LayoutNode::Split(_) | LayoutNode::Tabs(_) => {
                for child in self.children() {
                    child.walk_leaves(visit);
                }
            }
        }
    }

    pub fn walk_leaves_mut<F: FnMut(&mut Leaf)>(&mut self, visit: &mut F) {
        match self {
            LayoutNode::Leaf(leaf) => visit(leaf),
            LayoutNode::Split(Split { children, .. }) | LayoutNode::Tabs(Tabs { children, .. }) => {
                for child in children {
                    child.walk_leaves_mut(visit);
                }
            }
        }
    }

    /// Every container has at least one child
    pub fn is_well_formed(&self) -> bool {
        match self {
            LayoutNode::Leaf(_) => true,
            LayoutNode::Split(_) | LayoutNode::Tabs(_) => {
                !self.children().is_empty() && self.children().iter().all(Self::is_well_formed)
            }
        }
    }

    /// Visible panes, each as the leaves stacked in it. A tab group is one
    /// pane; a leaf outside any tab group is a pane of its own.
    pub fn panes(&self) -> Vec<Vec<&Leaf>> {
        let mut out = Vec::new();
        collect_panes(self, &mut out);
        out
    }

    /// Child indices leading from this node to the leaf with `id`
    fn path_to_leaf(&self, id: &str) -> Option<Vec<usize>> {
        match self {
            LayoutNode::Leaf(leaf) => (leaf.id.as_deref() == Some(id)).then(Vec::new),
            _ => self.children().iter().enumerate().find_map(|(i, child)| {
                child.path_to_leaf(id).map(|mut rest| {
                    rest.insert(0, i);
                    rest
                })
            }),
        }
    }

    fn node_at(&self, path: &[usize]) -> Option<&LayoutNode> {
        match path.split_first() {
            None => Some(self),
            Some((i, rest)) => self.children().get(*i)?.node_at(rest),
        }
    }

    fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut LayoutNode> {
        match path.split_first() {
            None => Some(self),
            Some((i, rest)) => self.children_mut()?.get_mut(*i)?.node_at_mut(rest),
        }
    }
}

fn collect_panes<'a>(node: &'a LayoutNode, out: &mut Vec<Vec<&'a Leaf>>) {
    match node {
        LayoutNode::Leaf(leaf) => out.push(vec![leaf]),
        LayoutNode::Tabs(_) => {
            let mut leaves = Vec::new();
            node.walk_leaves(&mut |leaf| leaves.push(leaf));
            out.push(leaves);
        }
        LayoutNode::Split(split) => {
            for child in &split.children {
                collect_panes(child, out);
            }
        }
    }
}

/// A top-level window zone other than `main`.
///
/// Sidebars are usually layout trees, but hosts put other shapes there too
/// (e.g. mobile drawers); anything unrecognized is carried as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Zone {
    Layout(LayoutNode),
    Opaque(Value),
}

impl Zone {
    /// A top-level field of the zone object, such as `collapsed`
    pub fn field(&self, key: &str) -> Option<&Value> {
        match self {
            Zone::Layout(LayoutNode::Leaf(n)) => n.extra.get(key),
            Zone::Layout(LayoutNode::Split(n)) => n.extra.get(key),
            Zone::Layout(LayoutNode::Tabs(n)) => n.extra.get(key),
            Zone::Opaque(value) => value.get(key),
        }
    }

    pub fn set_field(&mut self, key: &str, value: Value) {
        let extra = match self {
            Zone::Layout(LayoutNode::Leaf(n)) => &mut n.extra,
            Zone::Layout(LayoutNode::Split(n)) => &mut n.extra,
            Zone::Layout(LayoutNode::Tabs(n)) => &mut n.extra,
            Zone::Opaque(Value::Object(map)) => map,
            Zone::Opaque(_) => return,
        };
        extra.insert(key.to_string(), value);
    }

    fn walk_leaves<'a, F: FnMut(&'a Leaf)>(&'a self, visit: &mut F) {
        if let Zone::Layout(node) = self {
            node.walk_leaves(visit);
        }
    }

    fn is_well_formed(&self) -> bool {
        match self {
            Zone::Layout(node) => node.is_well_formed(),
            Zone::Opaque(_) => true,
        }
    }
}

/// The whole-window layout document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Root {
    pub main: LayoutNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Zone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Zone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Zone>,
    #[serde(rename = "left-ribbon", default, skip_serializing_if = "Option::is_none")]
    pub left_ribbon: Option<Value>,
    #[serde(rename = "right-ribbon", default, skip_serializing_if = "Option::is_none")]
    pub right_ribbon: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Root {
    pub fn new(main: impl Into<LayoutNode>) -> Self {
        Self {
            main: main.into(),
            left: None,
            right: None,
            center: None,
            left_ribbon: None,
            right_ribbon: None,
            extra: Extra::new(),
        }
    }

    /// Visit every leaf under `main`, `left`, `right`, and `center`, in that order
    pub fn walk_leaves<'a, F: FnMut(&'a Leaf)>(&'a self, visit: &mut F) {
        self.main.walk_leaves(visit);
        for zone in [&self.left, &self.right, &self.center].into_iter().flatten() {
            zone.walk_leaves(visit);
        }
    }

    pub fn walk_main_leaves_mut<F: FnMut(&mut Leaf)>(&mut self, visit: &mut F) {
        self.main.walk_leaves_mut(visit);
    }

    pub fn is_well_formed(&self) -> bool {
        self.main.is_well_formed()
            && [&self.left, &self.right, &self.center]
                .into_iter()
                .flatten()
                .all(Zone::is_well_formed)
    }

    /// Files shown in the main area, in walk order, each listed once
    pub fn open_files(&self) -> Vec<String> {
        let mut files: Vec<String> = Vec::new();
        self.main.walk_leaves(&mut |leaf| {
            if let Some(path) = leaf.content_ref() {
                if !files.iter().any(|f| f == path) {
                    files.push(path.to_string());
                }
            }
        });
        files
    }

    /// Ids of the panes in the main area
    pub fn main_leaf_ids(&self) -> Vec<PaneId> {
        let mut ids = Vec::new();
        self.main.walk_leaves(&mut |leaf| ids.extend(leaf.pane_id()));
        ids
    }

    pub fn find_leaf(&self, id: &PaneId) -> Option<&Leaf> {
        let mut found = None;
        self.walk_leaves(&mut |leaf| {
            if found.is_none() && leaf.id.as_deref() == Some(id.as_str()) {
                found = Some(leaf);
            }
        });
        found
    }

    pub fn find_main_leaf_mut(&mut self, id: &PaneId) -> Option<&mut Leaf> {
        let path = self.main.path_to_leaf(id.as_str())?;
        match self.main.node_at_mut(&path)? {
            LayoutNode::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Give every leaf that lacks an id one from `next_id`
    pub fn assign_missing_ids(&mut self, mut next_id: impl FnMut() -> String) {
        let mut assign = |leaf: &mut Leaf| {
            if leaf.id.is_none() {
                leaf.id = Some(next_id());
            }
        };
        self.main.walk_leaves_mut(&mut assign);
        for zone in [&mut self.left, &mut self.right, &mut self.center]
            .into_iter()
            .flatten()
        {
            if let Zone::Layout(node) = zone {
                node.walk_leaves_mut(&mut assign);
            }
        }
    }

    /// Split the main-area pane holding leaf `target`, placing `new_leaf`
    /// in a new pane after it. Returns false if `target` is not in `main`.
    pub fn split(&mut self, target: &PaneId, orientation: Orientation, new_leaf: Leaf) -> bool {
        let Some(leaf_path) = self.main.path_to_leaf(target.as_str()) else {
            return false;
        };

        // The unit being split is the tab group holding the leaf, if any
        let mut unit_path = leaf_path;
        let in_tab_group = unit_path.split_last().is_some_and(|(_, parent)| {
            matches!(self.main.node_at(parent), Some(LayoutNode::Tabs(_)))
        });
        if in_tab_group {
            unit_path.pop();
        }
        let new_unit = match self.main.node_at(&unit_path) {
            Some(LayoutNode::Tabs(_)) => LayoutNode::Tabs(Tabs::new(vec![new_leaf.into()])),
            _ => LayoutNode::Leaf(new_leaf),
        };

        let Some((&index, container_path)) = unit_path.split_last() else {
            let old_main =
                std::mem::replace(&mut self.main, LayoutNode::Tabs(Tabs::new(Vec::new())));
            self.main = Split::new(orientation, vec![old_main, new_unit]).into();
            return true;
        };

        match self.main.node_at_mut(container_path) {
            Some(LayoutNode::Split(split)) if split.orientation == orientation => {
                split.children.insert(index + 1, new_unit);
                true
            }
            Some(container) => {
                let Some(children) = container.children_mut() else {
                    return false;
                };
                let old = std::mem::replace(
                    &mut children[index],
                    LayoutNode::Tabs(Tabs::new(Vec::new())),
                );
                children[index] = Split::new(orientation, vec![old, new_unit]).into();
                true
            }
            None => false,
        }
    }

    /// Add `new_leaf` as a tab right after leaf `target`, wrapping the
    /// target in a tab group if it is not in one. Returns false if `target`
    /// is not in `main`.
    pub fn add_tab(&mut self, target: &PaneId, new_leaf: Leaf) -> bool {
        let Some(leaf_path) = self.main.path_to_leaf(target.as_str()) else {
            return false;
        };

        if let Some((&index, parent)) = leaf_path.split_last() {
            if let Some(LayoutNode::Tabs(tabs)) = self.main.node_at_mut(parent) {
                tabs.children.insert(index + 1, new_leaf.into());
                return true;
            }
        }

        let Some(slot) = self.main.node_at_mut(&leaf_path) else {
            return false;
        };
        let old = std::mem::replace(slot, LayoutNode::Tabs(Tabs::new(Vec::new())));
        *slot = Tabs::new(vec![old, new_leaf.into()]).into();
        true
    }

    /// Visible panes in the main area
    pub fn main_panes(&self) -> Vec<Vec<&Leaf>> {
        self.main.panes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Root {
        serde_json::from_value(json!({
            "main": {
                "id": "m",
                "type": "split",
                "direction": "vertical",
                "children": [
                    {
                        "id": "t1",
                        "type": "tabs",
                        "currentTab": 0,
                        "children": [
                            {
                                "id": "a",
                                "type": "leaf",
                                "state": {
                                    "type": "markdown",
                                    "state": { "file": "Projects/Alpha/a.md", "mode": "source" },
                                    "pinned": true
                                }
                            }
                        ]
                    },
                    {
                        "id": "b",
                        "type": "leaf",
                        "state": { "type": "empty", "state": {} }
                    }
                ]
            },
            "left": {
                "id": "l",
                "type": "split",
                "direction": "horizontal",
                "collapsed": false,
                "children": [
                    {
                        "id": "fe",
                        "type": "leaf",
                        "state": {
                            "type": "file-explorer",
                            "state": { "sortOrder": "alphabetical" }
                        }
                    }
                ]
            },
            "left-ribbon": { "hiddenItems": { "graph:Open graph view": false } },
            "active": "a",
            "lastOpenFiles": ["Projects/Alpha/a.md"]
        }))
        .unwrap()
    }

    #[test]
    fn walk_visits_main_then_sidebars() {
        let root = sample();
        let mut ids = Vec::new();
        root.walk_leaves(&mut |leaf| ids.push(leaf.id.clone().unwrap()));
        assert_eq!(ids, vec!["a", "b", "fe"]);
    }

    #[test]
    fn walk_visits_center_after_sidebars() {
        let mut root = sample();
        root.right = Some(Zone::Layout(LayoutNode::Leaf(Leaf::empty("outline"))));
        root.center = Some(Zone::Layout(LayoutNode::Leaf(Leaf::showing(
            "c",
            "Canvas/board.md",
        ))));
        let mut ids = Vec::new();
        root.walk_leaves(&mut |leaf| ids.push(leaf.id.clone().unwrap()));
        assert_eq!(ids, vec!["a", "b", "fe", "outline", "c"]);
        // Only main counts as open content
        assert!(!root.open_files().contains(&"Canvas/board.md".to_string()));
    }

    #[test]
    fn unknown_fields_survive_roundtrip() {
        let root = sample();
        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json["active"], "a");
        assert_eq!(json["left-ribbon"]["hiddenItems"]["graph:Open graph view"], false);
        let leaf = &json["main"]["children"][0]["children"][0];
        assert_eq!(leaf["state"]["pinned"], true);
        assert_eq!(leaf["state"]["state"]["mode"], "source");
        assert_eq!(json["main"]["children"][0]["currentTab"], 0);

        let back: Root = serde_json::from_value(json).unwrap();
        assert_eq!(back, root);
    }

    #[test]
    fn content_ref_reads_state_file() {
        let root = sample();
        let leaf = root.find_leaf(&PaneId::from("a")).unwrap();
        assert_eq!(leaf.content_ref(), Some("Projects/Alpha/a.md"));
        let empty = root.find_leaf(&PaneId::from("b")).unwrap();
        assert_eq!(empty.content_ref(), None);
        assert_eq!(root.open_files(), vec!["Projects/Alpha/a.md"]);
    }

    #[test]
    fn clearing_ref_keeps_other_state() {
        let mut root = sample();
        let leaf = root.find_main_leaf_mut(&PaneId::from("a")).unwrap();
        leaf.set_content_ref(None);
        let state = leaf.state.as_ref().unwrap();
        assert_eq!(state.view_type, "markdown");
        assert_eq!(state.state.as_ref().unwrap()["mode"], "source");
        assert!(leaf.content_ref().is_none());
    }

    #[test]
    fn empty_split_is_malformed() {
        let mut root = sample();
        assert!(root.is_well_formed());
        root.main = Split::new(Orientation::Vertical, Vec::new()).into();
        assert!(!root.is_well_formed());
    }

    #[test]
    fn empty_sidebar_split_is_malformed() {
        let mut root = sample();
        root.left = Some(Zone::Layout(Split::new(Orientation::Horizontal, Vec::new()).into()));
        assert!(!root.is_well_formed());
    }

    #[test]
    fn unrecognized_sidebar_is_opaque() {
        let root: Root = serde_json::from_value(json!({
            "main": { "type": "leaf", "id": "x" },
            "left": { "type": "mobile-drawer", "children": [], "currentTab": 0 }
        }))
        .unwrap();
        assert!(matches!(root.left, Some(Zone::Opaque(_))));
        assert!(root.is_well_formed());
    }

    #[test]
    fn split_tab_group_adds_sibling_group() {
        let mut root = sample();
        assert!(root.split(&PaneId::from("a"), Orientation::Vertical, Leaf::empty("c")));
        let ids: Vec<_> = root
            .main_panes()
            .iter()
            .map(|pane| pane[0].id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
        assert!(matches!(&root.main.children()[1], LayoutNode::Tabs(_)));
    }

    #[test]
    fn split_across_orientation_nests_split() {
        let mut root = sample();
        assert!(root.split(&PaneId::from("b"), Orientation::Horizontal, Leaf::empty("c")));
        match &root.main.children()[1] {
            LayoutNode::Split(split) => {
                assert_eq!(split.orientation, Orientation::Horizontal);
                assert_eq!(split.children.len(), 2);
            }
            other => panic!("expected nested split, got {:?}", other),
        }
    }

    #[test]
    fn split_single_leaf_main() {
        let mut root = Root::new(Leaf::empty("only"));
        assert!(root.split(&PaneId::from("only"), Orientation::Vertical, Leaf::empty("next")));
        assert_eq!(root.main_panes().len(), 2);
        assert!(!root.split(&PaneId::from("missing"), Orientation::Vertical, Leaf::empty("z")));
    }

    #[test]
    fn add_tab_inserts_after_target() {
        let mut root = sample();
        assert!(root.add_tab(&PaneId::from("a"), Leaf::empty("c")));
        assert!(root.add_tab(&PaneId::from("b"), Leaf::empty("d")));
        let panes = root.main_panes();
        assert_eq!(panes.len(), 2);
        assert_eq!(panes[0].len(), 2);
        assert_eq!(panes[0][1].id.as_deref(), Some("c"));
        assert_eq!(panes[1].len(), 2);
    }

    #[test]
    fn assign_missing_ids_fills_gaps() {
        let mut root: Root = serde_json::from_value(json!({
            "main": {
                "type": "split",
                "direction": "vertical",
                "children": [ { "type": "leaf" }, { "type": "leaf", "id": "keep" } ]
            }
        }))
        .unwrap();
        let mut n = 0;
        root.assign_missing_ids(|| {
            n += 1;
            format!("gen{}", n)
        });
        assert_eq!(
            root.main_leaf_ids(),
            vec![PaneId::from("gen1"), PaneId::from("keep")]
        );
    }
}
