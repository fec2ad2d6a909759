// ABOUTME: Index of the items the host's file explorer currently shows.
// ABOUTME: Refreshed when the host reports a change, skipped while a layout operation runs.

use std::collections::HashMap;

use fl_core::{EntryKind, InFlight, VaultEntry};

#[derive(Debug)]
pub struct ExplorerIndex {
    items: HashMap<String, EntryKind>,
    in_flight: InFlight,
    stale: bool,
}

impl ExplorerIndex {
    pub fn new(in_flight: InFlight) -> Self {
        Self {
            items: HashMap::new(),
            in_flight,
            stale: false,
        }
    }

    /// Replace the index with `items`. Returns false, leaving the index
    /// untouched, if a layout operation is in flight.
    pub fn refresh(&mut self, items: impl IntoIterator<Item = VaultEntry>) -> bool {
        let Some(_guard) = self.in_flight.try_enter() else {
            tracing::debug!("Explorer refresh skipped, layout operation in flight");
            self.stale = true;
            return false;
        };
        self.items = items.into_iter().map(|e| (e.path, e.kind)).collect();
        self.stale = false;
        true
    }

    /// A refresh was skipped since the last successful one
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn kind_of(&self, path: &str) -> Option<EntryKind> {
        self.items.get(path.trim_end_matches('/')).copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
