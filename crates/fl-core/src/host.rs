// ABOUTME: Interfaces to the host application's file storage.
// ABOUTME: Also defines the pane identifiers and options shared with the window system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction a split container lays out its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Children stacked top to bottom
    Horizontal,
    /// Children side by side
    #[default]
    Vertical,
}

/// Host-assigned identifier of a single pane (a layout leaf)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(pub String);

impl PaneId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaneId {
    fn from(s: &str) -> Self {
        PaneId(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenOptions {
    /// Focus the pane after opening
    pub active: bool,
}

impl OpenOptions {
    pub fn active() -> Self {
        Self { active: true }
    }

    pub fn background() -> Self {
        Self { active: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Folder,
}

/// One item returned by a recursive vault listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultEntry {
    /// Vault-relative path, `/`-separated, no leading slash
    pub path: String,
    pub kind: EntryKind,
}

impl VaultEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    pub fn folder(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Folder,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid vault path: {0:?}")]
    InvalidPath(String),
}

impl VaultError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return VaultError::NotFound(path.into());
        }
        VaultError::Io {
            path: path.into(),
            source,
        }
    }
}

/// The host's file storage, addressed by vault-relative paths
pub trait Vault {
    fn read(&self, path: &str) -> Result<Vec<u8>, VaultError>;

    /// Replace the file's contents. Implementations must not leave a
    /// partially written file behind on failure.
    fn write(&mut self, path: &str, contents: &[u8]) -> Result<(), VaultError>;

    fn exists(&self, path: &str) -> Result<bool, VaultError>;

    /// Every file and folder below `folder`, pre-order: a folder comes
    /// before its children, siblings in the host's native order.
    fn list_recursive(&self, folder: &str) -> Result<Vec<VaultEntry>, VaultError>;
}

/// Failure reported by the window system
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Unknown pane: {0}")]
    UnknownPane(PaneId),

    #[error("{0}")]
    Rejected(String),
}
