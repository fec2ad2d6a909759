// ABOUTME: Saved layout persistence for folders.
// ABOUTME: Reads and writes `<folder>/layout.json` through the vault.

use fl_core::{path, Vault, VaultError};
use fl_layout::Root;

/// File name of a folder's saved layout
pub const LAYOUT_FILE_NAME: &str = "layout.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No saved layout at {0}")]
    NotFound(String),

    #[error("Layout at {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Layout at {0} contains an empty split")]
    Malformed(String),

    #[error("Failed to serialize layout: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] VaultError),
}

impl StoreError {
    /// The stored document exists but is not a usable layout
    pub fn is_parse_error(&self) -> bool {
        matches!(self, StoreError::Parse { .. } | StoreError::Malformed(_))
    }
}

/// Saved layouts, one per folder
#[derive(Debug)]
pub struct LayoutStore<V> {
    vault: V,
}

impl<V: Vault> LayoutStore<V> {
    pub fn new(vault: V) -> Self {
        Self { vault }
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn vault_mut(&mut self) -> &mut V {
        &mut self.vault
    }

    pub fn into_inner(self) -> V {
        self.vault
    }

    /// Where the layout for `folder` lives
    pub fn layout_path(folder: &str) -> String {
        path::join(folder, LAYOUT_FILE_NAME)
    }

    /// Whether `folder` has a saved layout. Storage errors count as "no".
    pub fn exists(&self, folder: &str) -> bool {
        let path = Self::layout_path(folder);
        match self.vault.exists(&path) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Could not check for {}: {}", path, e);
                false
            }
        }
    }

    /// Write `root` as the saved layout of `folder`
    pub fn save(&mut self, folder: &str, root: &Root) -> Result<(), StoreError> {
        let path = Self::layout_path(folder);
        if !root.is_well_formed() {
            return Err(StoreError::Malformed(path));
        }
        let json = serde_json::to_vec_pretty(root).map_err(StoreError::Serialize)?;
        self.vault.write(&path, &json)?;
        tracing::debug!("Wrote {} ({} bytes)", path, json.len());
        Ok(())
    }

    /// Read the saved layout of `folder`
    pub fn load(&self, folder: &str) -> Result<Root, StoreError> {
        let path = Self::layout_path(folder);
        let bytes = self.vault.read(&path).map_err(|e| match e {
            VaultError::NotFound(_) => StoreError::NotFound(path.clone()),
            other => StoreError::Storage(other),
        })?;

        let root: Root = serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;

        if !root.is_well_formed() {
            return Err(StoreError::Malformed(path));
        }
        Ok(root)
    }
}
