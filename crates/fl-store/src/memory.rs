// ABOUTME: In-memory vault backend.
// ABOUTME: Folders are implied by the paths of the files stored under them.

use std::collections::{BTreeMap, BTreeSet};

use fl_core::{path, Vault, VaultEntry, VaultError};

#[derive(Debug, Clone, Default)]
pub struct MemoryVault {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// A vault holding the given files, each with placeholder contents
    pub fn with_files<'a>(paths: impl IntoIterator<Item = &'a str>) -> Self {
        let mut vault = Self::new();
        for p in paths {
            vault.insert(p, Vec::new());
        }
        vault
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: Vec<u8>) {
        self.files.insert(path.into(), contents);
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.files.remove(path)
    }
}

impl Vault for MemoryVault {
    fn read(&self, path: &str) -> Result<Vec<u8>, VaultError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| VaultError::NotFound(path.to_string()))
    }

    fn write(&mut self, path: &str, contents: &[u8]) -> Result<(), VaultError> {
        if path.is_empty() || path.ends_with('/') {
            return Err(VaultError::InvalidPath(path.to_string()));
        }
        self.files.insert(path.to_string(), contents.to_vec());
        Ok(())
    }

    fn exists(&self, p: &str) -> Result<bool, VaultError> {
        Ok(self.files.contains_key(p) || self.files.keys().any(|f| path::is_inside(f, p)))
    }

    fn list_recursive(&self, folder: &str) -> Result<Vec<VaultEntry>, VaultError> {
        let folder = path::normalize_folder(folder);
        let mut folders = BTreeSet::new();
        let mut entries = Vec::new();

        for file in self.files.keys() {
            let Some(relative) = path::relative_to(file, folder) else {
                continue;
            };
            // Every folder between `folder` and the file
            let mut prefix = String::new();
            let mut parts = relative.split('/').peekable();
            while let Some(part) = parts.next() {
                if parts.peek().is_none() {
                    break;
                }
                if !prefix.is_empty() {
                    prefix.push('/');
                }
                prefix.push_str(part);
                folders.insert(path::join(folder, &prefix));
            }
            entries.push(VaultEntry::file(file.clone()));
        }

        if entries.is_empty() && !path::is_root(folder) {
            return Err(VaultError::NotFound(folder.to_string()));
        }

        entries.extend(folders.into_iter().map(VaultEntry::folder));
        // Component-wise order puts each folder before its children
        entries.sort_by(|a, b| a.path.split('/').cmp(b.path.split('/')));
        Ok(entries)
    }
}
