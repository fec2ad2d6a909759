// ABOUTME: Filesystem vault backend rooted at a directory.
// ABOUTME: Writes go through a temp file and rename so readers never see partial files.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use fl_core::{path, Vault, VaultEntry, VaultError};

#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a vault path to a filesystem path, refusing anything that would
    /// escape the vault directory
    fn resolve(&self, vault_path: &str) -> Result<PathBuf, VaultError> {
        let relative = Path::new(vault_path.trim_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(VaultError::InvalidPath(vault_path.to_string()));
        }
        Ok(self.root.join(relative))
    }

    fn walk(
        &self,
        dir: &Path,
        vault_dir: &str,
        out: &mut Vec<VaultEntry>,
    ) -> Result<(), VaultError> {
        let mut children = fs::read_dir(dir)
            .map_err(|e| VaultError::io(vault_dir, e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| VaultError::io(vault_dir, e))?;
        children.sort_by_key(|entry| entry.file_name());

        for entry in children {
            let name = entry.file_name().to_string_lossy().into_owned();
            // Dot-files hold tool state (.obsidian, .git, .trash), not notes
            if name.starts_with('.') {
                continue;
            }
            let vault_path = path::join(vault_dir, &name);
            let file_type = entry
                .file_type()
                .map_err(|e| VaultError::io(vault_path.clone(), e))?;
            if file_type.is_dir() {
                out.push(VaultEntry::folder(vault_path.clone()));
                self.walk(&entry.path(), &vault_path, out)?;
            } else if file_type.is_file() {
                out.push(VaultEntry::file(vault_path));
            }
        }
        Ok(())
    }
}

impl Vault for FsVault {
    fn read(&self, vault_path: &str) -> Result<Vec<u8>, VaultError> {
        let target = self.resolve(vault_path)?;
        fs::read(&target).map_err(|e| VaultError::io(vault_path, e))
    }

    fn write(&mut self, vault_path: &str, contents: &[u8]) -> Result<(), VaultError> {
        let target = self.resolve(vault_path)?;
        let (Some(parent), Some(name)) = (target.parent(), target.file_name()) else {
            return Err(VaultError::InvalidPath(vault_path.to_string()));
        };
        fs::create_dir_all(parent).map_err(|e| VaultError::io(vault_path, e))?;

        let tmp = parent.join(format!(".{}.tmp", name.to_string_lossy()));
        let result = fs::File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(contents)?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp, &target));
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            return Err(VaultError::io(vault_path, e));
        }
        Ok(())
    }

    fn exists(&self, vault_path: &str) -> Result<bool, VaultError> {
        let target = self.resolve(vault_path)?;
        target
            .try_exists()
            .map_err(|e| VaultError::io(vault_path, e))
    }

    fn list_recursive(&self, folder: &str) -> Result<Vec<VaultEntry>, VaultError> {
        let folder = path::normalize_folder(folder);
        let dir = self.resolve(folder)?;
        let mut out = Vec::new();
        self.walk(&dir, folder, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault_with(files: &[&str]) -> (tempfile::TempDir, FsVault) {
        let dir = tempfile::tempdir().unwrap();
        for f in files {
            let p = dir.path().join(f);
            fs::create_dir_all(p.parent().unwrap()).unwrap();
            fs::write(&p, f.as_bytes()).unwrap();
        }
        let vault = FsVault::new(dir.path());
        (dir, vault)
    }

    #[test]
    fn lists_preorder_and_skips_dotfiles() {
        let (_dir, vault) = vault_with(&[
            "Alpha/b.md",
            "Alpha/a.md",
            "Alpha/sub/c.md",
            "Alpha/.hidden.md",
            ".obsidian/workspace.json",
        ]);
        let listed: Vec<_> = vault
            .list_recursive("Alpha")
            .unwrap()
            .into_iter()
            .map(|e| (e.path, e.kind))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("Alpha/a.md".to_string(), fl_core::EntryKind::File),
                ("Alpha/b.md".to_string(), fl_core::EntryKind::File),
                ("Alpha/sub".to_string(), fl_core::EntryKind::Folder),
                ("Alpha/sub/c.md".to_string(), fl_core::EntryKind::File),
            ]
        );

        let everything = vault.list_recursive("/").unwrap();
        assert_eq!(everything[0].path, "Alpha");
    }

    #[test]
    fn write_creates_parents_and_leaves_no_temp_file() {
        let (dir, mut vault) = vault_with(&[]);
        vault.write("Projects/Alpha/layout.json", b"{}").unwrap();
        assert_eq!(vault.read("Projects/Alpha/layout.json").unwrap(), b"{}");

        let names: Vec<_> = fs::read_dir(dir.path().join("Projects/Alpha"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["layout.json"]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let (_dir, vault) = vault_with(&[]);
        assert!(matches!(vault.read("nope.md"), Err(VaultError::NotFound(_))));
        assert!(!vault.exists("nope.md").unwrap());
        assert!(matches!(vault.list_recursive("Nope"), Err(VaultError::NotFound(_))));
    }

    #[test]
    fn paths_cannot_escape_the_vault() {
        let (_dir, mut vault) = vault_with(&[]);
        assert!(matches!(
            vault.write("../outside.md", b"x"),
            Err(VaultError::InvalidPath(_))
        ));
        assert!(matches!(vault.read("a/../../b"), Err(VaultError::InvalidPath(_))));
    }
}
