//! A fake disk kept in a map, for service and command tests.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use wizard_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{WizardError, WizardResult},
};

/// In-memory filesystem. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parent directories.
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                insert_ancestors(&mut inner.directories, parent);
            }
            inner.files.insert(path.to_path_buf(), content.to_owned());
        }
        self
    }

    /// Current content of `path`, if it was written.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// Check whether a directory was created.
    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path.as_ref()))
            .unwrap_or(false)
    }

    /// All file paths, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read_lock(&self, path: &Path) -> WizardResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| poisoned(path))
    }

    fn write_lock(&self, path: &Path) -> WizardResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| poisoned(path))
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> WizardResult<()> {
        let mut inner = self.write_lock(path)?;
        insert_ancestors(&mut inner.directories, path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> WizardResult<()> {
        let mut inner = self.write_lock(path)?;
        check_parent(&inner, path)?;
        inner.files.insert(path.to_path_buf(), content.to_owned());
        Ok(())
    }

    fn append_file(&self, path: &Path, content: &str) -> WizardResult<()> {
        let mut inner = self.write_lock(path)?;
        check_parent(&inner, path)?;
        inner
            .files
            .entry(path.to_path_buf())
            .or_default()
            .push_str(content);
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> WizardResult<String> {
        self.read_lock(path)?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| {
                ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "No such file".into(),
                }
                .into()
            })
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }
}

fn insert_ancestors(directories: &mut BTreeSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        directories.insert(current.clone());
    }
}

fn check_parent(inner: &MemoryFilesystemInner, path: &Path) -> WizardResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) => {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Parent directory does not exist".into(),
            }
            .into())
        }
        _ => Ok(()),
    }
}

fn poisoned(path: &Path) -> WizardError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "In-memory filesystem lock poisoned".into(),
    }
    .into()
}
