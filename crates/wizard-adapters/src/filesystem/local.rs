//! Filesystem port backed by the real disk.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use wizard_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{WizardError, WizardResult},
};

/// Reads and writes under whatever path it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> WizardResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> WizardResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn append_file(&self, path: &Path, content: &str) -> WizardResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| map_io_error(path, e, "open file"))?;
        file.write_all(content.as_bytes())
            .map_err(|e| map_io_error(path, e, "append to file"))
    }

    fn read_to_string(&self, path: &Path) -> WizardResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> WizardError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn append_creates_then_extends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        let fs = LocalFilesystem::new();

        fs.append_file(&path, "A=1\n").unwrap();
        fs.append_file(&path, "B=2\n").unwrap();

        assert_eq!(fs.read_to_string(&path).unwrap(), "A=1\nB=2\n");
    }

    #[test]
    fn write_into_missing_parent_is_a_filesystem_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing/file.txt");

        let err = LocalFilesystem::new().write_file(&path, "x").unwrap_err();
        assert!(matches!(
            err,
            WizardError::Application(ApplicationError::FilesystemError { .. })
        ));
    }

    #[test]
    fn nested_directories_are_created() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        let fs = LocalFilesystem::new();

        fs.create_dir_all(&nested).unwrap();
        fs.create_dir_all(&nested).unwrap();
        assert!(fs.exists(&nested));
    }
}
