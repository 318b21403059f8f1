//! In-memory filesystem.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::ports::filesystem::FileSystem;

/// Filesystem backed by a fixed set of files.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: HashMap<PathBuf, String>,
}

impl MemoryFileSystem {
    /// An empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, replacing any previous contents.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn exists(&self, path: &Path) -> bool {
        // A directory exists when any file lives under it.
        self.files.keys().any(|k| k.starts_with(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_added_files() {
        let fs = MemoryFileSystem::new().with_file("/project/Taskfile.yml", "tasks: {}");
        assert_eq!(fs.read_to_string(Path::new("/project/Taskfile.yml")).unwrap(), "tasks: {}");
        assert!(fs.exists(Path::new("/project")));
        assert!(!fs.exists(Path::new("/other")));
    }

    #[test]
    fn missing_file_names_path() {
        let err = MemoryFileSystem::new().read_to_string(Path::new("/nope.yml")).unwrap_err();
        assert!(err.to_string().contains("/nope.yml"));
    }
}
