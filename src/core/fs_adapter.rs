//! Filesystem adapter scoped to a single directory.
//!
//! Writer and deleter go through this adapter rather than touching the
//! repository root directly: all paths are relative to the scope root and
//! traversal outside it is rejected.

use crate::core::error::StoreError;
use std::fs;
use std::path::{Path, PathBuf};

/// Write/update/delete access rooted at one directory.
#[derive(Debug, Clone)]
pub struct ScopedDir {
    root: PathBuf,
}

impl ScopedDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, relative: &Path) -> Result<PathBuf, StoreError> {
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(StoreError::Adapter(format!(
                "path must stay within the store directory: {}",
                relative.display()
            )));
        }
        Ok(self.root.join(relative))
    }

    /// Create a new file. Fails if the target already exists.
    pub fn write(&self, relative: &Path, content: &str) -> Result<(), StoreError> {
        let target = self.resolve(relative)?;
        if target.exists() {
            return Err(StoreError::Adapter(format!(
                "file already exists: {}",
                relative.display()
            )));
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, content)?;
        Ok(())
    }

    /// Overwrite an existing file. Fails if the target does not exist.
    pub fn update(&self, relative: &Path, content: &str) -> Result<(), StoreError> {
        let target = self.resolve(relative)?;
        if !target.exists() {
            return Err(StoreError::Adapter(format!(
                "cannot update missing file: {}",
                relative.display()
            )));
        }
        fs::write(&target, content)?;
        Ok(())
    }

    /// Remove a file. Propagates the underlying error if it is absent.
    pub fn delete(&self, relative: &Path) -> Result<(), StoreError> {
        let target = self.resolve(relative)?;
        fs::remove_file(&target)?;
        Ok(())
    }
}
