//! Git CLI backend.
//!
//! Every operation shells out to `git` in the repository root and waits for
//! it synchronously. Failures (spawn errors, non-zero exit) surface as
//! [`StoreError::Backend`] with stderr attached; nothing is retried.

use crate::core::error::StoreError;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Branch used when the caller does not name one.
pub const DEFAULT_BRANCH: &str = "master";

/// Handle to a git repository opened at a filesystem root.
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Open the repository at `root`. Fails if the path is not a directory;
    /// whether it is actually a git repository is discovered on first use.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::Backend(format!(
                "repository root is not a directory: {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run `git` with the given arguments and return raw stdout bytes.
    pub fn run_raw(&self, args: &[&str]) -> Result<Vec<u8>, StoreError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| StoreError::Backend(format!("failed to spawn git: {}", e)))?;

        if !output.status.success() {
            return Err(StoreError::Backend(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(output.stdout)
    }

    /// Run `git` and return stdout as text. For line-oriented commands
    /// (`ls-tree`, `commit`) whose output git emits as UTF-8.
    pub fn run(&self, args: &[&str]) -> Result<String, StoreError> {
        Ok(String::from_utf8_lossy(&self.run_raw(args)?).to_string())
    }

    /// Raw `ls-tree HEAD {scope}` output. An empty scope lists the
    /// repository root at head.
    pub fn ls_tree_head(&self, scope: &str) -> Result<String, StoreError> {
        if scope.is_empty() {
            self.run(&["ls-tree", "HEAD"])
        } else {
            self.run(&["ls-tree", "HEAD", scope])
        }
    }

    /// Content of `path` as committed on `branch` (`git show branch:path`).
    /// Raw bytes out; no decoding, so binary blobs pass through untouched.
    pub fn show(&self, branch: &str, path: &str) -> Result<Vec<u8>, StoreError> {
        self.run_raw(&["show", &format!("{}:{}", branch, path)])
    }

    /// Persist the current working tree as a new version: stage everything
    /// under the root and commit it. Called after every mutation, never
    /// before a read.
    pub fn commit_working_tree(&self, message: &str) -> Result<String, StoreError> {
        self.run(&["add", "-A"])?;
        self.run(&["commit", "-m", message])
    }
}
