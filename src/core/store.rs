//! Record store bound to a git repository.
//!
//! A `Store` scopes one record type to a subdirectory (its "database") of a
//! configured repository root. Listings are read from the committed head via
//! `ls-tree`; single-record reads go to the live working tree (source
//! behavior, kept as-is). Every mutation ends by committing the working tree
//! as a new version.
//!
//! Identifier allocation is count-based: `next_id` returns the number of
//! entries currently listed at head plus one. It does not look at the
//! largest existing identifier, so deleting the highest-numbered record can
//! make the next insert collide with a survivor. Kept deliberately to match
//! the system this store replaces.

use crate::core::bag;
use crate::core::config::StoreConfig;
use crate::core::error::StoreError;
use crate::core::fs_adapter::ScopedDir;
use crate::core::journal;
use crate::core::repo::{GitRepo, DEFAULT_BRANCH};
use crate::core::tree::{parse_ls_tree, TreeEntry};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::PathBuf;

/// On-disk layout for every record in a store, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `{database}/{id}.json`
    Flat,
    /// `{database}/{id}/data/{id}.json` (BagIt packaging)
    Bagged,
}

/// A record loaded by [`Store::find`].
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub id: u64,
    /// Decoded JSON body; arbitrary keys pass through untouched.
    pub file_content: JsonValue,
}

/// One listing entry with its content eagerly loaded, as returned by
/// [`Store::find_all`].
#[derive(Debug, Clone, Serialize)]
pub struct LoadedEntry {
    #[serde(flatten)]
    pub entry: TreeEntry,
    pub file_content: JsonValue,
}

/// Save input: `id: None` inserts, `id: Some` updates.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPayload {
    pub id: Option<u64>,
    pub content: JsonValue,
}

pub struct Store {
    config: StoreConfig,
    database: String,
    layout: Layout,
    repo: GitRepo,
    last_inserted_id: Option<u64>,
}

impl Store {
    /// Bind a store to `database` under the configured repository root.
    pub fn new(config: StoreConfig, database: &str, layout: Layout) -> Result<Self, StoreError> {
        let repo = GitRepo::open(&config.database_address)?;
        Ok(Self {
            config,
            database: database.to_string(),
            layout,
            repo,
            last_inserted_id: None,
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Identifier assigned by the most recent insert on this handle.
    pub fn last_inserted_id(&self) -> Option<u64> {
        self.last_inserted_id
    }

    /// Record location relative to the database directory, without the
    /// `.json` extension. Pure: no I/O.
    pub fn locate(&self, id: u64) -> PathBuf {
        match self.layout {
            Layout::Flat => PathBuf::from(id.to_string()),
            Layout::Bagged => PathBuf::from(id.to_string())
                .join("data")
                .join(id.to_string()),
        }
    }

    fn record_file(&self, id: u64) -> PathBuf {
        let mut path = self.locate(id);
        path.set_extension("json");
        path
    }

    fn database_dir(&self) -> PathBuf {
        self.config.database_address.join(&self.database)
    }

    /// List entries at head. `scope` is a path prefix ending in `/`; when it
    /// is non-empty the listing is treated as database-scoped and numeric
    /// identifiers are projected out of the paths.
    pub fn ls_tree_head(&self, scope: &str) -> Result<Vec<TreeEntry>, StoreError> {
        let raw = self.repo.ls_tree_head(scope)?;
        Ok(parse_ls_tree(&raw, !scope.is_empty()))
    }

    fn db_scope(&self) -> String {
        format!("{}/", self.database)
    }

    /// Next free identifier: count of entries listed at head, plus one.
    pub fn next_id(&self) -> Result<u64, StoreError> {
        let entries = self.ls_tree_head(&self.db_scope())?;
        Ok(entries.len() as u64 + 1)
    }

    /// Load one record from the working tree.
    pub fn find(&self, id: u64) -> Result<Record, StoreError> {
        let path = self.database_dir().join(self.record_file(id));
        if !path.exists() {
            return Err(StoreError::NotFound(format!(
                "{}/{}",
                self.database,
                self.record_file(id).display()
            )));
        }
        let raw = fs::read_to_string(&path)?;
        let file_content: JsonValue = serde_json::from_str(&raw)?;
        Ok(Record { id, file_content })
    }

    /// List every record at head and eagerly load each entry's content.
    ///
    /// All-or-nothing: the first unreadable or malformed entry fails the
    /// whole call.
    pub fn find_all(&self) -> Result<Vec<LoadedEntry>, StoreError> {
        let entries = self.ls_tree_head(&self.db_scope())?;
        let mut loaded = Vec::with_capacity(entries.len());
        for entry in entries {
            let file_content = self.load_entry_content(&entry)?;
            loaded.push(LoadedEntry {
                entry,
                file_content,
            });
        }
        Ok(loaded)
    }

    fn load_entry_content(&self, entry: &TreeEntry) -> Result<JsonValue, StoreError> {
        let location = match self.layout {
            Layout::Bagged => {
                // A bagged record lists as a bare numeric directory; its
                // body sits one level down at {id}/data/{id}.json.
                let id = entry.id.clone().unwrap_or_default();
                format!("{}/data/{}.json", entry.address, id)
            }
            Layout::Flat => entry.address.clone(),
        };
        let raw = fs::read_to_string(self.config.database_address.join(&location))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Insert or update a record, then commit the working tree.
    ///
    /// Returns the pretty-printed JSON that was written, so callers can echo
    /// the stored payload directly.
    pub fn save(&mut self, payload: RecordPayload) -> Result<String, StoreError> {
        let adapter = ScopedDir::new(self.database_dir());
        let content = serde_json::to_string_pretty(&payload.content)?;

        let (op, id) = match payload.id {
            None => {
                let id = self.next_id()?;
                adapter.write(&PathBuf::from(format!("{}.json", id)), &content)?;
                if self.layout == Layout::Bagged {
                    bag::create_bag_for_record(adapter.root(), id)?;
                }
                self.last_inserted_id = Some(id);
                ("save.insert", id)
            }
            Some(id) => {
                adapter.update(&self.record_file(id), &content)?;
                ("save.update", id)
            }
        };

        journal::log_event(
            self.repo.root(),
            journal::mutation_event(op, &self.database, id),
        )?;
        self.repo
            .commit_working_tree(&format!("gitstore: save {}/{}", self.database, id))?;

        Ok(content)
    }

    /// Delete `{id}.json` from the database directory, then commit.
    ///
    /// There is no existence check before the adapter call; the adapter
    /// decides how a missing file fails.
    pub fn delete(&mut self, id: u64) -> Result<(), StoreError> {
        let adapter = ScopedDir::new(self.database_dir());
        adapter.delete(&PathBuf::from(format!("{}.json", id)))?;

        journal::log_event(
            self.repo.root(),
            journal::mutation_event("delete", &self.database, id),
        )?;
        self.repo
            .commit_working_tree(&format!("gitstore: delete {}/{}", self.database, id))?;

        Ok(())
    }

    /// Raw content of `path` as committed on `branch` (default `master`).
    /// Bytes out, undecoded; binary blobs pass through untouched.
    pub fn show_file(&self, path: &str, branch: Option<&str>) -> Result<Vec<u8>, StoreError> {
        self.repo.show(branch.unwrap_or(DEFAULT_BRANCH), path)
    }
}
