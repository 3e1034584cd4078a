//! gitstore: a versioned JSON record store backed by a git repository.
//!
//! Records are plain files under a per-store subdirectory of one repository;
//! every write or delete commits the working tree, so the commit history is
//! the changelog and `ls-tree` at head is the index. Two on-disk layouts are
//! supported per store: flat `{id}.json` files, or BagIt-style bags nesting
//! the body at `{id}/data/{id}.json` for archival-grade records.
//!
//! # Model
//!
//! - Listings (`find_all`, identifier allocation) read the committed head.
//! - Single-record reads (`find`) read the live working tree.
//! - Mutations write through a filesystem adapter scoped to the store's
//!   directory, journal an event line, and end with `git add -A && git
//!   commit`.
//!
//! Single-writer deployment is assumed: nothing locks around allocation or
//! writes, and two overlapping saves can race on the same identifier.
//!
//! # Example
//!
//! ```no_run
//! use gitstore::core::config::StoreConfig;
//! use gitstore::core::store::{Layout, RecordPayload, Store};
//!
//! # fn main() -> Result<(), gitstore::core::error::StoreError> {
//! let config = StoreConfig::new("/var/data/repo");
//! let mut store = Store::new(config, "records", Layout::Flat)?;
//!
//! store.save(RecordPayload {
//!     id: None,
//!     content: serde_json::json!({"title": "first"}),
//! })?;
//! let record = store.find(store.last_inserted_id().unwrap())?;
//! println!("{}", record.file_content);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
