//! BagIt-style packaging for archival-grade records.
//!
//! The writer drops a freshly inserted record at `{id}.json`; for bagged
//! stores this module restructures it into a minimal bag:
//!
//! ```text
//! {id}/
//!   bagit.txt
//!   manifest-sha256.txt
//!   data/
//!     {id}.json
//! ```
//!
//! Invoked only on insert. Updates write through the bag path directly; the
//! manifest is not recomputed.

use crate::core::error::StoreError;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

const BAGIT_DECLARATION: &str = "BagIt-Version: 0.97\nTag-File-Character-Encoding: UTF-8\n";

/// Materialize the bag layout around a just-written `{id}.json` inside
/// `store_dir`.
pub fn create_bag_for_record(store_dir: &Path, id: u64) -> Result<(), StoreError> {
    let flat = store_dir.join(format!("{}.json", id));
    if !flat.exists() {
        return Err(StoreError::Adapter(format!(
            "cannot bag record {}: {} is missing",
            id,
            flat.display()
        )));
    }

    let bag_dir = store_dir.join(id.to_string());
    let data_dir = bag_dir.join("data");
    fs::create_dir_all(&data_dir)?;

    let payload_name = format!("{}.json", id);
    let payload_path = data_dir.join(&payload_name);
    fs::rename(&flat, &payload_path)?;

    let payload = fs::read(&payload_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&payload);
    let digest = format!("{:x}", hasher.finalize());

    fs::write(bag_dir.join("bagit.txt"), BAGIT_DECLARATION)?;
    fs::write(
        bag_dir.join("manifest-sha256.txt"),
        format!("{}  data/{}\n", digest, payload_name),
    )?;

    Ok(())
}
