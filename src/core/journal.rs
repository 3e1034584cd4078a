//! Append-only mutation journal.
//!
//! One JSON line per write or delete, appended to `store.events.jsonl` at
//! the repository root before the versioning step, so the journal rides the
//! same commit as the mutation it records. Best-effort observability: a
//! journal write failure fails the operation like any other I/O error, but
//! nothing ever reads the journal back on the hot path.

use crate::core::error::StoreError;
use serde_json::Value as JsonValue;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

pub const JOURNAL_FILE: &str = "store.events.jsonl";

/// Unix-epoch seconds with `Z` suffix (e.g. `1771220592Z`).
pub fn now_epoch_z() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{}Z", secs)
}

/// Append one event line under the repository root.
pub fn log_event(repo_root: &Path, event: JsonValue) -> Result<(), StoreError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(repo_root.join(JOURNAL_FILE))?;
    writeln!(file, "{}", event)?;
    Ok(())
}

/// Standard mutation event shape. Status is always `ok`: a mutation that
/// fails in the adapter or allocator never reaches the journal.
pub fn mutation_event(op: &str, database: &str, id: u64) -> JsonValue {
    serde_json::json!({
        "ts": now_epoch_z(),
        "op": op,
        "database": database,
        "id": id,
        "status": "ok",
    })
}
