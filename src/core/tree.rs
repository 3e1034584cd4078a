//! Parser for `git ls-tree` output.
//!
//! Turns the line-oriented listing into structured entries. When the listing
//! was scoped to a store's own database directory, every path is either a
//! single numeric segment (a bagged record's directory) or `{id}.json`, and
//! the numeric identifier is projected out of the path.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9]").unwrap());

/// One parsed line of a tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    /// Raw mode bits, e.g. `100644`.
    pub permissions: String,
    /// Object type: `blob` or `tree`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Content hash of the object.
    pub revision_hash: String,
    /// Path relative to the repository root.
    pub address: String,
    /// Digits-only projection of the path; present only for listings scoped
    /// to a database directory.
    pub id: Option<String>,
}

/// Parse raw `ls-tree` output into entries, preserving input order.
///
/// Blank lines are discarded. Fields are whitespace-delimited: permissions,
/// type, hash, path. Paths containing spaces are not handled. Non-blank
/// lines with fewer than four fields are skipped rather than failing the
/// listing; `ls-tree` never emits them, so the guard only matters for
/// hand-fed input. With `is_db` set, `id` is the path stripped of all
/// non-digit characters; listings with mixed non-record content would
/// corrupt that field silently, so scoping is the caller's responsibility.
pub fn parse_ls_tree(raw: &str, is_db: bool) -> Vec<TreeEntry> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                return None;
            }
            let address = fields[3].to_string();
            let id = if is_db {
                Some(NON_DIGITS.replace_all(&address, "").into_owned())
            } else {
                None
            };
            Some(TreeEntry {
                permissions: fields[0].to_string(),
                kind: fields[1].to_string(),
                revision_hash: fields[2].to_string(),
                address,
                id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_db_scoped_listing_in_order() {
        let raw = "100644 blob abc123\t5.json\n100644 blob def456\t6.json\n";
        let entries = parse_ls_tree(raw, true);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id.as_deref(), Some("5"));
        assert_eq!(entries[1].id.as_deref(), Some("6"));
        assert_eq!(entries[0].permissions, "100644");
        assert_eq!(entries[0].kind, "blob");
        assert_eq!(entries[0].revision_hash, "abc123");
        assert_eq!(entries[0].address, "5.json");
    }

    #[test]
    fn bagged_record_surfaces_as_tree_entry() {
        let raw = "040000 tree 9f3a00\trecords/12\n";
        let entries = parse_ls_tree(raw, true);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, "tree");
        assert_eq!(entries[0].id.as_deref(), Some("12"));
    }

    #[test]
    fn unscoped_listing_has_no_id() {
        let raw = "100644 blob abc123\tREADME.md\n040000 tree def456\tsrc\n";
        let entries = parse_ls_tree(raw, false);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.id.is_none()));
        assert_eq!(entries[1].address, "src");
    }

    #[test]
    fn blank_lines_and_crlf_are_discarded() {
        let raw = "100644 blob abc123\t1.json\r\n\r\n\n100644 blob def456\t2.json\n\n";
        let entries = parse_ls_tree(raw, true);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].address, "2.json");
    }

    #[test]
    fn short_lines_are_skipped() {
        let raw = "100644 blob\n100644 blob abc123\t3.json\n";
        let entries = parse_ls_tree(raw, true);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].address, "3.json");
    }

    #[test]
    fn empty_input_yields_no_entries() {
        assert!(parse_ls_tree("", true).is_empty());
        assert!(parse_ls_tree("\n\n", false).is_empty());
    }
}
