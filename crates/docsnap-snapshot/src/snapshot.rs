//! Snapshot data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Record of one captured document version.
///
/// Created once when the snapshot is taken and never modified. Records are
/// compared by value, so deleting a snapshot removes exactly the entry equal
/// to the one passed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Unique id: readable timestamp plus a random suffix.
    pub snapshot_id: String,

    /// Name grouping snapshots of one document (its file name).
    pub document_name: String,

    /// Absolute path of the live document at capture time.
    pub source_path: PathBuf,

    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Free-form remark.
    #[serde(default)]
    pub remark: String,

    /// Byte-for-byte copy of the source, written once.
    pub content_path: PathBuf,

    /// Hex SHA-256 of the captured bytes.
    #[serde(default)]
    pub content_hash: String,
}

impl SnapshotMetadata {
    /// Whether `bytes` hash to the recorded content hash.
    ///
    /// Records without a hash always match.
    pub fn matches_content(&self, bytes: &[u8]) -> bool {
        self.content_hash.is_empty() || self.content_hash == content_hash(bytes)
    }
}

/// Hex SHA-256 of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

pub(crate) fn extension_with_dot(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// Sort newest first; ids break timestamp ties.
pub(crate) fn sort_newest_first(snapshots: &mut [SnapshotMetadata]) {
    snapshots.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.snapshot_id.cmp(&a.snapshot_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn meta(id: &str, secs: i64) -> SnapshotMetadata {
        SnapshotMetadata {
            snapshot_id: id.to_string(),
            document_name: "report.txt".to_string(),
            source_path: PathBuf::from("/docs/report.txt"),
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            remark: String::new(),
            content_path: PathBuf::from(format!("/data/snapshots/report.txt/{id}.txt")),
            content_hash: content_hash(b"hello"),
        }
    }

    #[test]
    fn test_content_hash() {
        assert_eq!(
            content_hash(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        let m = meta("a", 0);
        assert!(m.matches_content(b"hello"));
        assert!(!m.matches_content(b"hello!"));
    }

    #[test]
    fn test_extension_with_dot() {
        assert_eq!(extension_with_dot(&meta("a", 0).content_path), ".txt");
        assert_eq!(extension_with_dot(Path::new("/data/snapshots/Makefile/a")), "");
    }

    #[test]
    fn test_sort_newest_first() {
        let mut list = vec![meta("a", 10), meta("b", 30), meta("c", 20), meta("d", 30)];
        sort_newest_first(&mut list);
        let ids: Vec<&str> = list.iter().map(|m| m.snapshot_id.as_str()).collect();
        assert_eq!(ids, vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_serde_roundtrip_keeps_equality() {
        let m = meta("a", 42);
        let json = serde_json::to_string(&m).unwrap();
        let back: SnapshotMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
