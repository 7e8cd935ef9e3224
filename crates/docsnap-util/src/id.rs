//! Snapshot identifier generation.
//!
//! Snapshot ids follow the pattern `<local timestamp>_<ulid>`, e.g.
//! `2026-10-17_14-03-22_01jab3…`. The timestamp keeps ids readable in the
//! snapshot directory; the ULID suffix keeps ids unique when several
//! snapshots are taken within the same second.

use chrono::Local;
use ulid::Ulid;

/// Timestamp format used in the readable id prefix.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Identifier generation utilities.
pub struct SnapshotIdGen;

impl SnapshotIdGen {
    /// Generate a new snapshot id for the current instant.
    pub fn generate() -> String {
        format!(
            "{}_{}",
            Local::now().format(TIMESTAMP_FORMAT),
            Ulid::new().to_string().to_lowercase()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_shape() {
        let id = SnapshotIdGen::generate();
        // "YYYY-MM-DD_HH-MM-SS" (19) + "_" + ULID (26)
        assert_eq!(id.len(), 46);
        let (stamp, suffix) = id.rsplit_once('_').unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok());
        assert!(Ulid::from_string(&suffix.to_uppercase()).is_ok());
        assert_eq!(suffix, suffix.to_lowercase());
    }

    #[test]
    fn test_ids_unique_within_same_second() {
        let ids: HashSet<String> = (0..500).map(|_| SnapshotIdGen::generate()).collect();
        assert_eq!(ids.len(), 500);
    }
}
