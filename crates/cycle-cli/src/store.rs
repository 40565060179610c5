//! Entry store snapshot loading.
//!
//! The snapshot is a JSON object mapping user IDs to arrays of entries, as
//! exported by the persistence layer. Individual entries are decoded
//! leniently; only a structurally broken file is an error.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use cycle_core::{RawCycleEntry, UserId};

/// All users' raw entries.
#[derive(Debug, Default)]
pub struct EntryStore {
    users: HashMap<UserId, Vec<RawCycleEntry>>,
}

impl EntryStore {
    /// Reads a snapshot file.
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read entry store {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("failed to parse entry store {}", path.display()))
    }

    /// Parses a snapshot from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        let users: HashMap<UserId, Vec<RawCycleEntry>> = serde_json::from_str(content)?;
        tracing::debug!(users = users.len(), "loaded entry store");
        Ok(Self { users })
    }

    /// A user's entries; unknown users have none.
    pub fn entries(&self, user: &UserId) -> &[RawCycleEntry] {
        self.users.get(user).map_or_else(
            || {
                tracing::warn!(%user, "user not found in entry store");
                &[][..]
            },
            Vec::as_slice,
        )
    }

    /// The underlying mapping.
    pub const fn users(&self) -> &HashMap<UserId, Vec<RawCycleEntry>> {
        &self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "alice": [
            {"id": "a1", "startDate": "2024-01-01", "endDate": "2024-01-05"},
            {"id": "a2", "startDate": "not a date"}
        ],
        "bob": []
    }"#;

    #[test]
    fn parses_users_and_keeps_malformed_entries_raw() {
        let store = EntryStore::from_json(SNAPSHOT).unwrap();
        assert_eq!(store.users().len(), 2);
        let alice = store.entries(&UserId::new("alice").unwrap());
        assert_eq!(alice.len(), 2);
        assert_eq!(alice[1].start_date.as_deref(), Some("not a date"));
    }

    #[test]
    fn unknown_user_has_no_entries() {
        let store = EntryStore::from_json(SNAPSHOT).unwrap();
        assert!(store.entries(&UserId::new("carol").unwrap()).is_empty());
    }

    #[test]
    fn rejects_non_object_snapshot() {
        assert!(EntryStore::from_json("[1, 2, 3]").is_err());
        assert!(EntryStore::from_json(r#"{"": []}"#).is_err());
    }

    #[test]
    fn open_reports_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let err = EntryStore::open(&temp.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read entry store"));
    }
}
