//! Workforce registry: which reviewers take part in batch assignment.
//!
//! The registry is one small document shared by every reviewer, persisted
//! under [`KEY_REVIEW_ASSIGNMENT_ENABLED`](crate::settings::KEY_REVIEW_ASSIGNMENT_ENABLED).
//! The `db` crate reads and writes it under a row lock; this module only
//! models the document.
//!
//! Two encodings exist:
//!
//! ```text
//! current: [{"id": 7, "enabled": true}, {"id": 9, "enabled": false}]
//! legacy:  [7, 9]            (every listed reviewer enabled)
//! ```
//!
//! The legacy shape is read for compatibility only. It is never written, so
//! the first save after reading it migrates the document.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::default_assignment_enabled;
use crate::types::DbId;

/// One reviewer's participation flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkforceEntry {
    #[serde(rename = "id")]
    pub reviewer_id: DbId,
    pub enabled: bool,
}

/// Which stored shape a roster was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterEncoding {
    Entries,
    Legacy,
}

/// Stored shapes, tried in declaration order.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRoster {
    Entries(Vec<WorkforceEntry>),
    Legacy(Vec<DbId>),
}

/// The decoded registry document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkforceRoster {
    entries: Vec<WorkforceEntry>,
}

impl WorkforceRoster {
    /// Decode a stored document, trying the entry shape before the legacy one.
    ///
    /// Anything matching neither shape is an error rather than an empty
    /// roster: silently dropping it would re-enable every reviewer on the
    /// next backfill.
    pub fn decode(value: &serde_json::Value) -> Result<(Self, RosterEncoding), CoreError> {
        let stored: StoredRoster = serde_json::from_value(value.clone()).map_err(|_| {
            CoreError::Internal(format!(
                "workforce registry document has an unrecognised shape: {value}"
            ))
        })?;

        Ok(match stored {
            StoredRoster::Entries(entries) => (Self::from_entries(entries), RosterEncoding::Entries),
            StoredRoster::Legacy(ids) => {
                let entries = ids.into_iter().map(|reviewer_id| WorkforceEntry {
                    reviewer_id,
                    enabled: true,
                });
                (Self::from_entries(entries), RosterEncoding::Legacy)
            }
        })
    }

    /// Build a roster, keeping the first entry for any repeated reviewer.
    pub fn from_entries(entries: impl IntoIterator<Item = WorkforceEntry>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|e| seen.insert(e.reviewer_id))
            .collect();
        Self { entries }
    }

    /// Encode in the current entry shape.
    pub fn encode(&self) -> serde_json::Value {
        serde_json::to_value(&self.entries).unwrap_or_else(|_| serde_json::Value::Array(Vec::new()))
    }

    pub fn entries(&self) -> &[WorkforceEntry] {
        &self.entries
    }

    /// Give every candidate reviewer an entry, defaulting by role.
    ///
    /// Existing entries are left untouched. Returns whether anything was added.
    pub fn sync<'a>(&mut self, candidates: impl IntoIterator<Item = (DbId, &'a str)>) -> bool {
        let mut changed = false;
        for (reviewer_id, role) in candidates {
            if self.position(reviewer_id).is_none() {
                self.entries.push(WorkforceEntry {
                    reviewer_id,
                    enabled: default_assignment_enabled(role),
                });
                changed = true;
            }
        }
        changed
    }

    /// Absent reviewers are not enabled.
    pub fn is_enabled(&self, reviewer_id: DbId) -> bool {
        self.position(reviewer_id)
            .map(|i| self.entries[i].enabled)
            .unwrap_or(false)
    }

    /// The flag a reviewer would have after the next sync: their entry if
    /// present, otherwise the default for `role`.
    pub fn effective_enabled(&self, reviewer_id: DbId, role: &str) -> bool {
        self.position(reviewer_id)
            .map(|i| self.entries[i].enabled)
            .unwrap_or_else(|| default_assignment_enabled(role))
    }

    /// Upsert a reviewer's flag. Returns whether the document changed.
    pub fn set_enabled(&mut self, reviewer_id: DbId, enabled: bool) -> bool {
        match self.position(reviewer_id) {
            Some(i) if self.entries[i].enabled == enabled => false,
            Some(i) => {
                self.entries[i].enabled = enabled;
                true
            }
            None => {
                self.entries.push(WorkforceEntry {
                    reviewer_id,
                    enabled,
                });
                true
            }
        }
    }

    pub fn enabled_ids(&self) -> Vec<DbId> {
        self.ids_where(true)
    }

    pub fn disabled_ids(&self) -> Vec<DbId> {
        self.ids_where(false)
    }

    fn ids_where(&self, enabled: bool) -> Vec<DbId> {
        self.entries
            .iter()
            .filter(|e| e.enabled == enabled)
            .map(|e| e.reviewer_id)
            .collect()
    }

    fn position(&self, reviewer_id: DbId) -> Option<usize> {
        self.entries.iter().position(|e| e.reviewer_id == reviewer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{ROLE_ADMIN, ROLE_SUPER_ADMIN};
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn decodes_entry_shape() {
        let (roster, encoding) =
            WorkforceRoster::decode(&json!([{"id": 1, "enabled": true}, {"id": 2, "enabled": false}]))
                .unwrap();
        assert_eq!(encoding, RosterEncoding::Entries);
        assert!(roster.is_enabled(1));
        assert!(!roster.is_enabled(2));
    }

    #[test]
    fn decodes_legacy_shape_as_all_enabled() {
        let (roster, encoding) = WorkforceRoster::decode(&json!([4, 5])).unwrap();
        assert_eq!(encoding, RosterEncoding::Legacy);
        assert_eq!(roster.enabled_ids(), vec![4, 5]);
        assert!(roster.disabled_ids().is_empty());
    }

    #[test]
    fn empty_array_is_current_shape() {
        let (roster, encoding) = WorkforceRoster::decode(&json!([])).unwrap();
        assert_eq!(encoding, RosterEncoding::Entries);
        assert!(roster.entries().is_empty());
    }

    #[test]
    fn unrecognised_shape_is_an_error() {
        assert_matches!(
            WorkforceRoster::decode(&json!({"ids": [1]})),
            Err(CoreError::Internal(_))
        );
        assert_matches!(
            WorkforceRoster::decode(&json!(["not-a-number"])),
            Err(CoreError::Internal(_))
        );
    }

    #[test]
    fn encode_always_writes_entry_shape() {
        let (roster, _) = WorkforceRoster::decode(&json!([3])).unwrap();
        assert_eq!(roster.encode(), json!([{"id": 3, "enabled": true}]));
    }

    #[test]
    fn repeated_reviewers_keep_first_entry() {
        let roster = WorkforceRoster::from_entries([
            WorkforceEntry { reviewer_id: 1, enabled: false },
            WorkforceEntry { reviewer_id: 1, enabled: true },
        ]);
        assert_eq!(roster.entries().len(), 1);
        assert!(!roster.is_enabled(1));
    }

    #[test]
    fn sync_backfills_with_role_defaults() {
        let mut roster = WorkforceRoster::default();
        let changed = roster.sync([(1, ROLE_ADMIN), (2, ROLE_SUPER_ADMIN)]);
        assert!(changed);
        assert!(roster.is_enabled(1));
        assert!(!roster.is_enabled(2));
    }

    #[test]
    fn sync_leaves_existing_entries_alone() {
        let mut roster = WorkforceRoster::default();
        roster.set_enabled(1, false);
        let changed = roster.sync([(1, ROLE_ADMIN)]);
        assert!(!changed);
        assert!(!roster.is_enabled(1));
    }

    #[test]
    fn absent_reviewer_is_not_enabled() {
        assert!(!WorkforceRoster::default().is_enabled(42));
    }

    #[test]
    fn effective_flag_falls_back_to_role_default() {
        let mut roster = WorkforceRoster::default();
        roster.set_enabled(1, false);
        assert!(!roster.effective_enabled(1, ROLE_ADMIN));
        assert!(roster.effective_enabled(2, ROLE_ADMIN));
        assert!(!roster.effective_enabled(3, ROLE_SUPER_ADMIN));
    }

    #[test]
    fn set_enabled_is_idempotent() {
        let mut roster = WorkforceRoster::default();
        assert!(roster.set_enabled(7, true));
        assert!(!roster.set_enabled(7, true));
        assert!(roster.set_enabled(7, false));
        assert_eq!(roster.disabled_ids(), vec![7]);
    }
}
