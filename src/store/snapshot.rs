//! Snapshots of stored rows.
//!
//! A snapshot captures every `(id, state, version)` row of an in-memory store
//! so it can be written to disk and reloaded after a restart. JSON is provided
//! for inspection and bincode for compact storage.

use crate::core::{EntityId, State};
use crate::store::error::SnapshotError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// One persisted row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StoredRow<S: State> {
    pub id: EntityId,
    pub state: S,
    pub version: u64,
}

/// Serializable snapshot of a store's rows.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StoreSnapshot<S: State> {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: Uuid,

    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Rows ordered by id
    pub rows: Vec<StoredRow<S>>,
}

impl<S: State> StoreSnapshot<S> {
    pub fn new(rows: Vec<StoredRow<S>>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            rows,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reject snapshots from another format version or with duplicate ids.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        let mut seen = HashSet::new();
        for row in &self.rows {
            if !seen.insert(row.id) {
                return Err(SnapshotError::ValidationFailed(format!(
                    "duplicate row for entity {}",
                    row.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::ObjectState;
    use crate::store::{InMemoryStore, StateStore};

    fn populated_store() -> InMemoryStore<ObjectState> {
        let store = InMemoryStore::new();
        store.insert(1, ObjectState::Allocated).unwrap();
        store.insert(2, ObjectState::Ready).unwrap();
        store
    }

    #[test]
    fn json_snapshot_restores_rows() {
        let json = populated_store().snapshot().to_json().unwrap();

        let restored: InMemoryStore<ObjectState> =
            InMemoryStore::from_snapshot(StoreSnapshot::from_json(&json).unwrap());
        assert_eq!(restored.ids(), vec![EntityId(1), EntityId(2)]);
        assert_eq!(restored.load(EntityId(2)).unwrap().state, ObjectState::Ready);
    }

    #[test]
    fn binary_snapshot_restores_rows() {
        let snapshot = populated_store().snapshot();
        let bytes = snapshot.to_binary().unwrap();

        let decoded = StoreSnapshot::<ObjectState>::from_binary(&bytes).unwrap();
        assert_eq!(decoded.id, snapshot.id);
        assert_eq!(decoded.rows, snapshot.rows);
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let mut snapshot = populated_store().snapshot();
        snapshot.version = SNAPSHOT_VERSION + 1;
        let json = snapshot.to_json().unwrap();

        assert!(matches!(
            StoreSnapshot::<ObjectState>::from_json(&json),
            Err(SnapshotError::UnsupportedVersion { found: 2, supported: 1 })
        ));
    }

    #[test]
    fn duplicate_rows_are_rejected() {
        let mut snapshot = populated_store().snapshot();
        snapshot.rows.push(snapshot.rows[0].clone());

        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotError::ValidationFailed(_))
        ));
    }

    #[test]
    fn garbage_input_fails_to_decode() {
        assert!(matches!(
            StoreSnapshot::<ObjectState>::from_json("not json"),
            Err(SnapshotError::DeserializationFailed(_))
        ));
    }
}
