//! In-memory reference adapter.
//!
//! Rows live in a mutex-guarded map. Every operation takes the guard for the
//! duration of the call only, which is what makes `compare_and_swap` atomic.

use crate::core::{EntityId, State, StatefulEntity, Versioned};
use crate::store::error::StoreError;
use crate::store::snapshot::{StoreSnapshot, StoredRow};
use crate::store::StateStore;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe in-memory [`StateStore`].
pub struct InMemoryStore<S: State> {
    rows: Mutex<BTreeMap<EntityId, Versioned<S>>>,
}

impl<S: State> Default for InMemoryStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> InMemoryStore<S> {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
        }
    }

    /// Rebuild a store from a snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot<S>) -> Self {
        let rows = snapshot
            .rows
            .into_iter()
            .map(|row| (row.id, Versioned::new(row.state, row.version)))
            .collect();
        Self {
            rows: Mutex::new(rows),
        }
    }

    // A panic in another writer cannot leave a row half-written: every
    // mutation is a single map insert or remove.
    fn rows(&self) -> MutexGuard<'_, BTreeMap<EntityId, Versioned<S>>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist a new entity in `initial` state at version 0.
    pub fn insert(&self, id: impl Into<EntityId>, initial: S) -> Result<StatefulEntity<S>, StoreError> {
        let id = id.into();
        let mut rows = self.rows();
        if rows.contains_key(&id) {
            return Err(StoreError::AlreadyExists { id });
        }
        rows.insert(id, Versioned::new(initial.clone(), 0));
        Ok(StatefulEntity::new(id, initial, 0))
    }

    /// Physically delete a row, returning its last persisted pair.
    pub fn remove(&self, id: EntityId) -> Result<Versioned<S>, StoreError> {
        self.rows().remove(&id).ok_or(StoreError::NotFound { id })
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Ids of all stored rows, ascending.
    pub fn ids(&self) -> Vec<EntityId> {
        self.rows().keys().copied().collect()
    }

    /// Capture every row in a consistent snapshot.
    pub fn snapshot(&self) -> StoreSnapshot<S> {
        let rows = self
            .rows()
            .iter()
            .map(|(id, row)| StoredRow {
                id: *id,
                state: row.state.clone(),
                version: row.version,
            })
            .collect();
        StoreSnapshot::new(rows)
    }
}

impl<S: State> StateStore<S> for InMemoryStore<S> {
    fn load(&self, id: EntityId) -> Result<Versioned<S>, StoreError> {
        self.rows().get(&id).cloned().ok_or(StoreError::NotFound { id })
    }

    fn compare_and_swap(
        &self,
        id: EntityId,
        expected: &Versioned<S>,
        update: &Versioned<S>,
    ) -> Result<bool, StoreError> {
        if expected.version.checked_add(1) != Some(update.version) {
            return Err(StoreError::NonSequentialVersion {
                id,
                expected: expected.version,
                requested: update.version,
            });
        }

        let mut rows = self.rows();
        let row = rows.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        if *row != *expected {
            return Ok(false);
        }
        *row = update.clone();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::ObjectState;

    #[test]
    fn insert_starts_at_version_zero() {
        let store = InMemoryStore::new();
        let entity = store.insert(1, ObjectState::Allocated).unwrap();

        assert_eq!(entity.version, 0);
        assert_eq!(store.load(EntityId(1)).unwrap(), Versioned::new(ObjectState::Allocated, 0));
    }

    #[test]
    fn insert_rejects_existing_id() {
        let store = InMemoryStore::new();
        store.insert(1, ObjectState::Allocated).unwrap();
        assert_eq!(
            store.insert(1, ObjectState::Ready),
            Err(StoreError::AlreadyExists { id: EntityId(1) })
        );
    }

    #[test]
    fn load_missing_row_is_not_found() {
        let store: InMemoryStore<ObjectState> = InMemoryStore::new();
        assert_eq!(
            store.load(EntityId(9)),
            Err(StoreError::NotFound { id: EntityId(9) })
        );
    }

    #[test]
    fn compare_and_swap_applies_when_expectations_match() {
        let store = InMemoryStore::new();
        store.insert(1, ObjectState::Allocated).unwrap();

        let expected = Versioned::new(ObjectState::Allocated, 0);
        let update = expected.successor(ObjectState::Creating).unwrap();

        assert_eq!(store.compare_and_swap(EntityId(1), &expected, &update), Ok(true));
        assert_eq!(store.load(EntityId(1)).unwrap(), update);
    }

    #[test]
    fn only_one_swap_per_version_succeeds() {
        let store = InMemoryStore::new();
        store.insert(1, ObjectState::Ready).unwrap();

        let expected = Versioned::new(ObjectState::Ready, 0);
        let update = expected.successor(ObjectState::Destroying).unwrap();

        assert_eq!(store.compare_and_swap(EntityId(1), &expected, &update), Ok(true));
        assert_eq!(store.compare_and_swap(EntityId(1), &expected, &update), Ok(false));
        assert_eq!(store.load(EntityId(1)).unwrap().version, 1);
    }

    #[test]
    fn state_mismatch_is_a_lost_race() {
        let store = InMemoryStore::new();
        store.insert(1, ObjectState::Ready).unwrap();

        let expected = Versioned::new(ObjectState::Allocated, 0);
        let update = expected.successor(ObjectState::Creating).unwrap();

        assert_eq!(store.compare_and_swap(EntityId(1), &expected, &update), Ok(false));
        assert_eq!(store.load(EntityId(1)).unwrap(), Versioned::new(ObjectState::Ready, 0));
    }

    #[test]
    fn version_must_advance_by_one() {
        let store = InMemoryStore::new();
        store.insert(1, ObjectState::Ready).unwrap();

        let expected = Versioned::new(ObjectState::Ready, 0);
        let update = Versioned::new(ObjectState::Destroying, 5);

        assert!(matches!(
            store.compare_and_swap(EntityId(1), &expected, &update),
            Err(StoreError::NonSequentialVersion { requested: 5, .. })
        ));
    }

    #[test]
    fn wrapping_version_is_rejected() {
        let store = InMemoryStore::new();
        store.insert(1, ObjectState::Ready).unwrap();

        let expected = Versioned::new(ObjectState::Ready, u64::MAX);
        let update = Versioned::new(ObjectState::Destroying, 0);

        let err = store
            .compare_and_swap(EntityId(1), &expected, &update)
            .unwrap_err();
        assert!(matches!(err, StoreError::NonSequentialVersion { requested: 0, .. }));
        assert!(err.to_string().contains(&u64::MAX.to_string()));
    }

    #[test]
    fn swap_on_removed_row_is_not_found() {
        let store = InMemoryStore::new();
        store.insert(1, ObjectState::Ready).unwrap();
        store.remove(EntityId(1)).unwrap();

        let expected = Versioned::new(ObjectState::Ready, 0);
        let update = expected.successor(ObjectState::Destroying).unwrap();

        assert_eq!(
            store.compare_and_swap(EntityId(1), &expected, &update),
            Err(StoreError::NotFound { id: EntityId(1) })
        );
        assert!(store.is_empty());
    }
}
