//! Persistence adapters: optimistic-concurrency load and compare-and-swap.
//!
//! The store is the only serialization point between concurrent writers.
//! No lock is held across calls; each adapter method is a self-contained
//! atomic operation. Any transaction or lock an adapter needs is acquired
//! inside the call as a scoped guard and released on every exit path, so
//! there is no ambient transaction state for callers to manage.
//!
//! A SQL-backed adapter maps naturally onto this contract:
//!
//! ```text
//! load:             SELECT state, update_count FROM t WHERE id = ?
//! compare_and_swap: UPDATE t SET state = ?, update_count = ?
//!                   WHERE id = ? AND state = ? AND update_count = ?
//!                   -- true iff one row was affected
//! ```

pub mod error;
pub mod memory;
pub mod snapshot;

pub use error::{SnapshotError, StoreError};
pub use memory::InMemoryStore;
pub use snapshot::{StoreSnapshot, StoredRow, SNAPSHOT_VERSION};

use crate::core::{EntityId, State, Versioned};
use std::sync::Arc;

/// Optimistic-concurrency access to the `(state, version)` pair of a row.
pub trait StateStore<S: State>: Send + Sync {
    /// Read the current `(state, version)` of `id`.
    ///
    /// Fails with [`StoreError::NotFound`] if the row no longer exists.
    fn load(&self, id: EntityId) -> Result<Versioned<S>, StoreError>;

    /// Atomically replace `expected` with `update`.
    ///
    /// Returns `Ok(true)` if the stored pair equalled `expected` and now
    /// equals `update`, and `Ok(false)` if another writer got there first.
    /// For a given `(id, expected.version)` at most one call ever returns
    /// `true`. Callers always pass `update.version == expected.version + 1`.
    fn compare_and_swap(
        &self,
        id: EntityId,
        expected: &Versioned<S>,
        update: &Versioned<S>,
    ) -> Result<bool, StoreError>;
}

impl<S: State, T: StateStore<S> + ?Sized> StateStore<S> for Arc<T> {
    fn load(&self, id: EntityId) -> Result<Versioned<S>, StoreError> {
        (**self).load(id)
    }

    fn compare_and_swap(
        &self,
        id: EntityId,
        expected: &Versioned<S>,
        update: &Versioned<S>,
    ) -> Result<bool, StoreError> {
        (**self).compare_and_swap(id, expected, update)
    }
}

impl<S: State, T: StateStore<S> + ?Sized> StateStore<S> for &T {
    fn load(&self, id: EntityId) -> Result<Versioned<S>, StoreError> {
        (**self).load(id)
    }

    fn compare_and_swap(
        &self,
        id: EntityId,
        expected: &Versioned<S>,
        update: &Versioned<S>,
    ) -> Result<bool, StoreError> {
        (**self).compare_and_swap(id, expected, update)
    }
}
