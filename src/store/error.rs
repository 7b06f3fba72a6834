//! Store and snapshot error types.

use crate::core::EntityId;
use thiserror::Error;

/// Errors a persistence adapter may report.
///
/// A lost compare-and-swap race is NOT an error; adapters report it by
/// returning `Ok(false)`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The row no longer exists
    #[error("Entity {id} not found")]
    NotFound { id: EntityId },

    /// A row with this id is already stored
    #[error("Entity {id} already exists")]
    AlreadyExists { id: EntityId },

    /// The requested update does not advance the version by exactly one
    #[error("Update for entity {id} must advance version {expected} by exactly one, got {requested}")]
    NonSequentialVersion {
        id: EntityId,
        expected: u64,
        requested: u64,
    },

    /// The row's version counter cannot advance any further
    #[error("Entity {id} has exhausted its version counter")]
    VersionExhausted { id: EntityId },

    /// The backing store failed
    #[error("Store backend failure: {0}")]
    Backend(String),
}

/// Errors that can occur during snapshot operations
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot version is not supported by this version
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Snapshot data failed validation
    #[error("Snapshot validation failed: {0}")]
    ValidationFailed(String),
}
