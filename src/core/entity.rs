//! Entity identity and versioned state.

use super::state::State;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a managed row.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Name of an entity kind ("template", "volume", "network", ...).
///
/// Listeners are registered per kind and each engine drives exactly one kind.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKind(String);

impl EntityKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityKind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EntityKind {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// The persisted `(state, version)` pair of a row.
///
/// `version` increases by exactly one on every committed transition and is
/// what compare-and-swap compares against.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Versioned<S: State> {
    pub state: S,
    pub version: u64,
}

impl<S: State> Versioned<S> {
    pub fn new(state: S, version: u64) -> Self {
        Self { state, version }
    }

    /// The pair a successful transition to `state` would persist.
    ///
    /// `None` once the version counter is exhausted.
    pub fn successor(&self, state: S) -> Option<Self> {
        let version = self.version.checked_add(1)?;
        Some(Self { state, version })
    }
}

/// A caller's in-memory view of a managed row.
///
/// The store owns the authoritative copy. The engine refreshes this view
/// whenever it learns the row changed, and never keeps it across calls.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StatefulEntity<S: State> {
    pub id: EntityId,
    pub state: S,
    pub version: u64,
}

impl<S: State> StatefulEntity<S> {
    pub fn new(id: impl Into<EntityId>, state: S, version: u64) -> Self {
        Self {
            id: id.into(),
            state,
            version,
        }
    }

    /// Build a view from a freshly loaded row.
    pub fn from_versioned(id: EntityId, row: Versioned<S>) -> Self {
        Self {
            id,
            state: row.state,
            version: row.version,
        }
    }

    pub fn versioned(&self) -> Versioned<S> {
        Versioned::new(self.state.clone(), self.version)
    }

    /// Overwrite the view with a freshly loaded row.
    pub fn refresh(&mut self, row: Versioned<S>) {
        self.state = row.state;
        self.version = row.version;
    }
}
