//! Builder for constructing state machine engines.

use crate::builder::error::BuildError;
use crate::core::{EntityKind, Event, State};
use crate::engine::{EngineConfig, StateMachine};
use crate::listener::ListenerRegistry;
use crate::store::StateStore;
use crate::table::TransitionTable;
use std::sync::Arc;

/// Builder for constructing engines with a fluent API.
///
/// # Example
///
/// ```rust
/// use lifecycle::builder::StateMachineBuilder;
/// use lifecycle::lifecycle::{object_lifecycle, ObjectState};
/// use lifecycle::store::InMemoryStore;
///
/// let engine = StateMachineBuilder::new()
///     .kind("template")
///     .table(object_lifecycle().unwrap())
///     .store(InMemoryStore::<ObjectState>::new())
///     .max_retries(5)
///     .build()
///     .unwrap();
///
/// assert_eq!(engine.config().max_retries, 5);
/// ```
pub struct StateMachineBuilder<S: State, E: Event, St: StateStore<S>> {
    kind: Option<EntityKind>,
    table: Option<Arc<TransitionTable<S, E>>>,
    listeners: Option<Arc<ListenerRegistry<S, E>>>,
    store: Option<St>,
    config: EngineConfig,
}

impl<S: State, E: Event, St: StateStore<S>> StateMachineBuilder<S, E, St> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            kind: None,
            table: None,
            listeners: None,
            store: None,
            config: EngineConfig::default(),
        }
    }

    /// Set the entity kind (required).
    pub fn kind(mut self, kind: impl Into<EntityKind>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the transition table (required). Accepts an owned table or one
    /// already shared with other engines.
    pub fn table(mut self, table: impl Into<Arc<TransitionTable<S, E>>>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Share a listener registry (optional). Without one the engine gets a
    /// fresh, empty registry.
    pub fn listeners(mut self, listeners: Arc<ListenerRegistry<S, E>>) -> Self {
        self.listeners = Some(listeners);
        self
    }

    /// Set the persistence adapter (required).
    pub fn store(mut self, store: St) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the retry budget for lost compare-and-swap races.
    pub fn max_retries(mut self, n: usize) -> Self {
        self.config.max_retries = n;
        self
    }

    /// Build the engine.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<StateMachine<S, E, St>, BuildError> {
        let kind = self.kind.ok_or(BuildError::MissingKind)?;
        let table = self.table.ok_or(BuildError::MissingTable)?;
        if table.is_empty() {
            return Err(BuildError::EmptyTable);
        }
        let store = self.store.ok_or(BuildError::MissingStore)?;
        let listeners = self.listeners.unwrap_or_default();

        Ok(StateMachine::new(kind, table, listeners, store).with_config(self.config))
    }
}

impl<S: State, E: Event, St: StateStore<S>> Default for StateMachineBuilder<S, E, St> {
    fn default() -> Self {
        Self::new()
    }
}
