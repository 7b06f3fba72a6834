//! State machine engine driving one entity kind.

use crate::builder::StateMachineBuilder;
use crate::context::TransitionContext;
use crate::core::{EntityId, EntityKind, Event, State, StatefulEntity};
use crate::engine::config::EngineConfig;
use crate::engine::error::TransitionError;
use crate::listener::{ListenerRegistry, Registration, TransitionInfo};
use crate::store::{StateStore, StoreError};
use crate::table::TransitionTable;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Validates, persists and announces transitions of one entity kind.
///
/// The engine holds no per-entity state. It is `Send + Sync` and is meant to
/// be shared by every thread that changes entities of its kind.
pub struct StateMachine<S: State, E: Event, St: StateStore<S>> {
    kind: EntityKind,
    table: Arc<TransitionTable<S, E>>,
    listeners: Arc<ListenerRegistry<S, E>>,
    store: St,
    config: EngineConfig,
}

impl<S: State, E: Event, St: StateStore<S>> StateMachine<S, E, St> {
    /// Create an engine with the default configuration.
    pub fn new(
        kind: impl Into<EntityKind>,
        table: Arc<TransitionTable<S, E>>,
        listeners: Arc<ListenerRegistry<S, E>>,
        store: St,
    ) -> Self {
        Self {
            kind: kind.into(),
            table,
            listeners,
            store,
            config: EngineConfig::default(),
        }
    }

    pub fn builder() -> StateMachineBuilder<S, E, St> {
        StateMachineBuilder::new()
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn table(&self) -> &TransitionTable<S, E> {
        &self.table
    }

    pub fn listeners(&self) -> &ListenerRegistry<S, E> {
        &self.listeners
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load the current persisted view of `id`.
    ///
    /// Callers whose `transition` call timed out use this to learn the
    /// outcome.
    pub fn current(&self, id: EntityId) -> Result<StatefulEntity<S>, TransitionError> {
        let row = self.store.load(id)?;
        Ok(StatefulEntity::from_versioned(id, row))
    }

    /// Apply `event` to `entity` and return the new state.
    ///
    /// 1. Resolve the next state from the table. Illegal events fail before
    ///    any store call.
    /// 2. Run pre-transition listeners; any veto aborts without persisting.
    /// 3. Compare-and-swap `(state, version)` to `(next, version + 1)`.
    ///    On success `entity` is updated and post-transition listeners run.
    ///    On a lost race `entity` is reloaded and the call restarts at step 1
    ///    against the fresh state, at most `max_retries` times.
    ///
    /// Whatever the outcome, `entity` reflects the last state the engine saw.
    #[instrument(
        level = "debug",
        skip_all,
        fields(kind = %self.kind, entity = %entity.id, event = event.name())
    )]
    pub fn transition(
        &self,
        entity: &mut StatefulEntity<S>,
        event: E,
        context: &TransitionContext,
    ) -> Result<S, TransitionError> {
        let mut attempt = 0;
        loop {
            let to = self.table.next_state(&entity.state, &event)?.clone();
            let expected = entity.versioned();
            let update = expected
                .successor(to.clone())
                .ok_or(StoreError::VersionExhausted { id: entity.id })?;
            let listeners = self.listeners.listeners(&self.kind);

            let info = TransitionInfo {
                kind: &self.kind,
                entity_id: entity.id,
                from: &expected.state,
                event: &event,
                to: &to,
                from_version: expected.version,
                to_version: update.version,
                attempt,
                context,
            };

            self.run_pre_listeners(&listeners, &info)?;

            if self.store.compare_and_swap(entity.id, &expected, &update)? {
                entity.refresh(update);
                debug!(
                    from = expected.state.name(),
                    to = to.name(),
                    version = entity.version,
                    attempt,
                    "Transition committed"
                );
                self.run_post_listeners(&listeners, &info);
                return Ok(to);
            }

            attempt += 1;
            if attempt >= self.config.max_attempts() {
                warn!(
                    attempts = attempt,
                    version = expected.version,
                    "Retry budget exhausted by concurrent modification"
                );
                return Err(TransitionError::ConcurrentModification {
                    id: entity.id,
                    attempts: attempt,
                });
            }

            let fresh = self.store.load(entity.id)?;
            debug!(
                expected_version = expected.version,
                found_version = fresh.version,
                found_state = fresh.state.name(),
                attempt,
                "Lost compare-and-swap race, retrying"
            );
            entity.refresh(fresh);
        }
    }

    /// Load `id`, apply `event`, and return the updated view.
    pub fn transition_by_id(
        &self,
        id: EntityId,
        event: E,
        context: &TransitionContext,
    ) -> Result<StatefulEntity<S>, TransitionError> {
        let mut entity = self.current(id)?;
        self.transition(&mut entity, event, context)?;
        Ok(entity)
    }

    fn run_pre_listeners(
        &self,
        listeners: &[Registration<S, E>],
        info: &TransitionInfo<'_, S, E>,
    ) -> Result<(), TransitionError> {
        for registration in listeners.iter().filter(|r| r.filter().matches(info)) {
            let listener = registration.listener();
            let reason = match listener.pre_transition(info) {
                Ok(true) => continue,
                Ok(false) => None,
                Err(e) => Some(e.to_string()),
            };

            debug!(
                listener = listener.name(),
                reason = reason.as_deref().unwrap_or(""),
                "Transition vetoed"
            );
            return Err(TransitionError::Vetoed {
                listener: listener.name().to_string(),
                from: info.from.name().to_string(),
                to: info.to.name().to_string(),
                reason,
            });
        }
        Ok(())
    }

    fn run_post_listeners(&self, listeners: &[Registration<S, E>], info: &TransitionInfo<'_, S, E>) {
        for registration in listeners.iter().filter(|r| r.filter().matches(info)) {
            let listener = registration.listener();
            if let Err(e) = listener.post_transition(info) {
                // The new state is already committed; report and carry on.
                warn!(
                    listener = listener.name(),
                    error = %e,
                    from = info.from.name(),
                    to = info.to.name(),
                    "Post-transition listener failed"
                );
            }
        }
    }
}
