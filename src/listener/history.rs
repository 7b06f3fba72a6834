//! Post-transition listener that keeps per-entity audit trails.

use super::{ListenerError, StateListener, TransitionInfo};
use crate::core::{EntityId, Event, State, StateHistory, StateTransition};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Records every committed transition into a [`StateHistory`] per entity.
pub struct HistoryRecorder<S: State, E: Event> {
    histories: Mutex<HashMap<EntityId, StateHistory<S, E>>>,
}

impl<S: State, E: Event> Default for HistoryRecorder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event> HistoryRecorder<S, E> {
    pub fn new() -> Self {
        Self {
            histories: Mutex::new(HashMap::new()),
        }
    }

    fn histories(&self) -> MutexGuard<'_, HashMap<EntityId, StateHistory<S, E>>> {
        self.histories.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// History of `id`; empty if nothing was recorded.
    pub fn history(&self, id: EntityId) -> StateHistory<S, E> {
        self.histories().get(&id).cloned().unwrap_or_default()
    }

    /// Drop the history of `id`, e.g. after the row was expunged.
    pub fn forget(&self, id: EntityId) -> Option<StateHistory<S, E>> {
        self.histories().remove(&id)
    }
}

impl<S: State, E: Event> StateListener<S, E> for HistoryRecorder<S, E> {
    fn name(&self) -> &str {
        "history-recorder"
    }

    fn post_transition(&self, info: &TransitionInfo<'_, S, E>) -> Result<(), ListenerError> {
        let transition = StateTransition {
            from: info.from.clone(),
            event: info.event.clone(),
            to: info.to.clone(),
            version: info.to_version,
            timestamp: Utc::now(),
            attempt: info.attempt,
        };

        self.histories()
            .entry(info.entity_id)
            .or_default()
            .push(transition);
        Ok(())
    }
}
