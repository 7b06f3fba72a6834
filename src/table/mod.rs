//! Transition tables: the legal state graph of one entity kind.
//!
//! A table maps `(from, event)` to exactly one `to` state. It is populated
//! once at startup, then shared read-only (usually behind an `Arc`) by every
//! engine driving that entity kind. Lookups need no locking.
//!
//! # Example
//!
//! ```rust
//! use lifecycle::lifecycle::{ObjectEvent, ObjectState};
//! use lifecycle::table::TransitionTable;
//!
//! let mut table = TransitionTable::new();
//! table
//!     .add_transition(ObjectState::Allocated, ObjectEvent::CreateRequested, ObjectState::Creating)
//!     .unwrap();
//!
//! assert_eq!(
//!     table.next_state(&ObjectState::Allocated, &ObjectEvent::CreateRequested),
//!     Ok(&ObjectState::Creating)
//! );
//! assert!(table
//!     .next_state(&ObjectState::Ready, &ObjectEvent::CreateRequested)
//!     .is_err());
//! ```

pub mod builder;
pub mod error;

pub use builder::TransitionTableBuilder;
pub use error::{ConfigurationError, IllegalTransition};

use crate::core::{Event, State};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single `(from, event) -> to` entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Transition<S: State, E: Event> {
    pub from: S,
    pub event: E,
    pub to: S,
}

impl<S: State, E: Event> Transition<S, E> {
    pub fn new(from: S, event: E, to: S) -> Self {
        Self { from, event, to }
    }
}

/// Deterministic mapping of `(from, event)` to the next state.
#[derive(Clone, Debug)]
pub struct TransitionTable<S: State, E: Event> {
    next: HashMap<(S, E), S>,
    // Registration order, for introspection.
    entries: Vec<Transition<S, E>>,
}

impl<S: State, E: Event> Default for TransitionTable<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event> TransitionTable<S, E> {
    pub fn new() -> Self {
        Self {
            next: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Start a builder that reports every conflict at once.
    pub fn builder() -> TransitionTableBuilder<S, E> {
        TransitionTableBuilder::new()
    }

    /// Register `from --event--> to`.
    ///
    /// Re-registering an identical transition is a no-op. Registering a
    /// different target for an existing `(from, event)` fails and leaves the
    /// table unchanged.
    pub fn add_transition(&mut self, from: S, event: E, to: S) -> Result<&mut Self, ConfigurationError> {
        let key = (from, event);
        if let Some(existing) = self.next.get(&key) {
            if *existing == to {
                return Ok(self);
            }
            return Err(ConfigurationError::AmbiguousTransition {
                from: key.0.name().to_string(),
                event: key.1.name().to_string(),
                existing: existing.name().to_string(),
                requested: to.name().to_string(),
            });
        }

        self.entries.push(Transition::new(key.0.clone(), key.1.clone(), to.clone()));
        self.next.insert(key, to);
        Ok(self)
    }

    /// Register the same `event --> to` edge from several states (fan-in).
    pub fn add_transitions_from<I>(&mut self, froms: I, event: E, to: S) -> Result<&mut Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
    {
        for from in froms {
            self.add_transition(from, event.clone(), to.clone())?;
        }
        Ok(self)
    }

    /// Resolve the next state. This is the only legality check in the crate.
    pub fn next_state(&self, from: &S, event: &E) -> Result<&S, IllegalTransition> {
        // The key is owned, so lookups clone; states and events are small tokens.
        self.next
            .get(&(from.clone(), event.clone()))
            .ok_or_else(|| IllegalTransition {
                from: from.name().to_string(),
                event: event.name().to_string(),
            })
    }

    pub fn contains(&self, from: &S, event: &E) -> bool {
        self.next_state(from, event).is_ok()
    }

    /// Events accepted from `from`, in registration order.
    pub fn possible_events(&self, from: &S) -> Vec<&E> {
        self.entries
            .iter()
            .filter(|t| t.from == *from)
            .map(|t| &t.event)
            .collect()
    }

    /// States from which `event` leads to `to`, in registration order.
    pub fn from_states(&self, to: &S, event: &E) -> Vec<&S> {
        self.entries
            .iter()
            .filter(|t| t.to == *to && t.event == *event)
            .map(|t| &t.from)
            .collect()
    }

    /// Every state mentioned by the table, in first-seen order.
    pub fn states(&self) -> Vec<&S> {
        let mut states: Vec<&S> = Vec::new();
        for transition in &self.entries {
            for state in [&transition.from, &transition.to] {
                if !states.contains(&state) {
                    states.push(state);
                }
            }
        }
        states
    }

    /// All registered transitions, in registration order.
    pub fn transitions(&self) -> &[Transition<S, E>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{ObjectEvent, ObjectState};

    fn table() -> TransitionTable<ObjectState, ObjectEvent> {
        let mut table = TransitionTable::new();
        table
            .add_transition(ObjectState::Allocated, ObjectEvent::CreateRequested, ObjectState::Creating)
            .unwrap()
            .add_transition(ObjectState::Creating, ObjectEvent::OperationSucceeded, ObjectState::Ready)
            .unwrap()
            .add_transitions_from(
                [ObjectState::Allocated, ObjectState::Creating, ObjectState::Ready],
                ObjectEvent::DestroyRequested,
                ObjectState::Destroying,
            )
            .unwrap();
        table
    }

    #[test]
    fn next_state_returns_registered_target() {
        let table = table();
        assert_eq!(
            table.next_state(&ObjectState::Creating, &ObjectEvent::OperationSucceeded),
            Ok(&ObjectState::Ready)
        );
    }

    #[test]
    fn next_state_rejects_unknown_pairs() {
        let table = table();
        let err = table
            .next_state(&ObjectState::Ready, &ObjectEvent::CreateRequested)
            .unwrap_err();
        assert_eq!(err.from, "Ready");
        assert_eq!(err.event, "CreateRequested");
    }

    #[test]
    fn identical_registration_is_idempotent() {
        let mut table = table();
        let before = table.len();
        table
            .add_transition(ObjectState::Allocated, ObjectEvent::CreateRequested, ObjectState::Creating)
            .unwrap();
        assert_eq!(table.len(), before);
    }

    #[test]
    fn conflicting_registration_fails_and_keeps_original() {
        let mut table = table();
        let err = table
            .add_transition(ObjectState::Allocated, ObjectEvent::CreateRequested, ObjectState::Ready)
            .unwrap_err();

        assert!(matches!(err, ConfigurationError::AmbiguousTransition { .. }));
        assert_eq!(
            table.next_state(&ObjectState::Allocated, &ObjectEvent::CreateRequested),
            Ok(&ObjectState::Creating)
        );
    }

    #[test]
    fn fan_in_is_allowed() {
        let table = table();
        let froms = table.from_states(&ObjectState::Destroying, &ObjectEvent::DestroyRequested);
        assert_eq!(
            froms,
            vec![&ObjectState::Allocated, &ObjectState::Creating, &ObjectState::Ready]
        );
    }

    #[test]
    fn possible_events_follow_registration_order() {
        let table = table();
        assert_eq!(
            table.possible_events(&ObjectState::Allocated),
            vec![&ObjectEvent::CreateRequested, &ObjectEvent::DestroyRequested]
        );
        assert!(table.possible_events(&ObjectState::Destroyed).is_empty());
    }

    #[test]
    fn states_lists_each_state_once() {
        let table = table();
        assert_eq!(
            table.states(),
            vec![
                &ObjectState::Allocated,
                &ObjectState::Creating,
                &ObjectState::Ready,
                &ObjectState::Destroying,
            ]
        );
    }
}
