//! State transition history tracking.
//!
//! Provides immutable records of committed transitions, used for audit
//! trails by [`HistoryRecorder`](crate::listener::HistoryRecorder).

use super::event::Event;
use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single committed state transition.
///
/// # Example
///
/// ```rust
/// use lifecycle::core::StateTransition;
/// use lifecycle::lifecycle::{ObjectEvent, ObjectState};
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: ObjectState::Allocated,
///     event: ObjectEvent::CreateRequested,
///     to: ObjectState::Creating,
///     version: 1,
///     timestamp: Utc::now(),
///     attempt: 0,
/// };
/// assert_eq!(transition.version, 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State, E: Event> {
    /// The state being transitioned from
    pub from: S,
    /// The event that triggered the transition
    pub event: E,
    /// The state being transitioned to
    pub to: S,
    /// The row version after the transition committed
    pub version: u64,
    /// When the transition committed
    pub timestamp: DateTime<Utc>,
    /// Number of lost compare-and-swap races before this one landed
    pub attempt: usize,
}

/// Ordered history of state transitions.
///
/// History is immutable - the `record` method returns a new history
/// with the transition added.
///
/// # Example
///
/// ```rust
/// use lifecycle::core::{StateHistory, StateTransition};
/// use lifecycle::lifecycle::{ObjectEvent, ObjectState};
/// use chrono::Utc;
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: ObjectState::Allocated,
///         event: ObjectEvent::CreateRequested,
///         to: ObjectState::Creating,
///         version: 1,
///         timestamp: Utc::now(),
///         attempt: 0,
///     })
///     .record(StateTransition {
///         from: ObjectState::Creating,
///         event: ObjectEvent::OperationSucceeded,
///         to: ObjectState::Ready,
///         version: 2,
///         timestamp: Utc::now(),
///         attempt: 0,
///     });
///
/// let path = history.get_path();
/// assert_eq!(path.len(), 3); // Allocated -> Creating -> Ready
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State, E: Event> {
    transitions: Vec<StateTransition<S, E>>,
}

impl<S: State, E: Event> Default for StateHistory<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event> StateHistory<S, E> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, transition: StateTransition<S, E>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Append a transition in place.
    ///
    /// For owners that keep a single mutable history, such as a recorder
    /// behind a lock, where copying on every append would be wasteful.
    pub fn push(&mut self, transition: StateTransition<S, E>) {
        self.transitions.push(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns references to states in order: the first `from` state, then
    /// the `to` state of each transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Calculate total duration from first to last transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all transitions, oldest first.
    pub fn transitions(&self) -> &[StateTransition<S, E>] {
        &self.transitions
    }

    /// The most recent transition, if any.
    pub fn last(&self) -> Option<&StateTransition<S, E>> {
        self.transitions.last()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
