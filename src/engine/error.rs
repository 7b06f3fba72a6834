//! Errors returned by [`StateMachine::transition`](super::StateMachine::transition).

use crate::core::EntityId;
use crate::store::StoreError;
use crate::table::IllegalTransition;
use thiserror::Error;

/// Errors that can occur during transitions
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransitionError {
    /// The event is not valid from the entity's current state
    #[error(transparent)]
    Illegal(#[from] IllegalTransition),

    /// A pre-transition listener rejected the change
    #[error("Listener '{listener}' vetoed transition from '{from}' to '{to}'{}", reason_suffix(.reason))]
    Vetoed {
        listener: String,
        from: String,
        to: String,
        reason: Option<String>,
    },

    /// Every attempt lost the compare-and-swap race
    #[error("Entity {id} was modified concurrently; gave up after {attempts} attempts")]
    ConcurrentModification { id: EntityId, attempts: usize },

    /// The store failed, or the entity no longer exists
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|r| format!(": {r}"))
        .unwrap_or_default()
}

impl TransitionError {
    /// Whether re-issuing the whole operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }

    /// Whether the entity was deleted out from under the call.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::NotFound { .. }))
    }
}
