//! Transition table errors.

use thiserror::Error;

/// Errors raised while wiring a transition table.
///
/// These are startup failures and must not be swallowed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("Ambiguous transition from '{from}' on '{event}': already leads to '{existing}', cannot also lead to '{requested}'")]
    AmbiguousTransition {
        from: String,
        event: String,
        existing: String,
        requested: String,
    },

    #[error("Transition table has {} conflicting entries", .0.len())]
    Conflicts(Vec<ConfigurationError>),
}

/// The requested event is not valid from the current state.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("No transition from state '{from}' on event '{event}'")]
pub struct IllegalTransition {
    pub from: String,
    pub event: String,
}
