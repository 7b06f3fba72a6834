//! Build errors for state machine engines.

use thiserror::Error;

/// Errors that can occur when building a state machine engine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Entity kind not specified. Call .kind(name) before .build()")]
    MissingKind,

    #[error("Transition table not specified. Call .table(table) before .build()")]
    MissingTable,

    #[error("Transition table is empty. Add at least one transition")]
    EmptyTable,

    #[error("Store not specified. Call .store(store) before .build()")]
    MissingStore,
}
