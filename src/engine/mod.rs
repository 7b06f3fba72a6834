//! The transition engine: the only path through which state changes flow.
//!
//! # Key Concepts
//!
//! - **Resolution**: the next state always comes from the transition table,
//!   recomputed against the freshest known state on every attempt
//! - **Optimistic concurrency**: changes are persisted with compare-and-swap
//!   on `(state, version)`; a lost race reloads the row and retries
//! - **Listeners**: pre-transition hooks may veto, post-transition hooks react
//!
//! # Failure semantics
//!
//! | Error | Retried by engine | Caller action |
//! |---|---|---|
//! | `Illegal` | no | pick another event or inspect state |
//! | `Vetoed` | no | address the listener's reason |
//! | `ConcurrentModification` | up to `max_retries` | re-issue the operation |
//! | `Store(NotFound)` | no | entity vanished |
//! | `Store(VersionExhausted)` | no | the row can never change again |

mod config;
mod error;
mod machine;

pub use config::{EngineConfig, DEFAULT_MAX_RETRIES};
pub use error::TransitionError;
pub use machine::StateMachine;
