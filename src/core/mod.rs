//! Core value types for lifecycle state machines.
//!
//! This module contains the data shared by every other component:
//! - States and events via the `State` and `Event` traits
//! - Entity identity and the persisted `(state, version)` pair
//! - Immutable transition history records
//!
//! Nothing here performs I/O. Persistence lives in [`crate::store`] and
//! transition orchestration in [`crate::engine`].

mod entity;
mod event;
mod history;
mod state;

pub use entity::{EntityId, EntityKind, StatefulEntity, Versioned};
pub use event::Event;
pub use history::{StateHistory, StateTransition};
pub use state::State;
