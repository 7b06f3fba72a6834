//! Lifecycle: optimistic-concurrency state machines for persisted entities
//!
//! Every managed entity (a template, a volume, a network) is a row holding a
//! lifecycle state and a version counter. A transition is legal only if the
//! entity kind's table maps `(current state, event)` to a next state, and it
//! commits only if nobody else changed the row in between: the store swaps
//! `(state, version)` for `(next, version + 1)` atomically. Concurrent
//! callers never take locks on the entity; the loser of a race reloads the
//! row and re-resolves its event against what actually happened.
//!
//! # Core Concepts
//!
//! - **Table**: the legal `(from, event) -> to` graph of one entity kind
//! - **Store**: the persistence adapter performing the compare-and-swap
//! - **Engine**: validation, persistence and bounded retry in one call
//! - **Listeners**: pre-transition veto hooks and post-transition observers
//! - **Context**: correlation id and payload threaded through to listeners
//!
//! # Example
//!
//! ```rust
//! use lifecycle::lifecycle::{object_lifecycle, ObjectEvent, ObjectState};
//! use lifecycle::{InMemoryStore, StateMachine, TransitionContext};
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let engine = StateMachine::builder()
//!     .kind("template")
//!     .table(object_lifecycle().unwrap())
//!     .store(Arc::clone(&store))
//!     .build()
//!     .unwrap();
//!
//! let mut template = store.insert(7, ObjectState::INITIAL).unwrap();
//! let ctx = TransitionContext::new().initiated_by("admin");
//!
//! engine.transition(&mut template, ObjectEvent::CreateRequested, &ctx).unwrap();
//! engine.transition(&mut template, ObjectEvent::OperationSucceeded, &ctx).unwrap();
//!
//! assert_eq!(template.state, ObjectState::Ready);
//! assert_eq!(template.version, 2);
//! ```

pub mod builder;
pub mod context;
pub mod core;
pub mod engine;
pub mod lifecycle;
pub mod listener;
pub mod store;
pub mod table;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder};
pub use context::TransitionContext;
pub use core::{EntityId, EntityKind, Event, State, StatefulEntity, Versioned};
pub use engine::{EngineConfig, StateMachine, TransitionError};
pub use listener::{FnListener, ListenerError, ListenerRegistry, StateListener, TransitionInfo};
pub use store::{InMemoryStore, StateStore, StoreError};
pub use table::{ConfigurationError, IllegalTransition, TransitionTable};
