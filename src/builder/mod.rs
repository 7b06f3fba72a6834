//! Builder API for ergonomic engine construction.
//!
//! This module provides a fluent builder for [`StateMachine`](crate::engine::StateMachine)
//! and macros that implement [`State`](crate::core::State) and
//! [`Event`](crate::core::Event) for plain enums.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
