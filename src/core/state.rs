//! Core State trait for lifecycle states.
//!
//! All lifecycle states must implement this trait, which provides
//! pure methods for inspecting state properties without side effects.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for lifecycle states.
///
/// States are immutable, finite tokens. The full set is fixed per entity
/// kind, and each state is used as a lookup key in the transition table.
///
/// # Required Traits
///
/// - `Clone`: States are copied into history records and listener views
/// - `Eq` + `Hash`: States key the transition table
/// - `Debug`: States must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: States are persisted by stores and snapshots
///
/// # Example
///
/// ```rust
/// use lifecycle::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum VolumeState {
///     Allocated,
///     Ready,
///     Destroyed,
/// }
///
/// impl State for VolumeState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Allocated => "Allocated",
///             Self::Ready => "Ready",
///             Self::Destroyed => "Destroyed",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Destroyed)
///     }
/// }
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Informational only. The engine treats a terminal state like any other
    /// state; whether it has outgoing transitions is decided by the table.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}
