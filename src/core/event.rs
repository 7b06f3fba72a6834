//! Event trait for lifecycle triggers.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// A named trigger requesting a state change.
///
/// Events are immutable tokens; together with the current state they select
/// exactly one entry in a [`TransitionTable`](crate::table::TransitionTable).
///
/// # Example
///
/// ```rust
/// use lifecycle::core::Event;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum VolumeEvent {
///     CreateRequested,
///     DestroyRequested,
/// }
///
/// impl Event for VolumeEvent {
///     fn name(&self) -> &str {
///         match self {
///             Self::CreateRequested => "CreateRequested",
///             Self::DestroyRequested => "DestroyRequested",
///         }
///     }
/// }
/// ```
pub trait Event:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the event's name for display/logging.
    fn name(&self) -> &str;
}
