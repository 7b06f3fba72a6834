//! Lifecycle of objects held in a data store (templates, volumes, snapshots).
//!
//! ```text
//! Allocated --CreateRequested--> Creating --OperationSucceeded--> Ready
//!     ^                             |
//!     +------OperationFailed--------+
//!
//! {Allocated, Creating, Ready} --DestroyRequested--> Destroying
//! Destroying --DestroyRequested | OperationFailed--> Destroying
//! Destroying --OperationSucceeded--> Destroyed
//! ```

use crate::table::{ConfigurationError, TransitionTable};
use crate::{event_enum, state_enum};

state_enum! {
    /// Where an object is in its data-store lifecycle.
    pub enum ObjectState {
        Allocated,
        Creating,
        Ready,
        Destroying,
        Destroyed,
    }
    final: [Destroyed]
}

event_enum! {
    /// Requests and outcomes that drive [`ObjectState`].
    pub enum ObjectEvent {
        CreateRequested,
        OperationSucceeded,
        OperationFailed,
        DestroyRequested,
    }
}

impl ObjectState {
    /// State every object is persisted in when first created.
    pub const INITIAL: ObjectState = ObjectState::Allocated;
}

/// Build the object lifecycle table.
pub fn object_lifecycle() -> Result<TransitionTable<ObjectState, ObjectEvent>, ConfigurationError> {
    use ObjectEvent::*;
    use ObjectState::*;

    TransitionTable::builder()
        .transition(Allocated, CreateRequested, Creating)
        .transition(Creating, OperationSucceeded, Ready)
        .transition(Creating, OperationFailed, Allocated)
        .transitions_from([Allocated, Creating, Ready], DestroyRequested, Destroying)
        .transition(Destroying, DestroyRequested, Destroying)
        .transition(Destroying, OperationSucceeded, Destroyed)
        .transition(Destroying, OperationFailed, Destroying)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;

    #[test]
    fn lifecycle_table_is_consistent() {
        let table = object_lifecycle().unwrap();
        assert_eq!(table.len(), 9);
        assert_eq!(table.states().len(), 5);
    }

    #[test]
    fn destroyed_is_the_only_terminal_state() {
        let table = object_lifecycle().unwrap();
        for state in table.states() {
            assert_eq!(state.is_final(), table.possible_events(state).is_empty());
        }
        assert!(ObjectState::Destroyed.is_final());
    }

    #[test]
    fn repeated_destroy_stays_destroying() {
        let table = object_lifecycle().unwrap();
        assert_eq!(
            table.next_state(&ObjectState::Destroying, &ObjectEvent::DestroyRequested),
            Ok(&ObjectState::Destroying)
        );
    }

    #[test]
    fn failed_creation_returns_to_allocated() {
        let table = object_lifecycle().unwrap();
        assert_eq!(
            table.next_state(&ObjectState::Creating, &ObjectEvent::OperationFailed),
            Ok(&ObjectState::Allocated)
        );
    }

    #[test]
    fn nothing_leaves_destroyed() {
        let table = object_lifecycle().unwrap();
        for event in [
            ObjectEvent::CreateRequested,
            ObjectEvent::OperationSucceeded,
            ObjectEvent::OperationFailed,
            ObjectEvent::DestroyRequested,
        ] {
            assert!(!table.contains(&ObjectState::Destroyed, &event));
        }
    }
}
