//! Filters that narrow which transitions a listener observes.

use super::TransitionInfo;
use crate::core::{Event, State};

/// Optional constraints on the from-state, to-state and event of a
/// transition. An empty filter matches everything.
///
/// # Example
///
/// ```rust
/// use lifecycle::listener::ListenerFilter;
/// use lifecycle::lifecycle::{ObjectEvent, ObjectState};
///
/// // Only fire when something finishes being destroyed.
/// let filter = ListenerFilter::<ObjectState, ObjectEvent>::any()
///     .to(ObjectState::Destroyed)
///     .on(ObjectEvent::OperationSucceeded);
/// ```
#[derive(Clone, Debug)]
pub struct ListenerFilter<S: State, E: Event> {
    from: Option<S>,
    to: Option<S>,
    events: Vec<E>,
}

impl<S: State, E: Event> Default for ListenerFilter<S, E> {
    fn default() -> Self {
        Self::any()
    }
}

impl<S: State, E: Event> ListenerFilter<S, E> {
    /// Match every transition.
    pub fn any() -> Self {
        Self {
            from: None,
            to: None,
            events: Vec::new(),
        }
    }

    /// Only transitions leaving `state`.
    pub fn from(mut self, state: S) -> Self {
        self.from = Some(state);
        self
    }

    /// Only transitions entering `state`.
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Only transitions triggered by `event`. May be called repeatedly to
    /// accept any of several events.
    pub fn on(mut self, event: E) -> Self {
        self.events.push(event);
        self
    }

    pub fn matches(&self, info: &TransitionInfo<'_, S, E>) -> bool {
        self.from.as_ref().map_or(true, |s| s == info.from)
            && self.to.as_ref().map_or(true, |s| s == info.to)
            && (self.events.is_empty() || self.events.contains(info.event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TransitionContext;
    use crate::core::{EntityId, EntityKind};
    use crate::lifecycle::{ObjectEvent, ObjectState};

    fn matches(
        filter: &ListenerFilter<ObjectState, ObjectEvent>,
        from: ObjectState,
        event: ObjectEvent,
        to: ObjectState,
    ) -> bool {
        let kind = EntityKind::new("volume");
        let context = TransitionContext::new();
        let info = TransitionInfo {
            kind: &kind,
            entity_id: EntityId(3),
            from: &from,
            event: &event,
            to: &to,
            from_version: 4,
            to_version: 5,
            attempt: 0,
            context: &context,
        };
        filter.matches(&info)
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = ListenerFilter::any();
        assert!(matches(&filter, ObjectState::Allocated, ObjectEvent::CreateRequested, ObjectState::Creating));
        assert!(matches(&filter, ObjectState::Destroying, ObjectEvent::OperationSucceeded, ObjectState::Destroyed));
    }

    #[test]
    fn filter_constrains_all_given_fields() {
        let filter = ListenerFilter::any()
            .from(ObjectState::Destroying)
            .to(ObjectState::Destroyed);

        assert!(matches(&filter, ObjectState::Destroying, ObjectEvent::OperationSucceeded, ObjectState::Destroyed));
        assert!(!matches(&filter, ObjectState::Destroying, ObjectEvent::DestroyRequested, ObjectState::Destroying));
        assert!(!matches(&filter, ObjectState::Creating, ObjectEvent::OperationSucceeded, ObjectState::Ready));
    }

    #[test]
    fn several_events_are_alternatives() {
        let filter = ListenerFilter::any()
            .on(ObjectEvent::OperationSucceeded)
            .on(ObjectEvent::OperationFailed);

        assert!(matches(&filter, ObjectState::Creating, ObjectEvent::OperationFailed, ObjectState::Allocated));
        assert!(matches(&filter, ObjectState::Creating, ObjectEvent::OperationSucceeded, ObjectState::Ready));
        assert!(!matches(&filter, ObjectState::Ready, ObjectEvent::DestroyRequested, ObjectState::Destroying));
    }
}
