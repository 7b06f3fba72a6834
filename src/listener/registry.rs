//! Ordered listener registrations per entity kind.

use super::{ListenerFilter, StateListener};
use crate::core::{EntityKind, Event, State};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when registering listeners.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistrationError {
    #[error("Listener '{listener}' is already registered for '{kind}'")]
    Duplicate { kind: EntityKind, listener: String },
}

/// A listener together with the filter it was registered with.
pub struct Registration<S: State, E: Event> {
    listener: Arc<dyn StateListener<S, E>>,
    filter: ListenerFilter<S, E>,
}

impl<S: State, E: Event> Registration<S, E> {
    pub fn listener(&self) -> &dyn StateListener<S, E> {
        self.listener.as_ref()
    }

    pub fn filter(&self) -> &ListenerFilter<S, E> {
        &self.filter
    }
}

impl<S: State, E: Event> Clone for Registration<S, E> {
    fn clone(&self) -> Self {
        Self {
            listener: Arc::clone(&self.listener),
            filter: self.filter.clone(),
        }
    }
}

/// Registrations for every entity kind.
///
/// Registration is append-only. Each kind's list is an immutable snapshot
/// that registration replaces wholesale, so engines iterate a snapshot
/// without holding the lock while listeners run.
///
/// Registering the same listener instance (the same `Arc`) twice for a kind
/// is rejected. Distinct instances are independent and each one fires.
pub struct ListenerRegistry<S: State, E: Event> {
    by_kind: RwLock<HashMap<EntityKind, Arc<Vec<Registration<S, E>>>>>,
}

impl<S: State, E: Event> Default for ListenerRegistry<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event> ListenerRegistry<S, E> {
    pub fn new() -> Self {
        Self {
            by_kind: RwLock::new(HashMap::new()),
        }
    }

    /// Register a listener for every transition of `kind`.
    pub fn register(
        &self,
        kind: impl Into<EntityKind>,
        listener: Arc<dyn StateListener<S, E>>,
    ) -> Result<(), RegistrationError> {
        self.register_filtered(kind, ListenerFilter::any(), listener)
    }

    /// Register a listener for the transitions of `kind` matching `filter`.
    pub fn register_filtered(
        &self,
        kind: impl Into<EntityKind>,
        filter: ListenerFilter<S, E>,
        listener: Arc<dyn StateListener<S, E>>,
    ) -> Result<(), RegistrationError> {
        let kind = kind.into();
        let mut by_kind = self
            .by_kind
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let current = by_kind.get(&kind).cloned().unwrap_or_default();
        if current.iter().any(|r| same_instance(&r.listener, &listener)) {
            return Err(RegistrationError::Duplicate {
                kind,
                listener: listener.name().to_string(),
            });
        }

        debug!(
            kind = %kind,
            listener = listener.name(),
            position = current.len(),
            "Registered transition listener"
        );

        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(Registration { listener, filter });
        by_kind.insert(kind, Arc::new(next));
        Ok(())
    }

    /// Snapshot of the registrations for `kind`, in registration order.
    pub fn listeners(&self, kind: &EntityKind) -> Arc<Vec<Registration<S, E>>> {
        self.by_kind
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(kind)
            .cloned()
            .unwrap_or_default()
    }

    pub fn len(&self, kind: &EntityKind) -> usize {
        self.listeners(kind).len()
    }

    pub fn is_empty(&self, kind: &EntityKind) -> bool {
        self.len(kind) == 0
    }
}

fn same_instance<S: State, E: Event>(
    a: &Arc<dyn StateListener<S, E>>,
    b: &Arc<dyn StateListener<S, E>>,
) -> bool {
    // Compare data pointers only; vtable pointers are not unique.
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::FnListener;
    use crate::lifecycle::{ObjectEvent, ObjectState};

    fn named(name: &str) -> Arc<dyn StateListener<ObjectState, ObjectEvent>> {
        Arc::new(FnListener::<ObjectState, ObjectEvent>::new(name))
    }

    #[test]
    fn registrations_keep_order_per_kind() {
        let registry = ListenerRegistry::new();
        registry.register("template", named("first")).unwrap();
        registry.register("template", named("second")).unwrap();
        registry.register("volume", named("other")).unwrap();

        let names: Vec<String> = registry
            .listeners(&EntityKind::new("template"))
            .iter()
            .map(|r| r.listener().name().to_string())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(registry.len(&EntityKind::new("volume")), 1);
    }

    #[test]
    fn unknown_kind_has_no_listeners() {
        let registry: ListenerRegistry<ObjectState, ObjectEvent> = ListenerRegistry::new();
        assert!(registry.is_empty(&EntityKind::new("network")));
    }

    #[test]
    fn same_instance_is_rejected() {
        let registry = ListenerRegistry::new();
        let listener = named("usage");

        registry.register("template", Arc::clone(&listener)).unwrap();
        let err = registry.register("template", Arc::clone(&listener)).unwrap_err();

        assert_eq!(
            err,
            RegistrationError::Duplicate {
                kind: EntityKind::new("template"),
                listener: "usage".to_string(),
            }
        );
        assert_eq!(registry.len(&EntityKind::new("template")), 1);
    }

    #[test]
    fn same_instance_may_serve_several_kinds() {
        let registry = ListenerRegistry::new();
        let listener = named("usage");

        registry.register("template", Arc::clone(&listener)).unwrap();
        registry.register("volume", listener).unwrap();
    }

    #[test]
    fn distinct_instances_of_same_listener_are_allowed() {
        let registry = ListenerRegistry::new();
        registry.register("template", named("usage")).unwrap();
        registry.register("template", named("usage")).unwrap();
        assert_eq!(registry.len(&EntityKind::new("template")), 2);
    }

    #[test]
    fn snapshots_are_unaffected_by_later_registration() {
        let registry = ListenerRegistry::new();
        registry.register("template", named("first")).unwrap();

        let snapshot = registry.listeners(&EntityKind::new("template"));
        registry.register("template", named("second")).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(&EntityKind::new("template")), 2);
    }
}
