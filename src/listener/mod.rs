//! Transition listeners.
//!
//! Listeners observe transitions of one entity kind. They run synchronously
//! on the thread that called the engine, in registration order:
//!
//! - **pre-transition** hooks run before the compare-and-swap and may veto by
//!   returning `Ok(false)` or an error. A vetoed transition is never persisted.
//! - **post-transition** hooks run after the new state committed. Their
//!   failures are logged and never undo the commit.
//!
//! Listeners own their side effects (event bus publishing, usage records);
//! the engine never performs them itself.

mod filter;
mod history;
mod registry;

pub use filter::ListenerFilter;
pub use history::HistoryRecorder;
pub use registry::{ListenerRegistry, Registration, RegistrationError};

use crate::context::TransitionContext;
use crate::core::{EntityId, EntityKind, Event, State};
use thiserror::Error;

/// What a listener sees of a transition.
///
/// During pre-transition hooks `to` is the candidate state and nothing is
/// persisted yet; during post-transition hooks the row already holds
/// `(to, to_version)`.
#[derive(Debug)]
pub struct TransitionInfo<'a, S: State, E: Event> {
    pub kind: &'a EntityKind,
    pub entity_id: EntityId,
    pub from: &'a S,
    pub event: &'a E,
    pub to: &'a S,
    pub from_version: u64,
    pub to_version: u64,
    /// Lost compare-and-swap races so far in this call
    pub attempt: usize,
    pub context: &'a TransitionContext,
}

/// Failure reported by a listener hook.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct ListenerError {
    message: String,
}

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Observer of one entity kind's transitions.
///
/// Both hooks default to doing nothing, so implementors override only what
/// they need.
pub trait StateListener<S: State, E: Event>: Send + Sync {
    /// Name used in logs and veto errors.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Return `Ok(false)` or an error to veto the transition.
    fn pre_transition(&self, info: &TransitionInfo<'_, S, E>) -> Result<bool, ListenerError> {
        let _ = info;
        Ok(true)
    }

    fn post_transition(&self, info: &TransitionInfo<'_, S, E>) -> Result<(), ListenerError> {
        let _ = info;
        Ok(())
    }
}

type PreHook<S, E> =
    Box<dyn Fn(&TransitionInfo<'_, S, E>) -> Result<bool, ListenerError> + Send + Sync>;
type PostHook<S, E> =
    Box<dyn Fn(&TransitionInfo<'_, S, E>) -> Result<(), ListenerError> + Send + Sync>;

/// Listener assembled from closures.
///
/// # Example
///
/// ```rust
/// use lifecycle::listener::FnListener;
/// use lifecycle::lifecycle::{ObjectEvent, ObjectState};
///
/// let listener = FnListener::<ObjectState, ObjectEvent>::new("usage")
///     .on_post(|info| {
///         println!("{} -> {}", info.from_version, info.to_version);
///         Ok(())
///     });
/// ```
pub struct FnListener<S: State, E: Event> {
    name: String,
    pre: Option<PreHook<S, E>>,
    post: Option<PostHook<S, E>>,
}

impl<S: State, E: Event> FnListener<S, E> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pre: None,
            post: None,
        }
    }

    /// Set the pre-transition hook.
    pub fn on_pre<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionInfo<'_, S, E>) -> Result<bool, ListenerError> + Send + Sync + 'static,
    {
        self.pre = Some(Box::new(hook));
        self
    }

    /// Set the post-transition hook.
    pub fn on_post<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionInfo<'_, S, E>) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        self.post = Some(Box::new(hook));
        self
    }
}

impl<S: State, E: Event> StateListener<S, E> for FnListener<S, E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn pre_transition(&self, info: &TransitionInfo<'_, S, E>) -> Result<bool, ListenerError> {
        match &self.pre {
            Some(hook) => hook(info),
            None => Ok(true),
        }
    }

    fn post_transition(&self, info: &TransitionInfo<'_, S, E>) -> Result<(), ListenerError> {
        match &self.post {
            Some(hook) => hook(info),
            None => Ok(()),
        }
    }
}
