//! Per-call data passed through to listeners.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Caller-supplied data for one transition request.
///
/// The engine never inspects the payload; it only hands the context to
/// listeners, which typically copy it into audit or usage records.
///
/// # Example
///
/// ```rust
/// use lifecycle::context::TransitionContext;
/// use serde_json::json;
///
/// let ctx = TransitionContext::new()
///     .initiated_by("account:42")
///     .with_payload(json!({ "zone": "z1" }));
///
/// assert_eq!(ctx.initiator(), Some("account:42"));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionContext {
    correlation_id: Uuid,
    initiator: Option<String>,
    payload: Option<serde_json::Value>,
    started_at: DateTime<Utc>,
}

impl Default for TransitionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionContext {
    pub fn new() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            initiator: None,
            payload: None,
            started_at: Utc::now(),
        }
    }

    /// Record who asked for the transition.
    pub fn initiated_by(mut self, initiator: impl Into<String>) -> Self {
        self.initiator = Some(initiator.into());
        self
    }

    /// Attach an already-built JSON payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Serialize `data` into the payload.
    pub fn with_data<T: Serialize>(self, data: &T) -> Result<Self, serde_json::Error> {
        let payload = serde_json::to_value(data)?;
        Ok(self.with_payload(payload))
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub fn initiator(&self) -> Option<&str> {
        self.initiator.as_deref()
    }

    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.payload.as_ref()
    }

    /// Decode the payload as `T`. `Ok(None)` when no payload was attached.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.payload
            .as_ref()
            .map(|value| T::deserialize(value))
            .transpose()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Calculate elapsed time since the request started
    pub fn elapsed(&self) -> Duration {
        let now = Utc::now();
        now.signed_duration_since(self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Audit {
        account: u64,
        reason: String,
    }

    #[test]
    fn payload_round_trips_through_typed_data() {
        let audit = Audit {
            account: 7,
            reason: "expunge".to_string(),
        };
        let ctx = TransitionContext::new().with_data(&audit).unwrap();

        assert_eq!(ctx.payload_as::<Audit>().unwrap(), Some(audit));
    }

    #[test]
    fn missing_payload_decodes_to_none() {
        let ctx = TransitionContext::new();
        assert_eq!(ctx.payload_as::<Audit>().unwrap(), None);
        assert!(ctx.initiator().is_none());
    }

    #[test]
    fn mismatched_payload_is_an_error() {
        let ctx = TransitionContext::new().with_payload(json!({ "unexpected": true }));
        assert!(ctx.payload_as::<Audit>().is_err());
    }

    #[test]
    fn each_context_gets_its_own_correlation_id() {
        let a = TransitionContext::new();
        let b = TransitionContext::new();
        assert_ne!(a.correlation_id(), b.correlation_id());
    }

    #[test]
    fn elapsed_is_measured_from_start() {
        let ctx = TransitionContext::new();
        std::thread::sleep(Duration::from_millis(5));
        assert!(ctx.elapsed() >= Duration::from_millis(5));
    }
}
