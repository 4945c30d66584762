use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::{is_blank, VisitorIdentifier};

/// The visitor a tracked event is attributed to, as populated by the
/// authentication layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedUser {
    /// Verified account identifier. `None` for anonymous visitors.
    pub email: Option<VisitorIdentifier>,
    /// Display name, if known. Not used for device attribution.
    pub name: Option<String>,
}

/// A single tracking event flowing through the pipeline.
///
/// Interceptors are payload-agnostic: the device resolver only reads
/// [`TrackedEvent::visitor_identifier`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedEvent {
    pub event_id: Uuid,
    pub event_type: String,
    pub occurred_at: DateTime<Utc>,
    pub user: Option<TrackedUser>,
    pub payload: serde_json::Value,
}

impl TrackedEvent {
    /// Create an anonymous event with an empty payload.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.into(),
            occurred_at: Utc::now(),
            user: None,
            payload: serde_json::Value::Null,
        }
    }

    /// Attribute this event to a visitor with the given identifier.
    pub fn with_identifier(mut self, identifier: impl Into<VisitorIdentifier>) -> Self {
        self.user
            .get_or_insert_with(TrackedUser::default)
            .email = Some(identifier.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// The visitor identifier, if the event carries a non-blank one.
    ///
    /// Blank identifiers are reported as `None` so callers only ever see
    /// "identified" or "anonymous".
    pub fn visitor_identifier(&self) -> Option<&VisitorIdentifier> {
        self.user
            .as_ref()
            .and_then(|user| user.email.as_ref())
            .filter(|id| !is_blank(id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_event_is_anonymous() {
        let event = TrackedEvent::new("page_view");
        assert!(event.user.is_none());
        assert!(event.visitor_identifier().is_none());
        assert!(event.visitor_identifier().is_none());
    }

    #[test]
    fn identified_event_exposes_identifier() {
        let event = TrackedEvent::new("page_view").with_identifier("alice@example.com");
        assert_eq!(
            event.visitor_identifier().map(|id| id.as_str()),
            Some("alice@example.com")
        );
        assert!(event.visitor_identifier().is_some());
    }

    #[test]
    fn blank_identifier_reads_as_anonymous() {
        let event = TrackedEvent::new("page_view").with_identifier("   ");
        assert!(event.user.is_some());
        assert!(event.visitor_identifier().is_none());
    }

    #[test]
    fn user_without_email_is_anonymous() {
        let mut event = TrackedEvent::new("page_view");
        event.user = Some(TrackedUser {
            email: None,
            name: Some("Guest".into()),
        });
        assert!(event.visitor_identifier().is_none());
    }

    #[test]
    fn with_identifier_keeps_existing_name() {
        let mut event = TrackedEvent::new("login");
        event.user = Some(TrackedUser {
            email: None,
            name: Some("Alice".into()),
        });
        let event = event.with_identifier("alice@example.com");
        let user = event.user.unwrap();
        assert_eq!(user.name.as_deref(), Some("Alice"));
        assert!(user.email.is_some());
    }

    #[test]
    fn serde_roundtrip_preserves_payload() {
        let event = TrackedEvent::new("purchase")
            .with_identifier("bob@example.com")
            .with_payload(serde_json::json!({"sku": "A-1", "qty": 2}));
        let json = serde_json::to_string(&event).unwrap();
        let back: TrackedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
