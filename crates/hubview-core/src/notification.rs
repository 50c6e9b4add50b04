//! # Notification Records
//!
//! Notification entities and the two shapes they are created from: inbound
//! transport events and caller-supplied local drafts.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Notification Lifecycle                              │
//! │                                                                         │
//! │  NotifyEvent (transport) ──► Notification::from_event(event, now)      │
//! │  NotificationDraft (local) ─► Notification::from_draft(draft, now)     │
//! │       │                                                                 │
//! │       ▼  id = UUID v4, time = now, ttl = now + 1 hour                  │
//! │  Prepended to the list (newest first)                                   │
//! │       │                                                                 │
//! │       ├── explicit dismissal (by id)                                    │
//! │       ├── bulk dismissal (all)                                          │
//! │       └── expiry sweep: is_expired(now) removes past-TTL records        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Constructors take `now` explicitly so this module stays deterministic;
//! only the state container reads the wall clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::notification_ttl;

// =============================================================================
// Inbound Event Shape
// =============================================================================

/// The event-specific fields of an inbound notification event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NotifyData {
    /// Notification category, e.g. `"error"` or `"warning"`.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Short headline.
    #[serde(default)]
    pub title: String,

    /// Longer human-readable description.
    #[serde(default)]
    pub description: String,

    /// Icon identifier for the dashboard.
    #[serde(default)]
    pub icon: String,
}

/// An inbound notification event from the real-time transport.
///
/// The payload shape is trusted without validation; the transport
/// collaborator owns the wire protocol.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NotifyEvent {
    /// Name of the originating event.
    #[serde(default)]
    pub event: String,

    /// Bridge the event originated from, if any.
    #[serde(default)]
    pub bridge: Option<String>,

    /// Event-specific notification fields.
    #[serde(default)]
    pub data: NotifyData,
}

// =============================================================================
// Local Draft Shape
// =============================================================================

/// A caller-supplied partial notification record.
///
/// The id, creation time, and TTL are synthesized when the draft is added
/// to the list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    /// Name of the originating event, if any.
    #[serde(default)]
    pub event: Option<String>,

    /// Bridge the notification concerns, if any.
    #[serde(default)]
    pub bridge: Option<String>,

    /// Notification category.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Short headline.
    #[serde(default)]
    pub title: String,

    /// Longer human-readable description.
    #[serde(default)]
    pub description: String,

    /// Icon identifier for the dashboard.
    #[serde(default)]
    pub icon: String,
}

// =============================================================================
// Notification
// =============================================================================

/// A notification as stored in the state tree (and persisted snapshot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique id (UUID v4).
    pub id: String,

    /// Creation timestamp.
    #[ts(as = "String")]
    pub time: DateTime<Utc>,

    /// Name of the originating event, if any.
    pub event: Option<String>,

    /// Bridge the notification concerns, if any.
    pub bridge: Option<String>,

    /// Notification category.
    #[serde(rename = "type")]
    pub kind: String,

    /// Short headline.
    pub title: String,

    /// Longer human-readable description.
    pub description: String,

    /// Icon identifier for the dashboard.
    pub icon: String,

    /// Absolute expiry timestamp: creation time + 1 hour.
    #[ts(as = "String")]
    pub ttl: DateTime<Utc>,
}

impl Notification {
    /// Synthesizes a notification from an inbound transport event.
    pub fn from_event(event: NotifyEvent, now: DateTime<Utc>) -> Self {
        Notification {
            id: Uuid::new_v4().to_string(),
            time: now,
            event: Some(event.event),
            bridge: event.bridge,
            kind: event.data.kind,
            title: event.data.title,
            description: event.data.description,
            icon: event.data.icon,
            ttl: now + notification_ttl(),
        }
    }

    /// Synthesizes a notification from a local draft.
    pub fn from_draft(draft: NotificationDraft, now: DateTime<Utc>) -> Self {
        Notification {
            id: Uuid::new_v4().to_string(),
            time: now,
            event: draft.event,
            bridge: draft.bridge,
            kind: draft.kind,
            title: draft.title,
            description: draft.description,
            icon: draft.icon,
            ttl: now + notification_ttl(),
        }
    }

    /// Whether the TTL has passed relative to `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.ttl <= now
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_from_event_synthesizes_identity_and_ttl() {
        let event = NotifyEvent {
            event: "accessory_change".to_string(),
            bridge: Some("b1".to_string()),
            data: NotifyData {
                kind: "info".to_string(),
                title: "Light on".to_string(),
                description: "Living room light switched on".to_string(),
                icon: "lightbulb".to_string(),
            },
        };

        let now = fixed_now();
        let notification = Notification::from_event(event, now);

        assert!(!notification.id.is_empty());
        assert_eq!(notification.time, now);
        assert_eq!(notification.ttl, now + Duration::hours(1));
        assert_eq!(notification.event.as_deref(), Some("accessory_change"));
        assert_eq!(notification.bridge.as_deref(), Some("b1"));
        assert_eq!(notification.kind, "info");
        assert_eq!(notification.title, "Light on");
    }

    #[test]
    fn test_from_draft_synthesizes_identity_and_ttl() {
        let draft = NotificationDraft {
            title: "Plugin updated".to_string(),
            kind: "success".to_string(),
            ..NotificationDraft::default()
        };

        let now = fixed_now();
        let notification = Notification::from_draft(draft, now);

        assert!(!notification.id.is_empty());
        assert_eq!(notification.time, now);
        assert_eq!(notification.ttl, now + Duration::hours(1));
        assert_eq!(notification.event, None);
        assert_eq!(notification.title, "Plugin updated");
    }

    #[test]
    fn test_ids_are_unique() {
        let now = fixed_now();
        let a = Notification::from_draft(NotificationDraft::default(), now);
        let b = Notification::from_draft(NotificationDraft::default(), now);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_expiry_is_relative_to_now() {
        let now = fixed_now();
        let notification = Notification::from_draft(NotificationDraft::default(), now);

        assert!(!notification.is_expired(now));
        assert!(!notification.is_expired(now + Duration::minutes(59)));
        assert!(notification.is_expired(now + Duration::hours(1)));
        assert!(notification.is_expired(now + Duration::hours(2)));
    }

    #[test]
    fn test_wire_field_names() {
        let json = r#"{"event":"bridge_stopped","bridge":"b1","data":{"type":"error","title":"Stopped","description":"","icon":"alert"}}"#;
        let event: NotifyEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.data.kind, "error");

        let notification = Notification::from_event(event, fixed_now());
        let value = serde_json::to_value(&notification).unwrap();
        assert_eq!(value["type"], "error");
        assert!(value.get("kind").is_none());
    }
}
