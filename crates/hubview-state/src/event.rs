//! # The Event Union
//!
//! The closed set of mutations the state container understands.
//!
//! ## Why an Enum?
//! The transport delivers string-keyed events; the container deliberately
//! does NOT dispatch on strings. Each mutation is an enum variant carrying
//! its own strongly-typed payload, and `dispatch` matches exhaustively -
//! adding a mutation without handling it is a compile error.
//!
//! ## Catalogue
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Event                        Effect on the tree                        │
//! │  ─────────────────────────    ─────────────────────────────────────     │
//! │  LogAppend(line)              append; keep the newest 5000 lines        │
//! │  LogReplace(lines)            replace; drop first, keep newest 5000     │
//! │  MonitorTick(data)            rebuild summaries, derived %, histories   │
//! │  NotifyPush(event)            synthesize record, reset latest slot      │
//! │  SnapshotUpdate{id, data}     snapshots[id] = data (verbatim)           │
//! │  AccessoryChange(data)        current accessory slot = data             │
//! │  RoomChange(data)             current room slot = data                  │
//! │  SessionSet(token)            decode token, store token + user          │
//! │  SessionDisable               clear token, install bypass identity      │
//! │  NotificationAdd(draft)       synthesize id/time/ttl, prepend           │
//! │  NotificationDismiss(id)      remove matching (non-empty) id            │
//! │  NotificationDismissLatest    cancel timer, clear the latest slot       │
//! │  NotificationDismissAll       clear the whole list                      │
//! │  NotificationDismissExpired   keep only future-TTL records              │
//! │  NavigationSet(open)          drawer open/closed flag                   │
//! │  AuthSet(value)               auth = (value == "enabled")               │
//! │  ThemeSet(theme)              theme preference                          │
//! │  StreamingSet{id, data}       streaming[id] = data (verbatim)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::Value;

use hubview_core::{MonitorData, NotificationDraft, NotifyEvent};

/// A state mutation. See the module docs for the full catalogue.
///
/// Every variant is a total, synchronous transform of (tree, payload)
/// except [`Event::SessionSet`], whose decode failure is signalled without
/// mutating the tree.
#[derive(Debug, Clone)]
pub enum Event {
    /// Append one log line, truncating to the newest
    /// [`MAX_LOG_LINES`](hubview_core::MAX_LOG_LINES) entries.
    LogAppend(String),

    /// Replace the whole log. The first element of the replacement is
    /// dropped, then the newest 5000 are kept.
    LogReplace(Vec<String>),

    /// A monitoring tick: rebuild bridge summaries, derived CPU/memory
    /// values, both sliding-window histories, and the stored heap usage.
    MonitorTick(MonitorData),

    /// An inbound notification event: synthesize a record, prepend it, and
    /// reset the latest-notification slot and its auto-clear timer.
    NotifyPush(NotifyEvent),

    /// Upsert an opaque accessory snapshot payload, last write wins.
    SnapshotUpdate {
        /// External identifier (bridge or accessory id).
        id: String,
        /// Opaque last-known payload, stored verbatim.
        data: Value,
    },

    /// Replace the single "current accessory" slot verbatim.
    AccessoryChange(Value),

    /// Replace the single "current room" slot verbatim.
    RoomChange(Value),

    /// Decode the given token and store both the raw token and the derived
    /// user. An empty token resets to the anonymous user.
    SessionSet(String),

    /// Clear the token and install the hardcoded "auth disabled" bypass
    /// identity.
    SessionDisable,

    /// Add a locally-created notification draft to the list.
    NotificationAdd(NotificationDraft),

    /// Remove the notification with the given (non-empty) id.
    NotificationDismiss(String),

    /// Cancel the auto-clear timer and clear the latest slot.
    NotificationDismissLatest,

    /// Clear the entire notification list.
    NotificationDismissAll,

    /// Keep only notifications whose TTL is still in the future.
    NotificationDismissExpired,

    /// Store the navigation-drawer open/closed flag.
    NavigationSet(bool),

    /// Store the auth flag: true iff the value is the literal `"enabled"`.
    AuthSet(String),

    /// Store the theme preference.
    ThemeSet(i64),

    /// Upsert an opaque streaming payload, last write wins.
    StreamingSet {
        /// External identifier (bridge or accessory id).
        id: String,
        /// Opaque last-known payload, stored verbatim.
        data: Value,
    },
}

impl Event {
    /// A short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Event::LogAppend(_) => "log:append",
            Event::LogReplace(_) => "log:replace",
            Event::MonitorTick(_) => "monitor:tick",
            Event::NotifyPush(_) => "notify:push",
            Event::SnapshotUpdate { .. } => "snapshot:update",
            Event::AccessoryChange(_) => "accessory:change",
            Event::RoomChange(_) => "room:change",
            Event::SessionSet(_) => "session:set",
            Event::SessionDisable => "session:disable",
            Event::NotificationAdd(_) => "notification:add",
            Event::NotificationDismiss(_) => "notification:dismiss",
            Event::NotificationDismissLatest => "notification:dismiss-latest",
            Event::NotificationDismissAll => "notification:dismiss-all",
            Event::NotificationDismissExpired => "notification:dismiss-expired",
            Event::NavigationSet(_) => "navigation:set",
            Event::AuthSet(_) => "auth:set",
            Event::ThemeSet(_) => "theme:set",
            Event::StreamingSet { .. } => "streaming:set",
        }
    }
}
