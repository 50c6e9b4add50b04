//! # hubview-core: Pure Display Logic for the hubview Dashboard
//!
//! This crate is the **heart** of the hubview dashboard client. It contains
//! all display and session logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       hubview Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Browser Dashboard (frontend)                    │   │
//! │  │    Status UI ──► Log UI ──► Accessory UI ──► Notification UI   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ IPC / real-time transport              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 hubview-state (State Container)                 │   │
//! │  │    Event dispatch, latest-slot timer, snapshot sink             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ hubview-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐ │   │
//! │  │   │  format   │  │  session  │  │accessories │  │ telemetry │ │   │
//! │  │   │  bytes    │  │   User    │  │  classify  │  │  Monitor  │ │   │
//! │  │   │  uptime   │  │  decode   │  │  loaders   │  │  History  │ │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`accessories`] - Accessory type registry and deferred component loaders
//! - [`error`] - Session decode error type
//! - [`format`] - Human-readable byte sizes and durations
//! - [`notification`] - Notification records and TTL handling
//! - [`session`] - Session token decoding and permission sets
//! - [`telemetry`] - Bridge telemetry projections and metric histories
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network, file system, and wall-clock access is FORBIDDEN here
//! 3. **Explicit Clocks**: Constructors that need "now" take it as a parameter
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use hubview_core::accessories::{classify, ComponentKey};
//! use hubview_core::format::format_uptime;
//!
//! // Map a device kind to its UI component key
//! assert_eq!(classify("outlet"), Some(ComponentKey::SwitchAccessory));
//! assert_eq!(classify("thermostat"), None);
//!
//! // Uptimes are stored pre-formatted in the state tree
//! assert_eq!(format_uptime(65), "1m 5s");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod accessories;
pub mod error;
pub mod format;
pub mod notification;
pub mod session;
pub mod telemetry;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use hubview_core::User` instead of
// `use hubview_core::session::User`

pub use accessories::{classify, component_loaders, AccessoryModule, ComponentKey};
pub use error::{CoreResult, SessionDecodeError};
pub use notification::{Notification, NotificationDraft, NotifyData, NotifyEvent};
pub use session::{Permissions, User};
pub use telemetry::{
    BridgeSummary, BridgeTelemetry, CpuTelemetry, MemoryTelemetry, MetricHistory, MetricSample,
    MonitorData, TempTelemetry,
};

use chrono::Duration;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum log lines retained by the state container.
///
/// ## Why a cap?
/// The bridge controller streams log lines for as long as the page is open.
/// Keeping only the most recent lines bounds memory and keeps the persisted
/// snapshot small.
pub const MAX_LOG_LINES: usize = 5000;

/// Number of slots in each sliding-window metric history (CPU, memory).
///
/// The dashboard charts render a fixed 20-point window; every monitoring
/// tick shifts the window left by one and appends the newest sample.
pub const HISTORY_SLOTS: usize = 20;

/// How long a notification stays eligible for display before the expiry
/// sweep removes it.
pub fn notification_ttl() -> Duration {
    Duration::hours(1)
}

/// How long the latest-notification slot stays populated before the
/// auto-clear timer fires (seconds).
///
/// The timer itself lives in hubview-state; the constant lives here so the
/// contract is visible next to the notification types.
pub const LATEST_AUTO_CLEAR_SECS: u64 = 10;
