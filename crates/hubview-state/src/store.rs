//! # The Client State Container
//!
//! The single mutable state tree of the dashboard, the dispatcher that
//! applies [`Event`]s to it, and the latest-notification auto-clear timer.
//!
//! ## Dispatch Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     StateStore::dispatch(event)                         │
//! │                                                                         │
//! │  1. Lock the tree (callers serialize dispatches; mutations never       │
//! │     interleave)                                                         │
//! │  2. Match the event exhaustively and apply the mutation                 │
//! │     • all handlers are total and synchronous                            │
//! │     • SessionSet decodes BEFORE mutating: a bad token changes nothing  │
//! │  3. Capture the persisted subset                                        │
//! │  4. Unlock, hand the snapshot to the sink                               │
//! │                                                                         │
//! │  The only asynchronous element is the 10-second auto-clear task for    │
//! │  the latest-notification slot.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The One Correctness-Sensitive Invariant
//! Every path that replaces or clears the latest-notification slot first
//! cancels any pending timer, and a timer only ever clears the slot it was
//! started for. Without that, a stale timer could clear a slot that has
//! since been overwritten by a newer notification. Cancellation is enforced
//! two ways: the previous task is aborted on supersede, and each slot
//! carries a generation number the timer re-checks before clearing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::AbortHandle;
use tracing::debug;

use hubview_core::session::decode_token;
use hubview_core::{
    format::format_bytes, MetricHistory, MonitorData, Notification, User, MAX_LOG_LINES,
    LATEST_AUTO_CLEAR_SECS,
};

use crate::error::StateResult;
use crate::event::Event;
use crate::sink::{MemorySink, PersistedState, SnapshotSink};

// =============================================================================
// Derived Stat Slots
// =============================================================================

/// Derived CPU stats, recomputed on every monitoring tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuStats {
    /// Percentage in use (`None` before the first tick).
    pub used: Option<i64>,

    /// Percentage available.
    pub available: Option<i64>,

    /// 20-slot sliding window of usage percentages.
    pub history: MetricHistory,
}

/// Derived memory stats, recomputed on every monitoring tick.
///
/// `total` and `used` hold pre-formatted sizes (`"8.0 GB"`); the dashboard
/// renders them verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    /// Load percentage (`None` before the first tick).
    pub load: Option<i64>,

    /// Formatted total memory.
    pub total: Option<String>,

    /// Formatted used memory.
    pub used: Option<String>,

    /// 20-slot sliding window of load percentages.
    pub history: MetricHistory,
}

// =============================================================================
// Latest-Notification Slot
// =============================================================================

/// A cancellable handle to the auto-clear timer task.
#[derive(Debug)]
pub struct TimerHandle {
    handle: AbortHandle,
}

impl TimerHandle {
    /// Cancels the pending timer. Idempotent.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

/// The single "most recent notification" slot.
///
/// At most one is outstanding; it is superseded (timer cancelled, slot
/// replaced) whenever a new notification arrives, and cleared by explicit
/// dismissal or by its timer firing.
#[derive(Debug)]
pub struct LatestSlot {
    /// The notification on display.
    pub notification: Notification,

    /// Identifies which push installed this slot; the timer re-checks it
    /// before clearing so a stale timer can never clear a newer slot.
    generation: u64,

    /// The pending auto-clear timer.
    timer: TimerHandle,
}

// =============================================================================
// The State Tree
// =============================================================================

/// The full client state tree.
///
/// Owned exclusively by one [`StateStore`] for the lifetime of the page
/// session. Fields are public for read access through
/// [`StateStore::with_state`]; mutations go through
/// [`StateStore::dispatch`] only.
#[derive(Debug, Default)]
pub struct ClientState {
    /// Rolling log lines, oldest first, capped at
    /// [`MAX_LOG_LINES`](hubview_core::MAX_LOG_LINES).
    pub log: Vec<String>,

    /// Display-ready bridge summaries, rebuilt each monitoring tick.
    pub bridges: Vec<hubview_core::BridgeSummary>,

    /// Derived CPU stats.
    pub cpu: CpuStats,

    /// Derived memory stats.
    pub memory: MemoryStats,

    /// Controller heap usage in bytes, stored verbatim from the last tick.
    pub heap: u64,

    /// Last temperature reading, if the sensor reported one.
    pub temp: Option<f64>,

    /// Raw session token ("" when anonymous).
    pub session: String,

    /// User derived from the session token.
    pub user: User,

    /// Whether authentication is enabled on the controller.
    pub auth: bool,

    /// Notification list, newest first.
    pub notifications: Vec<Notification>,

    /// Opaque last-known snapshot payloads, keyed by external id.
    pub snapshots: HashMap<String, Value>,

    /// Opaque streaming payloads, keyed by external id.
    pub streaming: HashMap<String, Value>,

    /// The latest-notification slot, if one is on display.
    pub latest: Option<LatestSlot>,

    /// Navigation-drawer open/closed flag.
    pub navigation: bool,

    /// The accessory currently open in the UI, verbatim.
    pub accessory: Option<Value>,

    /// The room currently open in the UI, verbatim.
    pub room: Option<Value>,

    /// Theme preference.
    pub theme: Option<i64>,

    /// Monotonic counter for latest-slot generations.
    latest_generation: u64,
}

impl ClientState {
    /// An empty tree (pre-rehydration defaults).
    pub fn new() -> Self {
        ClientState::default()
    }

    fn apply_log_append(&mut self, line: String) {
        self.log.push(line);
        self.truncate_log();
    }

    fn apply_log_replace(&mut self, lines: Vec<String>) {
        self.log = lines;
        // The controller sends the current line as both history and a live
        // append; dropping the first history element avoids the duplicate.
        if !self.log.is_empty() {
            self.log.remove(0);
        }
        self.truncate_log();
    }

    fn truncate_log(&mut self) {
        let excess = self.log.len().saturating_sub(MAX_LOG_LINES);
        if excess > 0 {
            self.log.drain(..excess);
        }
    }

    fn apply_monitor_tick(&mut self, data: &MonitorData) {
        self.bridges = data.bridge_summaries();
        self.temp = data.temperature();

        self.cpu.used = Some(data.cpu_used());
        self.cpu.available = Some(data.cpu_available());

        self.memory.load = Some(data.memory_load());
        self.memory.total = Some(format_bytes(data.memory.total.unwrap_or(0)));
        self.memory.used = Some(format_bytes(data.memory.active.unwrap_or(0)));

        self.cpu.history.advance(data.cpu_used() as f64);
        self.memory.history.advance(data.memory_load() as f64);

        self.heap = data.heap;
    }

    fn apply_notification_dismiss(&mut self, id: &str) {
        // Records without an id are unaddressable; a dismissal sweeps them
        // out along with the matching record.
        self.notifications
            .retain(|n| !n.id.is_empty() && n.id != id);
    }

    fn apply_notification_dismiss_expired(&mut self, now: DateTime<Utc>) {
        self.notifications.retain(|n| !n.is_expired(now));
    }
}

// =============================================================================
// State Store
// =============================================================================

/// The state container handle.
///
/// ## Thread Safety
/// The tree sits behind `Arc<Mutex<_>>` so the auto-clear timer task can
/// reach it, but the dispatch contract is single-threaded: callers must
/// serialize dispatches, and every mutation runs to completion without
/// interleaving.
///
/// ## Construction
/// Explicitly constructed and passed by reference - there is no hidden
/// process-wide global. The snapshot sink is injected and swappable.
pub struct StateStore {
    inner: Arc<Mutex<ClientState>>,
    sink: Arc<dyn SnapshotSink>,
}

impl StateStore {
    /// Creates a store backed by the given sink, rehydrating the persisted
    /// subset (if any) to seed the initial tree.
    pub fn new(sink: Arc<dyn SnapshotSink>) -> StateResult<Self> {
        let mut state = ClientState::new();

        if let Some(snapshot) = sink.load()? {
            debug!("rehydrating persisted state");
            snapshot.restore_into(&mut state);
        }

        Ok(StateStore {
            inner: Arc::new(Mutex::new(state)),
            sink,
        })
    }

    /// Creates a store with an in-memory sink (headless and test use).
    pub fn in_memory() -> Self {
        StateStore {
            inner: Arc::new(Mutex::new(ClientState::new())),
            sink: Arc::new(MemorySink::new()),
        }
    }

    /// Applies one event to the tree, then persists the snapshot subset.
    ///
    /// ## Failure Modes
    /// - [`StateError::SessionDecode`](crate::StateError::SessionDecode):
    ///   the SESSION:SET token was malformed; the tree is unchanged and
    ///   nothing was persisted.
    /// - [`StateError::Sink`](crate::StateError::Sink): the mutation was
    ///   applied but persisting the snapshot failed.
    ///
    /// Every other event is a total function of (tree, payload).
    pub fn dispatch(&self, event: Event) -> StateResult<()> {
        debug!(event = event.name(), "dispatch");

        let snapshot = {
            let mut state = self.inner.lock().expect("state mutex poisoned");

            match event {
                Event::LogAppend(line) => state.apply_log_append(line),
                Event::LogReplace(lines) => state.apply_log_replace(lines),
                Event::MonitorTick(data) => state.apply_monitor_tick(&data),
                Event::NotifyPush(notify) => {
                    let notification = Notification::from_event(notify, Utc::now());
                    self.install_latest(&mut state, notification.clone());
                    state.notifications.insert(0, notification);
                }
                Event::SnapshotUpdate { id, data } => {
                    state.snapshots.insert(id, data);
                }
                Event::AccessoryChange(data) => state.accessory = Some(data),
                Event::RoomChange(data) => state.room = Some(data),
                Event::SessionSet(token) => {
                    // Decode first: a malformed token must not change the tree
                    let user = decode_token(&token)?;
                    state.session = token;
                    state.user = user;
                }
                Event::SessionDisable => {
                    state.session.clear();
                    state.user = User::auth_disabled();
                }
                Event::NotificationAdd(draft) => {
                    let notification = Notification::from_draft(draft, Utc::now());
                    state.notifications.insert(0, notification);
                }
                Event::NotificationDismiss(id) => state.apply_notification_dismiss(&id),
                Event::NotificationDismissLatest => Self::clear_latest(&mut state),
                Event::NotificationDismissAll => state.notifications.clear(),
                Event::NotificationDismissExpired => {
                    state.apply_notification_dismiss_expired(Utc::now())
                }
                Event::NavigationSet(open) => state.navigation = open,
                Event::AuthSet(value) => state.auth = value == "enabled",
                Event::ThemeSet(theme) => state.theme = Some(theme),
                Event::StreamingSet { id, data } => {
                    state.streaming.insert(id, data);
                }
            }

            PersistedState::capture(&state)
        };

        self.sink.persist(&snapshot)?;
        Ok(())
    }

    /// The theme preference (pure projection, no side effect).
    pub fn theme(&self) -> Option<i64> {
        self.inner.lock().expect("state mutex poisoned").theme
    }

    /// The notification in the latest slot, if one is on display.
    pub fn latest_notification(&self) -> Option<Notification> {
        self.inner
            .lock()
            .expect("state mutex poisoned")
            .latest
            .as_ref()
            .map(|slot| slot.notification.clone())
    }

    /// Executes a function with read access to the tree.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let open = store.with_state(|state| state.navigation);
    /// ```
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ClientState) -> R,
    {
        let state = self.inner.lock().expect("state mutex poisoned");
        f(&state)
    }

    /// Installs a new latest slot, cancelling any pending timer first and
    /// starting a fresh auto-clear task.
    ///
    /// Must run inside a tokio runtime (the dispatcher always does - events
    /// arrive from the async transport).
    fn install_latest(&self, state: &mut ClientState, notification: Notification) {
        if let Some(previous) = state.latest.take() {
            previous.timer.cancel();
        }

        state.latest_generation = state.latest_generation.wrapping_add(1);
        let generation = state.latest_generation;

        let tree = Arc::downgrade(&self.inner);
        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(LATEST_AUTO_CLEAR_SECS)).await;

            let Some(tree) = tree.upgrade() else {
                return;
            };

            let mut state = tree.lock().expect("state mutex poisoned");
            // Stale-fire guard: clear only the slot this timer was started
            // for. Abort handles cover the common case; the generation check
            // covers a timer that was already past its sleep when superseded.
            if state.latest.as_ref().map(|slot| slot.generation) == Some(generation) {
                state.latest = None;
            }
        });

        state.latest = Some(LatestSlot {
            notification,
            generation,
            timer: TimerHandle {
                handle: task.abort_handle(),
            },
        });
    }

    /// Cancels the pending timer and clears the latest slot.
    fn clear_latest(state: &mut ClientState) {
        if let Some(slot) = state.latest.take() {
            slot.timer.cancel();
        }
    }

    /// Test hook: mutate the tree directly (e.g. to backdate TTLs).
    #[cfg(test)]
    fn with_state_mut<F>(&self, f: F)
    where
        F: FnOnce(&mut ClientState),
    {
        let mut state = self.inner.lock().expect("state mutex poisoned");
        f(&mut state);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
