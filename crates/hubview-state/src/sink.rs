//! # Snapshot Persistence
//!
//! The swappable persistence collaborator. After every successful mutation
//! the store captures a fixed subset of the tree and hands it to a
//! [`SnapshotSink`]; on startup the same subset is rehydrated to seed the
//! initial tree.
//!
//! ## Persisted Subset
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Persisted                         Not persisted                        │
//! │  ──────────────────────────────    ─────────────────────────────        │
//! │  bridges, cpu, memory, temp        log (streamed fresh on connect)      │
//! │  session, user                     heap (refreshed every tick)          │
//! │  notifications                     latest slot (transient + timer)      │
//! │  snapshots, streaming              accessory/room slots (route state)   │
//! │  navigation                        auth flag, theme (theme is stored    │
//! │                                    by the controller per user)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything lives under the single namespaced key [`STATE_KEY`] so the
//! backing store stays a plain key-value document.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use hubview_core::{BridgeSummary, Notification, User};

use crate::error::SinkError;
use crate::store::{ClientState, CpuStats, MemoryStats};

/// The fixed key the snapshot is stored under.
pub const STATE_KEY: &str = "hubview:state";

// =============================================================================
// Persisted Subset
// =============================================================================

/// The subset of the state tree that survives a page reload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    /// Display-ready bridge summaries.
    pub bridges: Vec<BridgeSummary>,

    /// Derived CPU stats and history window.
    pub cpu: CpuStats,

    /// Derived memory stats and history window.
    pub memory: MemoryStats,

    /// Last temperature reading.
    pub temp: Option<f64>,

    /// Raw session token.
    pub session: String,

    /// User derived from the session token.
    pub user: User,

    /// Notification list, newest first.
    pub notifications: Vec<Notification>,

    /// Opaque last-known snapshot payloads, keyed by external id.
    pub snapshots: HashMap<String, Value>,

    /// Opaque streaming payloads, keyed by external id.
    pub streaming: HashMap<String, Value>,

    /// Navigation-drawer open/closed flag.
    pub navigation: bool,
}

impl PersistedState {
    /// Captures the persisted subset from the tree.
    pub fn capture(state: &ClientState) -> Self {
        PersistedState {
            bridges: state.bridges.clone(),
            cpu: state.cpu.clone(),
            memory: state.memory.clone(),
            temp: state.temp,
            session: state.session.clone(),
            user: state.user.clone(),
            notifications: state.notifications.clone(),
            snapshots: state.snapshots.clone(),
            streaming: state.streaming.clone(),
            navigation: state.navigation,
        }
    }

    /// Seeds a tree with this snapshot (rehydration at startup).
    pub fn restore_into(self, state: &mut ClientState) {
        state.bridges = self.bridges;
        state.cpu = self.cpu;
        state.memory = self.memory;
        state.temp = self.temp;
        state.session = self.session;
        state.user = self.user;
        state.notifications = self.notifications;
        state.snapshots = self.snapshots;
        state.streaming = self.streaming;
        state.navigation = self.navigation;
    }
}

// =============================================================================
// Sink Trait
// =============================================================================

/// A durable key-value collaborator addressed by one fixed key.
///
/// Implementations must be safe to call from the dispatch path: `persist`
/// runs after every mutation. The trait is deliberately synchronous - the
/// single-threaded dispatch contract means a mutation and its persistence
/// never interleave.
pub trait SnapshotSink: Send + Sync {
    /// Stores the snapshot, replacing any previous one.
    fn persist(&self, snapshot: &PersistedState) -> Result<(), SinkError>;

    /// Retrieves the previously stored snapshot, if any.
    fn load(&self) -> Result<Option<PersistedState>, SinkError>;
}

// =============================================================================
// JSON File Sink
// =============================================================================

/// The snapshot document as written to disk: one fixed key, one value.
#[derive(Serialize, Deserialize)]
struct Document {
    #[serde(rename = "hubview:state")]
    state: PersistedState,
}

/// Stores the snapshot as a JSON document on disk.
///
/// ## Atomicity
/// Writes go to a sibling `.tmp` file first and are renamed over the real
/// file, so a crash mid-write never leaves a truncated snapshot behind.
#[derive(Debug)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Creates a sink backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSink { path: path.into() }
    }

    /// Creates a sink at the platform-default location.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.hubview.dashboard/state.json`
    /// - **Windows**: `%APPDATA%\hubview\dashboard\state.json`
    /// - **Linux**: `~/.local/share/hubview-dashboard/state.json`
    ///
    /// ## Development Override
    /// Set `HUBVIEW_STATE_PATH` to use a custom path.
    pub fn at_default_path() -> Result<Self, SinkError> {
        if let Ok(path) = std::env::var("HUBVIEW_STATE_PATH") {
            return Ok(JsonFileSink::new(path));
        }

        let dirs = directories::ProjectDirs::from("com", "hubview", "dashboard")
            .ok_or(SinkError::NoDataDir)?;

        Ok(JsonFileSink::new(dirs.data_dir().join("state.json")))
    }

    /// The file this sink writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSink for JsonFileSink {
    fn persist(&self, snapshot: &PersistedState) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let document = Document {
            state: snapshot.clone(),
        };
        let bytes = serde_json::to_vec(&document)?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "snapshot persisted");
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedState>, SinkError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&self.path)?;
        let document: Document = serde_json::from_slice(&bytes)?;

        Ok(Some(document.state))
    }
}

// =============================================================================
// In-Memory Sink
// =============================================================================

/// A sink that keeps the snapshot in memory.
///
/// Used by tests and headless embedders that want the state container
/// without durable storage.
#[derive(Debug, Default)]
pub struct MemorySink {
    inner: Mutex<MemorySinkInner>,
}

#[derive(Debug, Default)]
struct MemorySinkInner {
    snapshot: Option<PersistedState>,
    persists: usize,
}

impl MemorySink {
    /// Creates an empty in-memory sink.
    pub fn new() -> Self {
        MemorySink::default()
    }

    /// Creates a sink pre-seeded with a snapshot (for rehydration tests).
    pub fn seeded(snapshot: PersistedState) -> Self {
        MemorySink {
            inner: Mutex::new(MemorySinkInner {
                snapshot: Some(snapshot),
                persists: 0,
            }),
        }
    }

    /// The last persisted snapshot, if any.
    pub fn last_snapshot(&self) -> Option<PersistedState> {
        self.inner
            .lock()
            .expect("memory sink mutex poisoned")
            .snapshot
            .clone()
    }

    /// How many times `persist` has been invoked.
    pub fn persist_count(&self) -> usize {
        self.inner
            .lock()
            .expect("memory sink mutex poisoned")
            .persists
    }
}

impl SnapshotSink for MemorySink {
    fn persist(&self, snapshot: &PersistedState) -> Result<(), SinkError> {
        let mut inner = self.inner.lock().expect("memory sink mutex poisoned");
        inner.snapshot = Some(snapshot.clone());
        inner.persists += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedState>, SinkError> {
        Ok(self
            .inner
            .lock()
            .expect("memory sink mutex poisoned")
            .snapshot
            .clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hubview_core::{Notification, NotificationDraft};

    fn sample_snapshot() -> PersistedState {
        let mut snapshot = PersistedState {
            session: "token".to_string(),
            navigation: true,
            temp: Some(45.0),
            ..PersistedState::default()
        };
        snapshot.notifications.push(Notification::from_draft(
            NotificationDraft {
                title: "Hello".to_string(),
                ..NotificationDraft::default()
            },
            Utc::now(),
        ));
        snapshot
            .snapshots
            .insert("b1".to_string(), serde_json::json!({"state": "on"}));
        snapshot
    }

    #[test]
    fn test_file_sink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(dir.path().join("state.json"));

        assert!(sink.load().unwrap().is_none());

        let snapshot = sample_snapshot();
        sink.persist(&snapshot).unwrap();

        let restored = sink.load().unwrap().unwrap();
        assert_eq!(restored.session, "token");
        assert!(restored.navigation);
        assert_eq!(restored.notifications.len(), 1);
        assert_eq!(restored.notifications[0].title, "Hello");
        assert_eq!(restored.snapshots["b1"]["state"], "on");
    }

    #[test]
    fn test_file_sink_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(dir.path().join("nested/deeper/state.json"));

        sink.persist(&sample_snapshot()).unwrap();
        assert!(sink.path().exists());
    }

    #[test]
    fn test_file_sink_uses_the_namespaced_key() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(dir.path().join("state.json"));
        sink.persist(&sample_snapshot()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(sink.path()).unwrap()).unwrap();
        assert!(raw.get(STATE_KEY).is_some());
    }

    #[test]
    fn test_file_sink_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(dir.path().join("state.json"));

        sink.persist(&sample_snapshot()).unwrap();

        let mut second = sample_snapshot();
        second.session = "other".to_string();
        sink.persist(&second).unwrap();

        assert_eq!(sink.load().unwrap().unwrap().session, "other");
    }

    #[test]
    fn test_memory_sink_counts_persists() {
        let sink = MemorySink::new();
        assert_eq!(sink.persist_count(), 0);
        assert!(sink.last_snapshot().is_none());

        sink.persist(&sample_snapshot()).unwrap();
        sink.persist(&sample_snapshot()).unwrap();

        assert_eq!(sink.persist_count(), 2);
        assert!(sink.last_snapshot().is_some());
    }
}
