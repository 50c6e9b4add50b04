//! # hubview-state: The Client State Container
//!
//! The single mutable state tree of the hubview dashboard client, mutated
//! by a closed set of events and mirrored to durable storage after every
//! change.
//!
//! ## Module Organization
//! ```text
//! hubview_state/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── event.rs        ◄─── The closed Event union
//! ├── store.rs        ◄─── ClientState tree + StateStore dispatch + timer
//! ├── sink.rs         ◄─── SnapshotSink trait, JSON file + memory sinks
//! └── error.rs        ◄─── StateError / SinkError
//! ```
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      State Container Data Flow                          │
//! │                                                                         │
//! │  Transport collaborator                                                 │
//! │  (inbound telemetry/events) ──► Event ──► StateStore::dispatch          │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                                       ClientState tree                  │
//! │                                       (formatted, display-ready)        │
//! │                                              │                          │
//! │                         ┌────────────────────┼──────────────────┐       │
//! │                         ▼                    ▼                  ▼       │
//! │                  SnapshotSink        with_state(...)     theme()        │
//! │                  (persisted subset)  (dashboard reads)   (getter)       │
//! │                                                                         │
//! │  Startup: StateStore::new(sink) rehydrates the persisted subset         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Model
//! Single-threaded and cooperative: callers serialize dispatches, every
//! mutation runs to completion, and the only asynchronous element is the
//! 10-second auto-clear timer for the latest-notification slot (plus the
//! deferred component loaders, which live in hubview-core and never touch
//! the tree).
//!
//! ## Example
//! ```rust
//! use hubview_state::{Event, StateStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = StateStore::in_memory();
//!
//! store.dispatch(Event::ThemeSet(2)).unwrap();
//! store.dispatch(Event::NavigationSet(true)).unwrap();
//!
//! assert_eq!(store.theme(), Some(2));
//! assert!(store.with_state(|state| state.navigation));
//! # }
//! ```

pub mod error;
pub mod event;
pub mod sink;
pub mod store;

pub use error::{SinkError, StateError, StateResult};
pub use event::Event;
pub use sink::{JsonFileSink, MemorySink, PersistedState, SnapshotSink, STATE_KEY};
pub use store::{ClientState, CpuStats, LatestSlot, MemoryStats, StateStore, TimerHandle};
