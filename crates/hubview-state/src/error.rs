//! # State Container Error Types
//!
//! Error types for dispatch and persistence.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SessionDecodeError (hubview-core)      io/serde errors (std)          │
//! │       │                                      │                          │
//! │       │                                      ▼                          │
//! │       │                                 SinkError (this module)         │
//! │       │                                      │                          │
//! │       └──────────────┬───────────────────────┘                          │
//! │                      ▼                                                  │
//! │                 StateError ← what StateStore::dispatch returns          │
//! │                                                                         │
//! │  Every other mutation handler is total: dispatch only fails on a       │
//! │  malformed session token or a persistence failure.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use hubview_core::SessionDecodeError;

/// Snapshot persistence errors.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Reading or writing the backing store failed.
    ///
    /// ## When This Occurs
    /// - Snapshot file or its parent directory cannot be created
    /// - File permissions issue
    /// - Disk full
    #[error("snapshot storage failed: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be serialized, or a stored snapshot could
    /// not be deserialized.
    ///
    /// ## When This Occurs
    /// - Stored snapshot was written by an incompatible version
    /// - Stored snapshot was corrupted on disk
    #[error("snapshot serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No platform data directory could be determined for the default
    /// snapshot path.
    #[error("could not determine a data directory for the snapshot file")]
    NoDataDir,
}

/// Errors returned from [`StateStore::dispatch`](crate::StateStore::dispatch).
#[derive(Debug, Error)]
pub enum StateError {
    /// The SESSION:SET token could not be decoded. The state tree is left
    /// unchanged.
    #[error(transparent)]
    SessionDecode(#[from] SessionDecodeError),

    /// The mutation was applied but the snapshot sink failed afterwards.
    /// The in-memory tree holds the new state; only persistence is behind.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Convenience type alias for Results with StateError.
pub type StateResult<T> = Result<T, StateError>;
