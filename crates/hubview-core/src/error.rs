//! # Error Types
//!
//! Domain error types for hubview-core.
//!
//! This crate has almost no error taxonomy by design: formatters, the
//! accessory registry, and telemetry projections are all total functions.
//! The single failure point is session-token decoding, which can fail on
//! malformed base64 or a malformed user record.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages
//! 3. Errors are enum variants, never String
//! 4. Unknown accessory types are NOT errors - `classify` returns `None`

use thiserror::Error;

// =============================================================================
// Session Decode Error
// =============================================================================

/// Failure to decode a session token into a user record.
///
/// Session tokens are base64-encoded UTF-8 JSON objects with fields
/// `{id, name, username, permissions}`. Any other encoding is a fatal
/// input-contract violation: the error is signalled to the dispatcher and
/// the state tree is left unchanged.
#[derive(Debug, Error)]
pub enum SessionDecodeError {
    /// The token is not valid base64.
    #[error("session token is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The decoded bytes are not a valid JSON user record.
    #[error("session token payload is not a valid user record: {0}")]
    Payload(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with SessionDecodeError.
pub type CoreResult<T> = Result<T, SessionDecodeError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err: SessionDecodeError = serde_json::from_str::<i32>("not json")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("session token payload"));
    }
}
