//! # Session Identity
//!
//! Session token decoding and the permission model.
//!
//! ## Token Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Token Flow                               │
//! │                                                                         │
//! │  Bridge controller issues token                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  base64("{\"id\":1,\"name\":\"...\",\"username\":\"...\",               │
//! │          \"permissions\":{...}}")                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  decode_token() ──► User { id, name, username, permissions }           │
//! │       │                                                                 │
//! │       ├── empty token ──► User::anonymous() (no permissions)           │
//! │       └── malformed ────► SessionDecodeError (state left unchanged)    │
//! │                                                                         │
//! │  Auth disabled on the controller ──► User::auth_disabled()             │
//! │  (hardcoded bypass identity, every permission except `users`)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;

// =============================================================================
// Permissions
// =============================================================================

/// The closed set of dashboard permission flags.
///
/// The wire format is an object mapping permission names to booleans;
/// any flag missing from the token defaults to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    /// View and control accessories.
    #[serde(default)]
    pub accessories: bool,

    /// Manage bridge instances.
    #[serde(default)]
    pub bridges: bool,

    /// Edit bridge and plugin configuration.
    #[serde(default)]
    pub config: bool,

    /// Controller-level operations (service restarts, cache resets).
    #[serde(default)]
    pub controller: bool,

    /// Install, update, and remove plugins.
    #[serde(default)]
    pub plugins: bool,

    /// Reboot the host device.
    #[serde(default)]
    pub reboot: bool,

    /// Open the web terminal.
    #[serde(default)]
    pub terminal: bool,

    /// Manage dashboard user accounts.
    #[serde(default)]
    pub users: bool,
}

impl Permissions {
    /// No permissions at all (anonymous user).
    pub const fn none() -> Self {
        Permissions {
            accessories: false,
            bridges: false,
            config: false,
            controller: false,
            plugins: false,
            reboot: false,
            terminal: false,
            users: false,
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// The user record derived from a session token.
///
/// ## Invariant
/// An empty or absent token always maps to [`User::anonymous`]: no identity,
/// no permissions. The dashboard treats `permissions` as the single source
/// of truth for what to render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Numeric account id assigned by the bridge controller.
    #[serde(default)]
    pub id: Option<i64>,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Login name.
    #[serde(default)]
    pub username: Option<String>,

    /// Permission flags for this user.
    #[serde(default)]
    pub permissions: Permissions,
}

impl User {
    /// The anonymous user: no identity, no permissions.
    pub fn anonymous() -> Self {
        User::default()
    }

    /// The bypass identity installed when authentication is disabled on
    /// the bridge controller.
    ///
    /// Grants every permission except `users`: with auth off there are no
    /// accounts to manage, and exposing account management to an
    /// unauthenticated session would be a foot-gun.
    pub fn auth_disabled() -> Self {
        User {
            id: Some(1),
            name: Some("unavailable".to_string()),
            username: Some("unavailable".to_string()),
            permissions: Permissions {
                accessories: true,
                bridges: true,
                config: true,
                controller: true,
                plugins: true,
                reboot: true,
                terminal: true,
                users: false,
            },
        }
    }
}

// =============================================================================
// Token Decoding
// =============================================================================

/// Decodes a session token into a [`User`].
///
/// ## Behavior
/// - Empty token: returns [`User::anonymous`] (never an error)
/// - Valid base64 JSON: returns the decoded user; a missing `permissions`
///   object defaults to all-false
/// - Anything else: [`SessionDecodeError`](crate::SessionDecodeError)
///
/// ## Example
/// ```rust
/// use hubview_core::session::decode_token;
///
/// let user = decode_token("").unwrap();
/// assert!(!user.permissions.accessories);
///
/// // base64 of {"id":4,"name":"Jo","username":"jo","permissions":{"bridges":true}}
/// let token = "eyJpZCI6NCwibmFtZSI6IkpvIiwidXNlcm5hbWUiOiJqbyIsInBlcm1pc3Npb25zIjp7ImJyaWRnZXMiOnRydWV9fQ==";
/// let user = decode_token(token).unwrap();
/// assert_eq!(user.id, Some(4));
/// assert!(user.permissions.bridges);
/// ```
pub fn decode_token(token: &str) -> CoreResult<User> {
    if token.is_empty() {
        return Ok(User::anonymous());
    }

    let bytes = BASE64.decode(token)?;
    let user: User = serde_json::from_slice(&bytes)?;

    Ok(user)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionDecodeError;

    fn encode_token(json: &str) -> String {
        BASE64.encode(json.as_bytes())
    }

    #[test]
    fn test_empty_token_is_anonymous() {
        let user = decode_token("").unwrap();
        assert_eq!(user, User::anonymous());
        assert_eq!(user.permissions, Permissions::none());
    }

    #[test]
    fn test_decode_full_record() {
        let token = encode_token(
            r#"{"id":7,"name":"Pat","username":"pat","permissions":{"accessories":true,"terminal":true}}"#,
        );

        let user = decode_token(&token).unwrap();
        assert_eq!(user.id, Some(7));
        assert_eq!(user.name.as_deref(), Some("Pat"));
        assert_eq!(user.username.as_deref(), Some("pat"));
        assert!(user.permissions.accessories);
        assert!(user.permissions.terminal);
        assert!(!user.permissions.reboot);
    }

    #[test]
    fn test_missing_permissions_defaults_to_none() {
        let token = encode_token(r#"{"id":2,"name":"Kim","username":"kim"}"#);

        let user = decode_token(&token).unwrap();
        assert_eq!(user.permissions, Permissions::none());
    }

    #[test]
    fn test_invalid_base64_is_an_encoding_error() {
        let err = decode_token("not-base64!!!").unwrap_err();
        assert!(matches!(err, SessionDecodeError::Encoding(_)));
    }

    #[test]
    fn test_invalid_json_is_a_payload_error() {
        let token = encode_token("this is not json");
        let err = decode_token(&token).unwrap_err();
        assert!(matches!(err, SessionDecodeError::Payload(_)));
    }

    #[test]
    fn test_auth_disabled_permission_set() {
        let user = User::auth_disabled();

        assert_eq!(user.id, Some(1));
        assert_eq!(user.name.as_deref(), Some("unavailable"));
        assert_eq!(user.username.as_deref(), Some("unavailable"));

        let p = user.permissions;
        assert!(p.accessories);
        assert!(p.bridges);
        assert!(p.config);
        assert!(p.controller);
        assert!(p.plugins);
        assert!(p.reboot);
        assert!(p.terminal);
        assert!(!p.users);
    }
}
