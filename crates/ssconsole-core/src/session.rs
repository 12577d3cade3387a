//! Client-held session snapshot.
//!
//! A [`Session`] starts empty, is filled in piecewise after login, and is
//! reset to its empty default on logout. Every field may legitimately be at
//! its default while post-login fetches are still in flight.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Identity of a security server as returned by `/security-servers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityServer {
    /// Encoded server identifier (`INSTANCE:CLASS:CODE:SERVER`).
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub instance_id: String,
    #[serde(default)]
    pub member_class: String,
    #[serde(default)]
    pub member_code: String,
    #[serde(default)]
    pub server_code: String,
    #[serde(default)]
    pub server_address: String,
}

/// Software version of the security server. Opaque beyond its display text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    #[serde(default)]
    pub info: String,
}

/// Payload of `GET /user`.
///
/// The backend also reports role names; they are not deserialized because
/// the resolved permission list is the only authorization input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserData {
    pub username: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Where the session is in its login/logout lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    LoggedOut,
    Authenticating,
    LoggedIn,
}

/// Snapshot of the authenticated user's identity, grants, and server context.
///
/// `permissions` holds the raw granted strings exactly as the backend sent
/// them. A grant the catalog does not know is kept but matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub authenticated: bool,
    pub username: String,
    pub permissions: BTreeSet<String>,
    pub current_server: Option<SecurityServer>,
    pub server_version: Option<Version>,
}

impl Session {
    /// Build a session from already-resolved grants.
    ///
    /// Used by tooling that evaluates access without a live backend.
    #[must_use]
    pub fn with_permissions<I, S>(username: &str, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            authenticated: true,
            username: username.to_owned(),
            permissions: permissions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Record the `/user` payload. Username and permissions change together.
    pub fn apply_user_data(&mut self, user: UserData) {
        self.username = user.username;
        self.permissions = user.permissions.into_iter().collect();
    }

    /// Reset every field to its empty default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_session_is_empty() {
        let s = Session::default();
        assert!(!s.authenticated);
        assert!(s.username.is_empty());
        assert!(s.permissions.is_empty());
        assert!(s.current_server.is_none());
        assert!(s.server_version.is_none());
    }

    #[test]
    fn user_payload_ignores_roles_and_tolerates_missing_permissions() {
        let user: UserData = serde_json::from_str(
            r#"{"username":"admin","permissions":["VIEW_CLIENTS"],"roles":["ROLE_XROAD_SECURITY_OFFICER"]}"#,
        )
        .unwrap();
        assert_eq!(user.username, "admin");
        assert_eq!(user.permissions, vec!["VIEW_CLIENTS".to_owned()]);

        let bare: UserData = serde_json::from_str(r#"{"username":"observer"}"#).unwrap();
        assert!(bare.permissions.is_empty());
    }

    #[test]
    fn apply_user_data_replaces_previous_grants() {
        let mut s = Session::with_permissions("old", ["VIEW_KEYS", "DIAGNOSTICS"]);
        s.apply_user_data(UserData {
            username: "new".to_owned(),
            permissions: vec!["VIEW_CLIENTS".to_owned(), "VIEW_CLIENTS".to_owned()],
        });
        assert_eq!(s.username, "new");
        assert_eq!(s.permissions.len(), 1);
        assert!(s.permissions.contains("VIEW_CLIENTS"));
    }

    #[test]
    fn clear_resets_every_field() {
        let mut s = Session::with_permissions("admin", ["VIEW_CLIENTS"]);
        s.current_server = Some(SecurityServer {
            id: "DEV:COM:1234:SS1".to_owned(),
            ..SecurityServer::default()
        });
        s.server_version = Some(Version {
            info: "6.23.0".to_owned(),
        });
        s.clear();
        assert_eq!(s, Session::default());
    }

    #[test]
    fn security_server_decodes_partial_payload() {
        let server: SecurityServer =
            serde_json::from_str(r#"{"id":"DEV:COM:1234:SS1","server_code":"SS1"}"#).unwrap();
        assert_eq!(server.server_code, "SS1");
        assert!(server.server_address.is_empty());
    }
}
