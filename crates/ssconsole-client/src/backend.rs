//! The seam between the session controller and the security server API.

use ssconsole_core::{SecurityServer, UserData, Version};

use crate::error::BackendError;

/// The backend endpoints the console consumes.
///
/// Responses are taken at face value: the backend is the authorization
/// authority and the console never re-derives what it reports.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`),
/// since best-effort logout runs on a detached task.
#[async_trait::async_trait]
pub trait ConsoleBackend: Send + Sync + 'static {
    /// Submit credentials (`POST /login`).
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Auth`] when the credentials are refused, or
    /// any transport error.
    async fn login(&self, username: &str, password: &str) -> Result<(), BackendError>;

    /// End the backend session (`POST /logout`).
    ///
    /// # Errors
    ///
    /// Returns a transport or API error. Callers treat this as best-effort.
    async fn logout(&self) -> Result<(), BackendError>;

    /// Fetch the logged-in user and their resolved permissions (`GET /user`).
    ///
    /// # Errors
    ///
    /// Returns a transport, API, or decoding error.
    async fn user(&self) -> Result<UserData, BackendError>;

    /// List the servers matching `current_server=true`.
    ///
    /// The backend is expected to return exactly one entry; the controller
    /// enforces that, not the backend implementation.
    ///
    /// # Errors
    ///
    /// Returns a transport, API, or decoding error.
    async fn current_security_servers(&self) -> Result<Vec<SecurityServer>, BackendError>;

    /// Fetch the security server software version (`GET /system/version`).
    ///
    /// # Errors
    ///
    /// Returns a transport, API, or decoding error.
    async fn version(&self) -> Result<Version, BackendError>;
}
