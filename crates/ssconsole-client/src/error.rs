//! Error types for `ssconsole-client`.

/// Errors raised by a [`ConsoleBackend`](crate::ConsoleBackend).
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Missing or malformed client configuration.
    #[error("console config error: {0}")]
    Config(String),

    /// The backend answered with a non-success status.
    #[error("console API error {status_code}: {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Message extracted from the error body, or `HTTP <code>`.
        message: String,
    },

    /// Authentication was refused (401/403).
    #[error("console auth error: {0}")]
    Auth(String),

    /// The request did not complete in time.
    #[error("console request timed out")]
    Timeout,

    /// Network or HTTP client error.
    #[error("console network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A response body could not be decoded.
    #[error("console json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which piece of session data a failed fetch was loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    CurrentServer,
    ServerVersion,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::User => "user data",
            Self::CurrentServer => "current security server",
            Self::ServerVersion => "security server version",
        })
    }
}

/// Errors surfaced by the [`SessionController`](crate::SessionController).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The login endpoint rejected the credentials or failed outright.
    /// The session is left untouched.
    #[error("login failed: {0}")]
    CredentialsRejected(#[source] BackendError),

    /// A post-login data fetch failed. Fields already written are kept.
    #[error("failed to fetch {resource}: {source}")]
    Fetch {
        resource: Resource,
        #[source]
        source: BackendError,
    },

    /// The backend did not report exactly one current security server.
    #[error("current security server not found (backend returned {found})")]
    CurrentServerNotFound { found: usize },

    /// The session was cleared while the request was in flight, so its
    /// result was dropped and nothing was written.
    #[error("{operation} discarded: session was cleared while the request was in flight")]
    Discarded { operation: &'static str },
}
