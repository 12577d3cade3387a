//! Client configuration for the security server console.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `SSCONSOLE_*` environment variables,
//! and the CLI lets flags override those in turn.

use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://localhost:4000";
const DEFAULT_API_PREFIX: &str = "/api";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_LOGOUT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_LOGOUT_RETRIES: u32 = 1;

/// Bounds on the best-effort backend logout call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutPolicy {
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Extra attempts after the first one fails.
    pub retries: u32,
}

impl Default for LogoutPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_LOGOUT_TIMEOUT,
            retries: DEFAULT_LOGOUT_RETRIES,
        }
    }
}

/// Console client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin of the security server UI, e.g. `https://ss1.example.org:4000`.
    /// `/login` and `/logout` are resolved against it.
    pub base_url: String,
    /// Path prefix of the JSON API. Default: `/api`.
    pub api_prefix: String,
    /// Request timeout. Default: 10 seconds.
    pub timeout: Duration,
    /// Retry attempts for idempotent reads. Default: 2.
    pub max_retries: u32,
    /// Bounds on the best-effort logout call.
    pub logout: LogoutPolicy,
    /// Accept self-signed or otherwise invalid TLS certificates.
    pub accept_invalid_certs: bool,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_prefix: DEFAULT_API_PREFIX.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            logout: LogoutPolicy::default(),
            accept_invalid_certs: false,
            log_level: "info".to_owned(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SSCONSOLE_URL` — security server UI origin (default: `https://localhost:4000`)
    /// - `SSCONSOLE_API_PREFIX` — JSON API prefix (default: `/api`)
    /// - `SSCONSOLE_TIMEOUT_SECS` — request timeout (default: `10`)
    /// - `SSCONSOLE_MAX_RETRIES` — retries for idempotent reads (default: `2`)
    /// - `SSCONSOLE_LOGOUT_TIMEOUT_SECS` — best-effort logout timeout (default: `5`)
    /// - `SSCONSOLE_LOGOUT_RETRIES` — best-effort logout retries (default: `1`)
    /// - `SSCONSOLE_ACCEPT_INVALID_CERTS` — skip TLS verification (default: `false`)
    /// - `SSCONSOLE_LOG_LEVEL` — log filter (default: `info`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let base_url = lookup("SSCONSOLE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.base_url);

        let api_prefix = lookup("SSCONSOLE_API_PREFIX").unwrap_or(defaults.api_prefix);

        let timeout = secs(lookup("SSCONSOLE_TIMEOUT_SECS")).unwrap_or(defaults.timeout);

        let max_retries = lookup("SSCONSOLE_MAX_RETRIES")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_retries);

        let logout = LogoutPolicy {
            timeout: secs(lookup("SSCONSOLE_LOGOUT_TIMEOUT_SECS"))
                .unwrap_or(defaults.logout.timeout),
            retries: lookup("SSCONSOLE_LOGOUT_RETRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.logout.retries),
        };

        let accept_invalid_certs = lookup("SSCONSOLE_ACCEPT_INVALID_CERTS")
            .is_some_and(|v| v == "true" || v == "1");

        let log_level = lookup("SSCONSOLE_LOG_LEVEL").unwrap_or(defaults.log_level);

        Self {
            base_url,
            api_prefix,
            timeout,
            max_retries,
            logout,
            accept_invalid_certs,
            log_level,
        }
    }
}

/// Parse a positive number of seconds. Zero and garbage fall back to the default.
fn secs(value: Option<String>) -> Option<Duration> {
    value
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|n| *n > 0)
        .map(Duration::from_secs)
}
