//! HTTP implementation of [`ConsoleBackend`] on top of `reqwest`.
//!
//! The security server keeps its session in a cookie, so the client runs with
//! a cookie store. Reads are retried with jittered exponential backoff on
//! transient statuses; login and logout are never retried here.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use ssconsole_core::{SecurityServer, UserData, Version};

use crate::backend::ConsoleBackend;
use crate::config::ClientConfig;
use crate::error::BackendError;

const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

/// Console backend speaking to a security server over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    api_prefix: String,
    max_retries: u32,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    code: Option<String>,
}

impl HttpBackend {
    /// Build a backend from client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Config`] if the base URL is empty, or
    /// [`BackendError::Network`] if the HTTP client cannot be built.
    pub fn new(cfg: &ClientConfig) -> Result<Self, BackendError> {
        let base_url = cfg.base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            return Err(BackendError::Config(
                "missing base URL — set SSCONSOLE_URL or pass --url".to_owned(),
            ));
        }

        let api_prefix = normalize_prefix(&cfg.api_prefix);

        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .cookie_store(true)
            .danger_accept_invalid_certs(cfg.accept_invalid_certs)
            .user_agent(concat!("ssconsole/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(BackendError::Network)?;

        Ok(Self {
            base_url,
            api_prefix,
            max_retries: cfg.max_retries,
            client,
        })
    }

    fn root_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}{path}", self.base_url, self.api_prefix)
    }

    async fn post_root(&self, path: &str, body: Option<String>) -> Result<(), BackendError> {
        let mut req = self.client.post(self.root_url(path));
        if let Some(body) = body {
            req = req
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(body);
        }

        let resp = req.send().await.map_err(map_transport)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(error_from_response(status, resp).await)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.api_url(path);
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            match self.client.get(&url).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let text = resp.text().await.map_err(BackendError::Network)?;
                        return serde_json::from_str(&text).map_err(BackendError::Json);
                    }

                    let err = error_from_response(status, resp).await;
                    if attempt < self.max_retries && is_retryable(status) {
                        debug!(%url, attempt, status = status.as_u16(), "retrying read");
                        last_err = Some(err);
                        sleep_with_jitter(attempt).await;
                        continue;
                    }
                    return Err(err);
                }
                Err(e) => {
                    last_err = Some(map_transport(e));
                    if attempt < self.max_retries {
                        debug!(%url, attempt, "retrying read after transport error");
                        sleep_with_jitter(attempt).await;
                        continue;
                    }
                }
            }

            break;
        }

        Err(last_err.unwrap_or(BackendError::Api {
            status_code: 0,
            message: "unknown error".to_owned(),
        }))
    }
}

#[async_trait::async_trait]
impl ConsoleBackend for HttpBackend {
    async fn login(&self, username: &str, password: &str) -> Result<(), BackendError> {
        let body = format!(
            "username={}&password={}",
            urlencoding::encode(username),
            urlencoding::encode(password)
        );
        self.post_root("/login", Some(body)).await
    }

    async fn logout(&self) -> Result<(), BackendError> {
        self.post_root("/logout", None).await
    }

    async fn user(&self) -> Result<UserData, BackendError> {
        self.get_json("/user").await
    }

    async fn current_security_servers(&self) -> Result<Vec<SecurityServer>, BackendError> {
        self.get_json("/security-servers?current_server=true").await
    }

    async fn version(&self) -> Result<Version, BackendError> {
        self.get_json("/system/version").await
    }
}

/// Turn a non-success response into a [`BackendError`], pulling a message
/// out of the JSON error body when there is one.
async fn error_from_response(status: StatusCode, resp: reqwest::Response) -> BackendError {
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .ok()
        .and_then(|b| b.message.or_else(|| b.error.and_then(|e| e.code)))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return BackendError::Auth(message);
    }
    BackendError::Api {
        status_code: status.as_u16(),
        message,
    }
}

fn map_transport(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Network(e)
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn is_retryable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

async fn sleep_with_jitter(attempt: u32) {
    // RETRY_BASE_DELAY is 250ms and attempts stay in single digits.
    #[allow(clippy::cast_possible_truncation)]
    let base = (RETRY_BASE_DELAY.as_millis() as u64).saturating_mul(2u64.saturating_pow(attempt));
    let jitter = base.saturating_mul(jitter_permille()) / 1000 * 3 / 10;
    tokio::time::sleep(Duration::from_millis(base.saturating_add(jitter))).await;
}

/// Pseudo-random value in `[0, 1000)` from the clock's sub-second nanos.
fn jitter_permille() -> u64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    u64::from(nanos % 1000)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_normalized() {
        assert_eq!(normalize_prefix("/api"), "/api");
        assert_eq!(normalize_prefix("api/"), "/api");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix(""), "");
    }

    #[test]
    fn urls_split_root_and_api_paths() {
        let backend = HttpBackend::new(&ClientConfig {
            base_url: "https://ss1.example.org:4000/".to_owned(),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(backend.root_url("/login"), "https://ss1.example.org:4000/login");
        assert_eq!(
            backend.api_url("/system/version"),
            "https://ss1.example.org:4000/api/system/version"
        );
    }

    #[test]
    fn empty_base_url_is_a_config_error() {
        let err = HttpBackend::new(&ClientConfig {
            base_url: "/".to_owned(),
            ..ClientConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, BackendError::Config(_)));
    }

    #[test]
    fn only_transient_statuses_are_retried() {
        assert!(is_retryable(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_retryable(StatusCode::NOT_FOUND));
        assert!(!is_retryable(StatusCode::UNAUTHORIZED));
    }
}
