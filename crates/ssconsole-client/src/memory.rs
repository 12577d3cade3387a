//! In-memory console backend for testing and local tooling.
//!
//! Behaves like a single security server with a fixed account list. Any
//! endpoint can be switched into a failing mode to exercise error paths.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tokio::sync::Mutex;

use ssconsole_core::{SecurityServer, UserData, Version};

use crate::backend::ConsoleBackend;
use crate::error::BackendError;

/// A backend endpoint, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    Logout,
    User,
    SecurityServers,
    Version,
}

#[derive(Debug, Clone)]
struct Account {
    password: String,
    permissions: Vec<String>,
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<String, Account>,
    logged_in: Option<String>,
    servers: Vec<SecurityServer>,
    version: Version,
    failing: HashSet<Endpoint>,
    logout_delay: Option<Duration>,
    login_delay: Option<Duration>,
    read_delay: Option<Duration>,
    logout_calls: usize,
}

/// In-memory [`ConsoleBackend`]. Not intended for production use.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    /// Create an empty backend: no accounts, no servers, empty version.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account with its resolved permissions.
    #[must_use]
    pub fn with_user(mut self, username: &str, password: &str, permissions: &[&str]) -> Self {
        self.state.get_mut().accounts.insert(
            username.to_owned(),
            Account {
                password: password.to_owned(),
                permissions: permissions.iter().map(|p| (*p).to_owned()).collect(),
            },
        );
        self
    }

    /// Set the list returned for `current_server=true`.
    #[must_use]
    pub fn with_servers(mut self, servers: Vec<SecurityServer>) -> Self {
        self.state.get_mut().servers = servers;
        self
    }

    /// Set the reported software version.
    #[must_use]
    pub fn with_version(mut self, info: &str) -> Self {
        self.state.get_mut().version = Version {
            info: info.to_owned(),
        };
        self
    }

    /// Delay every logout call by `delay` before it completes.
    #[must_use]
    pub fn with_logout_delay(mut self, delay: Duration) -> Self {
        self.state.get_mut().logout_delay = Some(delay);
        self
    }

    /// Delay every login call by `delay` before the credentials are checked.
    #[must_use]
    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.state.get_mut().login_delay = Some(delay);
        self
    }

    /// Delay every read (user, servers, version) by `delay` before it is
    /// answered. The answer reflects the state at the end of the delay.
    #[must_use]
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.state.get_mut().read_delay = Some(delay);
        self
    }

    /// Make `endpoint` fail (or stop failing) with a 500.
    pub async fn set_failing(&self, endpoint: Endpoint, failing: bool) {
        let mut state = self.state.lock().await;
        if failing {
            state.failing.insert(endpoint);
        } else {
            state.failing.remove(&endpoint);
        }
    }

    /// Number of logout calls received, including failed ones.
    pub async fn logout_calls(&self) -> usize {
        self.state.lock().await.logout_calls
    }

    /// Username holding the backend session, if any.
    pub async fn logged_in_user(&self) -> Option<String> {
        self.state.lock().await.logged_in.clone()
    }
}

impl MemoryBackend {
    async fn read_pause(&self) {
        let delay = self.state.lock().await.read_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn injected(endpoint: Endpoint) -> BackendError {
    BackendError::Api {
        status_code: 500,
        message: format!("injected failure on {endpoint:?}"),
    }
}

fn check(state: &MemoryState, endpoint: Endpoint) -> Result<(), BackendError> {
    if state.failing.contains(&endpoint) {
        return Err(injected(endpoint));
    }
    Ok(())
}

fn require_session(state: &MemoryState) -> Result<&str, BackendError> {
    state
        .logged_in
        .as_deref()
        .ok_or_else(|| BackendError::Auth("no active session".to_owned()))
}

#[async_trait::async_trait]
impl ConsoleBackend for MemoryBackend {
    async fn login(&self, username: &str, password: &str) -> Result<(), BackendError> {
        let delay = self.state.lock().await.login_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().await;
        check(&state, Endpoint::Login)?;

        let accepted = state
            .accounts
            .get(username)
            .is_some_and(|account| account.password == password);
        if !accepted {
            return Err(BackendError::Auth("bad credentials".to_owned()));
        }
        state.logged_in = Some(username.to_owned());
        Ok(())
    }

    async fn logout(&self) -> Result<(), BackendError> {
        let delay = {
            let mut state = self.state.lock().await;
            state.logout_calls += 1;
            state.logout_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().await;
        check(&state, Endpoint::Logout)?;
        state.logged_in = None;
        Ok(())
    }

    async fn user(&self) -> Result<UserData, BackendError> {
        self.read_pause().await;
        let state = self.state.lock().await;
        check(&state, Endpoint::User)?;
        let username = require_session(&state)?;
        let permissions = state
            .accounts
            .get(username)
            .map(|a| a.permissions.clone())
            .unwrap_or_default();
        Ok(UserData {
            username: username.to_owned(),
            permissions,
        })
    }

    async fn current_security_servers(&self) -> Result<Vec<SecurityServer>, BackendError> {
        self.read_pause().await;
        let state = self.state.lock().await;
        check(&state, Endpoint::SecurityServers)?;
        require_session(&state)?;
        Ok(state.servers.clone())
    }

    async fn version(&self) -> Result<Version, BackendError> {
        self.read_pause().await;
        let state = self.state.lock().await;
        check(&state, Endpoint::Version)?;
        require_session(&state)?;
        Ok(state.version.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn login_checks_password() {
        let backend = MemoryBackend::new().with_user("admin", "secret", &["VIEW_CLIENTS"]);
        assert!(matches!(
            backend.login("admin", "wrong").await,
            Err(BackendError::Auth(_))
        ));
        assert!(backend.logged_in_user().await.is_none());

        backend.login("admin", "secret").await.unwrap();
        assert_eq!(backend.logged_in_user().await.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn reads_require_a_session() {
        let backend = MemoryBackend::new().with_user("admin", "secret", &[]);
        assert!(matches!(backend.user().await, Err(BackendError::Auth(_))));
        assert!(matches!(backend.version().await, Err(BackendError::Auth(_))));
    }

    #[tokio::test]
    async fn injected_failure_can_be_cleared() {
        let backend = MemoryBackend::new().with_user("admin", "secret", &[]);
        backend.login("admin", "secret").await.unwrap();

        backend.set_failing(Endpoint::User, true).await;
        assert!(matches!(
            backend.user().await,
            Err(BackendError::Api { status_code: 500, .. })
        ));

        backend.set_failing(Endpoint::User, false).await;
        assert_eq!(backend.user().await.unwrap().username, "admin");
    }

    #[tokio::test]
    async fn logout_counts_failed_calls() {
        let backend = MemoryBackend::new().with_user("admin", "secret", &[]);
        backend.login("admin", "secret").await.unwrap();
        backend.set_failing(Endpoint::Logout, true).await;
        assert!(backend.logout().await.is_err());
        assert_eq!(backend.logout_calls().await, 1);
        assert!(backend.logged_in_user().await.is_some());
    }
}
