//! Session lifecycle for the console.
//!
//! The [`SessionController`] owns the only mutable [`Session`] and drives it
//! through `LoggedOut → Authenticating → LoggedIn → LoggedOut`:
//!
//! 1. **Login**: submit credentials. On success the session is marked
//!    authenticated; nothing else is fetched yet.
//!
//! 2. **Load**: fetch user data, the current security server, and the
//!    server version. The three fetches are independent and may finish in
//!    any order; each writes only its own field.
//!
//! 3. **Logout**: clear local state at once, then notify the backend on a
//!    detached task. Whatever that call does, once it settles the state
//!    container is reset again and a reload is published, discarding any
//!    data that slipped in meanwhile.
//!
//! Readers get snapshots and evaluate them with `ssconsole_core::access`.

use std::sync::Arc;

use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use ssconsole_core::access;
use ssconsole_core::{Permission, Session, SessionPhase, Tab};

use crate::backend::ConsoleBackend;
use crate::config::LogoutPolicy;
use crate::error::{BackendError, Resource, SessionError};

#[derive(Debug, Default)]
struct ControllerState {
    phase: SessionPhase,
    session: Session,
    /// Bumped on every local clear. Fetches that started under an older
    /// epoch drop their result instead of writing into a cleared session.
    epoch: u64,
}

impl ControllerState {
    fn reset(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.phase = SessionPhase::LoggedOut;
        self.session.clear();
    }
}

/// Owns the session state and its login/logout lifecycle.
pub struct SessionController {
    backend: Arc<dyn ConsoleBackend>,
    state: Arc<RwLock<ControllerState>>,
    reloads: Arc<watch::Sender<u64>>,
    logout_policy: LogoutPolicy,
}

impl SessionController {
    /// Create a controller in the `LoggedOut` phase with an empty session.
    #[must_use]
    pub fn new(backend: Arc<dyn ConsoleBackend>, logout_policy: LogoutPolicy) -> Self {
        let (reloads, _) = watch::channel(0);
        Self {
            backend,
            state: Arc::new(RwLock::new(ControllerState::default())),
            reloads: Arc::new(reloads),
            logout_policy,
        }
    }

    /// A copy of the current session.
    pub async fn session(&self) -> Session {
        self.state.read().await.session.clone()
    }

    /// The current lifecycle phase.
    pub async fn phase(&self) -> SessionPhase {
        self.state.read().await.phase
    }

    pub async fn is_authenticated(&self) -> bool {
        access::is_authenticated(&self.state.read().await.session)
    }

    pub async fn has_permission(&self, permission: Permission) -> bool {
        access::has_permission(&self.state.read().await.session, permission)
    }

    /// Tabs from `tabs` the current session may see, in order.
    pub async fn allowed_tabs<'a>(&self, tabs: &'a [Tab]) -> Vec<&'a Tab> {
        access::filter_allowed_tabs(&self.state.read().await.session, tabs)
    }

    /// Landing tab for the current session, if any is visible.
    pub async fn first_allowed_tab(&self) -> Option<&'static Tab> {
        access::first_allowed_tab(&self.state.read().await.session)
    }

    /// Subscribe to reload notifications. The value is a generation counter
    /// that increases each time application state is discarded after logout.
    pub fn subscribe_reload(&self) -> watch::Receiver<u64> {
        self.reloads.subscribe()
    }

    /// Submit credentials to the backend.
    ///
    /// On success the session becomes authenticated and the phase moves to
    /// `LoggedIn`. User data and server context are not fetched here; see
    /// [`load_session_data`](Self::load_session_data).
    ///
    /// # Errors
    ///
    /// - [`SessionError::CredentialsRejected`] if the backend refuses the
    ///   login. The session fields are left unmodified and the phase returns
    ///   to what it was before the attempt, unless the session was cleared
    ///   meanwhile, in which case it stays `LoggedOut`.
    /// - [`SessionError::Discarded`] if the login succeeded but the session
    ///   was cleared while the request was in flight. Nothing is written.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), SessionError> {
        let (previous, epoch) = {
            let mut state = self.state.write().await;
            let previous = std::mem::replace(&mut state.phase, SessionPhase::Authenticating);
            (previous, state.epoch)
        };

        let outcome = self.backend.login(username, password).await;
        let mut state = self.state.write().await;
        let cleared = state.epoch != epoch;

        match outcome {
            Ok(()) if cleared => {
                debug!(username, "session cleared during login, dropping result");
                Err(SessionError::Discarded { operation: "login" })
            }
            Ok(()) => {
                state.session.authenticated = true;
                state.phase = SessionPhase::LoggedIn;
                info!(username, "login succeeded");
                Ok(())
            }
            Err(err) => {
                if !cleared {
                    state.phase = previous;
                }
                warn!(username, error = %err, "login rejected");
                Err(SessionError::CredentialsRejected(err))
            }
        }
    }

    /// Fetch the username and permissions and store both.
    ///
    /// Both fields are written under one lock acquisition, so no reader sees
    /// a new username with old permissions.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Fetch`] if the backend call fails. Fields already
    ///   in the session are kept.
    /// - [`SessionError::Discarded`] if the session was cleared while the
    ///   request was in flight.
    pub async fn fetch_user_data(&self) -> Result<(), SessionError> {
        let epoch = self.epoch().await;
        let user = self
            .backend
            .user()
            .await
            .map_err(|source| fetch_failed(Resource::User, source))?;

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            debug!("session cleared during user fetch, dropping result");
            return Err(SessionError::Discarded {
                operation: "user data fetch",
            });
        }
        debug!(username = %user.username, permissions = user.permissions.len(), "user data loaded");
        state.session.apply_user_data(user);
        Ok(())
    }

    /// Fetch the current security server. Exactly one must be reported.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Fetch`] if the backend call fails.
    /// - [`SessionError::CurrentServerNotFound`] if zero or several servers
    ///   come back. The field stays unset in both cases.
    /// - [`SessionError::Discarded`] if the session was cleared while the
    ///   request was in flight.
    pub async fn fetch_current_security_server(&self) -> Result<(), SessionError> {
        let epoch = self.epoch().await;
        let mut servers = self
            .backend
            .current_security_servers()
            .await
            .map_err(|source| fetch_failed(Resource::CurrentServer, source))?;

        if servers.len() != 1 {
            let err = SessionError::CurrentServerNotFound {
                found: servers.len(),
            };
            error!(error = %err, "current security server lookup failed");
            return Err(err);
        }

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            debug!("session cleared during server fetch, dropping result");
            return Err(SessionError::Discarded {
                operation: "current security server fetch",
            });
        }
        state.session.current_server = servers.pop();
        Ok(())
    }

    /// Fetch the security server software version.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Fetch`] if the backend call fails. The field stays
    ///   unset.
    /// - [`SessionError::Discarded`] if the session was cleared while the
    ///   request was in flight.
    pub async fn fetch_security_server_version(&self) -> Result<(), SessionError> {
        let epoch = self.epoch().await;
        let version = self
            .backend
            .version()
            .await
            .map_err(|source| fetch_failed(Resource::ServerVersion, source))?;

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            debug!("session cleared during version fetch, dropping result");
            return Err(SessionError::Discarded {
                operation: "security server version fetch",
            });
        }
        state.session.server_version = Some(version);
        Ok(())
    }

    /// Run the three post-login fetches concurrently.
    ///
    /// All three settle before this returns. Each one that succeeds keeps
    /// its write even if another fails.
    ///
    /// # Errors
    ///
    /// Returns the first failure in the order user, server, version.
    pub async fn load_session_data(&self) -> Result<(), SessionError> {
        let (user, server, version) = tokio::join!(
            self.fetch_user_data(),
            self.fetch_current_security_server(),
            self.fetch_security_server_version(),
        );
        user.and(server).and(version)
    }

    /// [`login`](Self::login) followed by [`load_session_data`](Self::load_session_data).
    ///
    /// # Errors
    ///
    /// Returns the login failure, or the first fetch failure after a
    /// successful login (the session then stays authenticated).
    pub async fn login_and_load(&self, username: &str, password: &str) -> Result<(), SessionError> {
        self.login(username, password).await?;
        self.load_session_data().await
    }

    /// Log out.
    ///
    /// Every session field is reset and the phase is `LoggedOut` before this
    /// returns. The backend is then notified on a detached task; its failure
    /// is logged and otherwise ignored. When that task settles the state is
    /// discarded once more and a reload is published. This also discards a
    /// login made after this call but before the notification settled.
    ///
    /// The returned handle may be awaited to wait for the reload, or
    /// dropped; dropping does not cancel the task.
    pub async fn logout(&self) -> JoinHandle<()> {
        self.state.write().await.reset();
        info!("session cleared locally");
        self.spawn_backend_logout(true)
    }

    /// Forced termination, e.g. when the session timed out.
    pub async fn expire_session(&self) -> JoinHandle<()> {
        warn!("session expired, forcing logout");
        self.logout().await
    }

    /// Notify the backend only. Local state is not touched and no reload is
    /// published.
    pub async fn silent_logout(&self) -> JoinHandle<()> {
        self.spawn_backend_logout(false)
    }

    /// Reset local state without contacting the backend or reloading.
    pub async fn clear_auth(&self) {
        self.state.write().await.reset();
        debug!("auth data cleared");
    }

    async fn epoch(&self) -> u64 {
        self.state.read().await.epoch
    }

    fn spawn_backend_logout(&self, reload: bool) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        let state = Arc::clone(&self.state);
        let reloads = Arc::clone(&self.reloads);
        let policy = self.logout_policy;

        tokio::spawn(async move {
            notify_backend_logout(backend.as_ref(), policy).await;
            if reload {
                state.write().await.reset();
                reloads.send_modify(|generation| *generation += 1);
                info!(generation = *reloads.borrow(), "application state reloaded");
            }
        })
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("logout_policy", &self.logout_policy)
            .finish_non_exhaustive()
    }
}

fn fetch_failed(resource: Resource, source: BackendError) -> SessionError {
    error!(%resource, error = %source, "session data fetch failed");
    SessionError::Fetch { resource, source }
}

/// Best-effort `POST /logout`, bounded by `policy`. Never fails.
async fn notify_backend_logout(backend: &dyn ConsoleBackend, policy: LogoutPolicy) {
    for attempt in 0..=policy.retries {
        match tokio::time::timeout(policy.timeout, backend.logout()).await {
            Ok(Ok(())) => {
                debug!(attempt, "backend logout acknowledged");
                return;
            }
            Ok(Err(err)) => warn!(attempt, error = %err, "backend logout failed"),
            Err(_) => warn!(attempt, timeout = ?policy.timeout, "backend logout timed out"),
        }
    }
    warn!(attempts = policy.retries + 1, "giving up on backend logout");
}
