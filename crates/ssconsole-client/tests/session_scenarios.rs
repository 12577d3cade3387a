//! Session lifecycle scenarios against the in-memory backend, seen through
//! the public API only.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use ssconsole_client::{Endpoint, LogoutPolicy, MemoryBackend, SessionController, SessionError};
use ssconsole_core::{MAIN_TABS, Permission, SecurityServer, Session, SessionPhase, access};

fn server(code: &str) -> SecurityServer {
    SecurityServer {
        id: format!("DEV:GOV:9876:{code}"),
        instance_id: "DEV".to_owned(),
        member_class: "GOV".to_owned(),
        member_code: "9876".to_owned(),
        server_code: code.to_owned(),
        server_address: format!("{}.example.org", code.to_lowercase()),
    }
}

fn policy() -> LogoutPolicy {
    LogoutPolicy {
        timeout: Duration::from_millis(500),
        retries: 0,
    }
}

fn setup(backend: MemoryBackend) -> (SessionController, Arc<MemoryBackend>) {
    let backend = Arc::new(backend);
    let controller = SessionController::new(backend.clone(), policy());
    (controller, backend)
}

fn tab_keys(session: &Session) -> Vec<&'static str> {
    access::filter_allowed_tabs(session, &MAIN_TABS)
        .iter()
        .map(|t| t.key)
        .collect()
}

#[tokio::test]
async fn view_clients_operator_lands_on_clients() {
    let (ctl, _) = setup(
        MemoryBackend::new()
            .with_user("operator", "pw", &["VIEW_CLIENTS"])
            .with_servers(vec![server("SS1")])
            .with_version("7.4.0"),
    );
    ctl.login_and_load("operator", "pw").await.unwrap();

    let session = ctl.session().await;
    assert_eq!(tab_keys(&session), ["clients", "settings"]);
    assert_eq!(ctl.first_allowed_tab().await.unwrap().key, "clients");
    assert!(!access::has_any_permission(
        &session,
        &[Permission::ViewKeys, Permission::Diagnostics]
    ));
}

#[tokio::test]
async fn single_current_server_is_stored() {
    let (ctl, _) = setup(
        MemoryBackend::new()
            .with_user("operator", "pw", &[])
            .with_servers(vec![server("SS7")]),
    );
    ctl.login("operator", "pw").await.unwrap();
    ctl.fetch_current_security_server().await.unwrap();

    let current = ctl.session().await.current_server.unwrap();
    assert_eq!(current.id, "DEV:GOV:9876:SS7");
    assert_eq!(current.server_address, "ss7.example.org");
}

#[tokio::test]
async fn readers_tolerate_partially_loaded_session() {
    let (ctl, _) = setup(
        MemoryBackend::new()
            .with_user("operator", "pw", &["VIEW_CLIENTS", "VIEW_KEYS"])
            .with_servers(vec![server("SS1")])
            .with_version("7.4.0")
            .with_read_delay(Duration::from_millis(150)),
    );
    ctl.login("operator", "pw").await.unwrap();

    let (loaded, mid_load) = tokio::join!(ctl.load_session_data(), async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        ctl.session().await
    });
    loaded.unwrap();

    assert!(mid_load.authenticated);
    assert!(mid_load.username.is_empty());
    assert!(mid_load.current_server.is_none());
    assert_eq!(tab_keys(&mid_load), ["settings"]);

    assert_eq!(tab_keys(&ctl.session().await), ["clients", "keys", "settings"]);
}

#[tokio::test]
async fn fetch_finishing_after_clear_is_discarded() {
    let (ctl, _) = setup(
        MemoryBackend::new()
            .with_user("operator", "pw", &["DIAGNOSTICS"])
            .with_read_delay(Duration::from_millis(100)),
    );
    ctl.login("operator", "pw").await.unwrap();

    let (fetched, ()) = tokio::join!(ctl.fetch_user_data(), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        ctl.clear_auth().await;
    });
    assert!(matches!(
        fetched,
        Err(SessionError::Discarded {
            operation: "user data fetch"
        })
    ));

    assert_eq!(ctl.session().await, Session::default());
    assert_eq!(ctl.phase().await, SessionPhase::LoggedOut);
}

#[tokio::test]
async fn fetch_racing_a_logout_never_repopulates() {
    let (ctl, backend) = setup(
        MemoryBackend::new()
            .with_user("operator", "pw", &["DIAGNOSTICS"])
            .with_read_delay(Duration::from_millis(100)),
    );
    ctl.login("operator", "pw").await.unwrap();

    let (fetched, handle) = tokio::join!(ctl.fetch_user_data(), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        ctl.logout().await
    });
    handle.await.unwrap();

    // The backend session is gone by the time the read is answered.
    assert!(matches!(fetched, Err(SessionError::Fetch { .. })));
    assert_eq!(ctl.session().await, Session::default());
    assert_eq!(backend.logout_calls().await, 1);
}

#[tokio::test]
async fn login_answered_after_logout_does_not_revive_session() {
    let (ctl, _) = setup(
        MemoryBackend::new()
            .with_user("operator", "pw", &["VIEW_CLIENTS"])
            .with_login_delay(Duration::from_millis(150)),
    );
    let reloads = ctl.subscribe_reload();

    let (login, ()) = tokio::join!(ctl.login("operator", "pw"), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        ctl.logout().await.await.unwrap();
    });

    assert_eq!(*reloads.borrow(), 1);
    assert!(matches!(
        login,
        Err(SessionError::Discarded { operation: "login" })
    ));
    assert!(!ctl.is_authenticated().await);
    assert_eq!(ctl.session().await, Session::default());
    assert_eq!(ctl.phase().await, SessionPhase::LoggedOut);
}

#[tokio::test]
async fn failed_login_after_clear_stays_logged_out() {
    let (ctl, _) = setup(
        MemoryBackend::new()
            .with_user("operator", "pw", &["VIEW_CLIENTS"])
            .with_login_delay(Duration::from_millis(100)),
    );
    ctl.login("operator", "pw").await.unwrap();
    assert_eq!(ctl.phase().await, SessionPhase::LoggedIn);

    let (second, ()) = tokio::join!(ctl.login("operator", "wrong"), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        ctl.clear_auth().await;
    });

    assert!(matches!(second, Err(SessionError::CredentialsRejected(_))));
    assert_eq!(ctl.phase().await, SessionPhase::LoggedOut);
    assert_eq!(ctl.session().await, Session::default());
}

#[tokio::test]
async fn failed_relogin_without_clear_keeps_previous_phase() {
    let (ctl, _) = setup(MemoryBackend::new().with_user("operator", "pw", &[]));
    ctl.login("operator", "pw").await.unwrap();

    assert!(ctl.login("operator", "wrong").await.is_err());
    assert_eq!(ctl.phase().await, SessionPhase::LoggedIn);
    assert!(ctl.is_authenticated().await);
}

#[tokio::test]
async fn relogin_after_logout_settles_starts_clean() {
    let (ctl, backend) = setup(
        MemoryBackend::new()
            .with_user("alice", "a", &["VIEW_KEYS"])
            .with_user("bob", "b", &["DIAGNOSTICS"]),
    );
    let mut reloads = ctl.subscribe_reload();

    ctl.login("alice", "a").await.unwrap();
    ctl.fetch_user_data().await.unwrap();
    ctl.logout().await.await.unwrap();
    reloads.changed().await.unwrap();

    ctl.login("bob", "b").await.unwrap();
    ctl.fetch_user_data().await.unwrap();

    let session = ctl.session().await;
    assert_eq!(session.username, "bob");
    assert!(!access::has_permission(&session, Permission::ViewKeys));
    assert_eq!(tab_keys(&session), ["diagnostics", "settings"]);
    assert_eq!(backend.logged_in_user().await.as_deref(), Some("bob"));
}

#[tokio::test]
async fn version_failure_surfaces_but_login_stands() {
    let (ctl, backend) = setup(
        MemoryBackend::new()
            .with_user("operator", "pw", &["VIEW_CLIENTS"])
            .with_servers(vec![server("SS1")]),
    );
    backend.set_failing(Endpoint::Version, true).await;

    let err = ctl.login_and_load("operator", "pw").await.unwrap_err();
    assert!(err.to_string().contains("version"), "{err}");
    assert_eq!(ctl.phase().await, SessionPhase::LoggedIn);

    let session = ctl.session().await;
    assert_eq!(session.username, "operator");
    assert!(session.current_server.is_some());
    assert!(session.server_version.is_none());
}

#[tokio::test]
async fn login_failure_on_unreachable_backend_keeps_logged_out() {
    let (ctl, backend) = setup(MemoryBackend::new().with_user("operator", "pw", &[]));
    backend.set_failing(Endpoint::Login, true).await;

    let err = ctl.login("operator", "pw").await.unwrap_err();
    assert!(matches!(err, SessionError::CredentialsRejected(_)));
    assert!(!ctl.is_authenticated().await);
    assert_eq!(ctl.phase().await, SessionPhase::LoggedOut);
}
