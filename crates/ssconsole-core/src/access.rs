//! Access evaluation over a [`Session`].
//!
//! All functions here are pure predicates over already-fetched session state
//! and are safe to call on every render. They hide affordances the backend
//! would reject anyway; the backend API remains the authorization boundary.
//!
//! A partially populated session (empty permissions while fetches are in
//! flight) is a valid input and simply grants nothing.

use crate::permission::Permission;
use crate::route::{MAIN_TABS, Tab};
use crate::session::Session;

/// Whether the session has passed login.
#[must_use]
pub fn is_authenticated(session: &Session) -> bool {
    session.authenticated
}

/// Whether the session holds `permission`.
#[must_use]
pub fn has_permission(session: &Session, permission: Permission) -> bool {
    session.permissions.contains(permission.as_str())
}

/// Whether the session holds a permission given by its wire name.
///
/// Total over arbitrary strings: anything not granted, including names the
/// catalog does not know, is `false`.
#[must_use]
pub fn has_permission_name(session: &Session, name: &str) -> bool {
    session.permissions.contains(name)
}

/// Whether the session holds at least one of `permissions`.
#[must_use]
pub fn has_any_permission(session: &Session, permissions: &[Permission]) -> bool {
    permissions.iter().any(|p| has_permission(session, *p))
}

/// Keep the tabs the session may see, preserving order.
///
/// A tab without a required permission is always kept.
#[must_use]
pub fn filter_allowed_tabs<'a>(session: &Session, tabs: &'a [Tab]) -> Vec<&'a Tab> {
    tabs.iter()
        .filter(|tab| tab.permission.is_none_or(|p| has_permission(session, p)))
        .collect()
}

/// The first main tab the session may see, used as the post-login landing
/// view. `None` when nothing is visible; callers route to a neutral view.
#[must_use]
pub fn first_allowed_tab(session: &Session) -> Option<&'static Tab> {
    first_allowed_tab_in(session, &MAIN_TABS)
}

/// First element of [`filter_allowed_tabs`] over an arbitrary tab list.
#[must_use]
pub fn first_allowed_tab_in<'a>(session: &Session, tabs: &'a [Tab]) -> Option<&'a Tab> {
    filter_allowed_tabs(session, tabs).into_iter().next()
}
