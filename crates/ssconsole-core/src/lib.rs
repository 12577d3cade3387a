//! Core library for the security server console.
//!
//! Holds the closed permission, role, and route catalogs, the static tab
//! lists, the client-side [`Session`](session::Session) snapshot, and the pure
//! access predicates evaluated over it. Nothing here performs I/O; the
//! session lifecycle and the backend live in `ssconsole-client`.

pub mod access;
pub mod error;
pub mod permission;
pub mod route;
pub mod session;

pub use error::CatalogError;
pub use permission::{Permission, Role};
pub use route::{MAIN_TABS, RouteName, Tab};
pub use session::{SecurityServer, Session, SessionPhase, UserData, Version};
