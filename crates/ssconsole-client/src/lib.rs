//! Security server console client.
//!
//! Connects the pure catalogs and access predicates of `ssconsole-core` to a
//! live security server: the [`ConsoleBackend`] trait is the seam to the REST
//! API, [`HttpBackend`] implements it over HTTPS, and [`SessionController`]
//! owns the session lifecycle (login, post-login fetches, logout).
//!
//! Two implementations of the backend are provided:
//!
//! - [`HttpBackend`] — talks to a security server with `reqwest`
//! - [`MemoryBackend`] — in-memory, for testing only
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ssconsole_client::{ClientConfig, HttpBackend, SessionController};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = ClientConfig::from_env();
//! let backend = Arc::new(HttpBackend::new(&cfg)?);
//! let controller = SessionController::new(backend, cfg.logout);
//!
//! controller.login_and_load("admin", "secret").await?;
//! if let Some(tab) = controller.first_allowed_tab().await {
//!     println!("landing on {}", tab.to);
//! }
//! controller.logout().await.await?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod config;
mod controller;
mod error;
mod http;
mod memory;

pub use backend::ConsoleBackend;
pub use config::{ClientConfig, LogoutPolicy};
pub use controller::SessionController;
pub use error::{BackendError, Resource, SessionError};
pub use http::HttpBackend;
pub use memory::{Endpoint, MemoryBackend};
