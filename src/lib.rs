//! # Aithentica
//!
//! Client for the Aithentica backend: authentication, multi-provider chat,
//! and image generation.
//!
//! All business logic lives behind the backend's HTTP API. The one piece of
//! state kept here is the session, whose access token is renewed from an
//! HttpOnly cookie and retried once when the backend answers 401.
//!
//! ## Modules
//!
//! - [`api`]: Wire types, error normalization and the [`api::Backend`] trait
//! - [`session`]: Credential lifecycle and the refresh-and-retry helper
//! - [`routes`]: Which page a session phase may see
//! - [`forms`]: Login and registration validation
//! - [`dashboard`]: Chat transcript, image gallery and model selection
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aithentica::api::HttpBackend;
//! use aithentica::config::Config;
//! use aithentica::dashboard::ChatPanel;
//! use aithentica::session::{FileStore, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let data_dir = config.session.data_dir();
//!
//!     let backend = HttpBackend::new(&config.api)?.with_cookie_file(data_dir.join("cookies"));
//!     let session = Session::new(backend, FileStore::in_dir(&data_dir));
//!     session.bootstrap().await;
//!
//!     let mut chat = ChatPanel::default();
//!     chat.input = "Hello!".to_string();
//!     if let Some(Ok(reply)) = chat.submit(&session).await {
//!         println!("{}", reply);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
pub mod dashboard;
pub mod forms;
pub mod routes;
pub mod session;

#[cfg(test)]
mod testing;

pub use api::{ApiError, ApiResult, Backend};
pub use routes::{resolve, AppRoute, RouteDecision};
pub use session::{AuthPhase, Credential, CredentialStore, Session};
