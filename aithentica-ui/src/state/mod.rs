//! State Management
//!
//! Session context shared by every page.

pub mod auth;

pub use auth::{provide_auth, use_auth, AuthContext};
