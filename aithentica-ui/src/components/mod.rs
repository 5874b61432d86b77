//! UI Components
//!
//! Reusable Leptos components.

pub mod loading;

pub use loading::{InlineLoading, Loading};
