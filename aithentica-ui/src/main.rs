//! Aithentica Web Client
//!
//! Browser front end for the Aithentica backend, built with Leptos (WASM).
//!
//! # Features
//!
//! - Login and registration
//! - Chat with several language-model providers
//! - Image generation
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. Session handling, validation and dashboard state come from the
//! `aithentica` crate; this crate supplies the fetch transport, browser
//! storage and the views.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
