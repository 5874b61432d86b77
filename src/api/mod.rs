//! Aithentica Backend API
//!
//! One call per UI action, behind the [`Backend`] trait so the same flows run
//! over reqwest on native targets and over the browser fetch API in the UI.
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /auth/login/` - Exchange username/password for an access token
//! - `POST /auth/registration/` - Create an account
//! - `GET /auth/user/` - Current user profile
//! - `POST /auth/token/refresh/` - Mint a new access token from the renewal cookie
//!
//! ## Models
//! - `GET /gen_ai_models/chat_history/` - Recent question/answer pairs
//! - `POST /gen_ai_models/chat_pollinations/` - Prompt-only chat
//! - `POST /gen_ai_models/chat/` - Provider/model chat
//! - `POST /gen_ai_models/vision/` - Image generation

pub mod auth;
pub mod chat;
pub mod dto;
pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod http;
pub mod vision;

pub use dto::*;
pub use error::{ApiError, ApiResult, FieldErrors, GENERAL_FIELD, UNKNOWN_ERROR};
#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpBackend;

use async_trait::async_trait;

use crate::session::Credential;

/// Endpoint paths relative to the API base URL
pub mod endpoints {
    pub const LOGIN: &str = "/auth/login/";
    pub const REGISTER: &str = "/auth/registration/";
    pub const CURRENT_USER: &str = "/auth/user/";
    pub const TOKEN_REFRESH: &str = "/auth/token/refresh/";
    pub const CHAT_HISTORY: &str = "/gen_ai_models/chat_history/";
    pub const CHAT_POLLINATIONS: &str = "/gen_ai_models/chat_pollinations/";
    pub const CHAT: &str = "/gen_ai_models/chat/";
    pub const VISION: &str = "/gen_ai_models/vision/";
}

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// Transport to the Aithentica backend.
///
/// Implementations send cookies with every request (the renewal token lives
/// in one) and attach `Authorization: Bearer` for calls taking a credential.
/// Every failure must already be normalized into [`ApiError`].
#[async_trait(?Send)]
pub trait Backend {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse>;

    async fn register(&self, request: &RegisterRequest) -> ApiResult<RegisteredUser>;

    async fn current_user(&self, credential: &Credential) -> ApiResult<UserProfile>;

    /// Exchange the ambient renewal cookie for a new access token
    async fn refresh(&self) -> ApiResult<RefreshResponse>;

    async fn chat_history(&self, credential: &Credential) -> ApiResult<Vec<HistoryEntry>>;

    async fn chat_pollinations(
        &self,
        credential: &Credential,
        request: &PollinationsChatRequest,
    ) -> ApiResult<ChatReply>;

    async fn chat(
        &self,
        credential: &Credential,
        request: &ProviderChatRequest,
    ) -> ApiResult<ProviderChatResponse>;

    async fn generate_image(
        &self,
        credential: &Credential,
        request: &VisionRequest,
    ) -> ApiResult<VisionResponse>;

    /// Drop any renewal cookie the transport keeps, so the next refresh fails.
    ///
    /// Called whenever the session ends. The browser cannot touch an HttpOnly
    /// cookie, so the default does nothing.
    fn forget_session(&self) {}
}

/// Join a base URL and an endpoint path without doubling slashes
pub fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
