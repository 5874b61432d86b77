//! Data Transfer Objects
//!
//! Request and response types exchanged with the Aithentica backend.
//! Field names are part of the backend contract and must not change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// AUTH DTOs
// ============================================

/// Login request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response; the renewal token arrives separately as an HttpOnly cookie
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Short-lived access token
    pub access: String,
    pub user: UserProfile,
}

/// Registration request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Confirmation of `password`
    pub password2: String,
}

/// Account created by a successful registration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RegisteredUser {
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Token refresh response
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    /// Present only when the backend rotates renewal tokens
    #[serde(default)]
    pub refresh: Option<String>,
}

/// The signed-in user as reported by the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub email: String,
    /// Cumulative model usage; absent from the login response
    #[serde(default)]
    pub token_usage: TokenUsage,
}

/// Cumulative token counters for a user
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

// ============================================
// CHAT DTOs
// ============================================

/// One stored question/answer pair
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

/// Request for the pollinations text endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PollinationsChatRequest {
    pub prompt: String,
}

/// Request for the generic provider/model chat endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProviderChatRequest {
    pub provider: String,
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Generic chat endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderChatResponse {
    pub content: String,
}

/// Uniform assistant reply, whichever endpoint produced it
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChatReply {
    pub text: String,
}

impl From<ProviderChatResponse> for ChatReply {
    fn from(response: ProviderChatResponse) -> Self {
        Self {
            text: response.content,
        }
    }
}

// ============================================
// VISION DTOs
// ============================================

/// Image generation request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VisionRequest {
    pub prompt: String,
    pub model: String,
    pub width: u32,
    pub height: u32,
    pub seed: u32,
}

/// Image generation response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VisionResponse {
    pub image_url: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub seed: u32,
}
