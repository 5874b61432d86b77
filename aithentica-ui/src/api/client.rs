//! HTTP API Client
//!
//! Fetch-based transport for the Aithentica backend. Every request includes
//! cookies so the browser sends the HttpOnly renewal token.

use aithentica::api::{
    endpoint_url, endpoints, ApiError, ApiResult, Backend, ChatReply, HistoryEntry, LoginRequest,
    LoginResponse, PollinationsChatRequest, ProviderChatRequest, ProviderChatResponse,
    RefreshResponse, RegisterRequest, RegisteredUser, UserProfile, VisionRequest, VisionResponse,
    DEFAULT_API_BASE,
};
use aithentica::Credential;
use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::RequestCredentials;

/// Local storage key holding a base URL override
const API_URL_KEY: &str = "aithentica_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    normalize_base(&url)
}

fn normalize_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Browser [`Backend`] over `fetch`
#[derive(Debug, Clone)]
pub struct WebBackend {
    base_url: String,
}

impl Default for WebBackend {
    fn default() -> Self {
        Self::new(get_api_base())
    }
}

impl WebBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn get(&self, path: &str, credential: &Credential) -> RequestBuilder {
        Request::get(&endpoint_url(&self.base_url, path))
            .credentials(RequestCredentials::Include)
            .header("Authorization", &credential.bearer())
    }

    fn post(&self, path: &str, credential: Option<&Credential>) -> RequestBuilder {
        let builder =
            Request::post(&endpoint_url(&self.base_url, path)).credentials(RequestCredentials::Include);
        match credential {
            Some(credential) => builder.header("Authorization", &credential.bearer()),
            None => builder,
        }
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        credential: Option<&Credential>,
    ) -> ApiResult<T> {
        let request = self
            .post(path, credential)
            .json(body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        send(request).await
    }
}

async fn send<T: DeserializeOwned>(request: Request) -> ApiResult<T> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(ApiError::from_status(status, &text));
    }

    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

async fn send_get<T: DeserializeOwned>(builder: RequestBuilder) -> ApiResult<T> {
    let request = builder
        .build()
        .map_err(|e| ApiError::Network(e.to_string()))?;
    send(request).await
}

#[async_trait(?Send)]
impl Backend for WebBackend {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        self.post_json(endpoints::LOGIN, request, None).await
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<RegisteredUser> {
        self.post_json(endpoints::REGISTER, request, None).await
    }

    async fn current_user(&self, credential: &Credential) -> ApiResult<UserProfile> {
        send_get(self.get(endpoints::CURRENT_USER, credential)).await
    }

    async fn refresh(&self) -> ApiResult<RefreshResponse> {
        self.post_json(endpoints::TOKEN_REFRESH, &serde_json::json!({}), None)
            .await
    }

    async fn chat_history(&self, credential: &Credential) -> ApiResult<Vec<HistoryEntry>> {
        send_get(self.get(endpoints::CHAT_HISTORY, credential)).await
    }

    async fn chat_pollinations(
        &self,
        credential: &Credential,
        request: &PollinationsChatRequest,
    ) -> ApiResult<ChatReply> {
        self.post_json(endpoints::CHAT_POLLINATIONS, request, Some(credential))
            .await
    }

    async fn chat(
        &self,
        credential: &Credential,
        request: &ProviderChatRequest,
    ) -> ApiResult<ProviderChatResponse> {
        self.post_json(endpoints::CHAT, request, Some(credential))
            .await
    }

    async fn generate_image(
        &self,
        credential: &Credential,
        request: &VisionRequest,
    ) -> ApiResult<VisionResponse> {
        self.post_json(endpoints::VISION, request, Some(credential))
            .await
    }
}
