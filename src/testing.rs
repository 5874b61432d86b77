//! Scripted in-memory backend for unit tests

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::api::*;
use crate::session::Credential;

type Script<T> = RefCell<VecDeque<ApiResult<T>>>;

/// Backend that replays queued responses and records every call.
///
/// An endpoint with nothing queued fails with a network error.
#[derive(Default)]
pub struct FakeBackend {
    login: Script<LoginResponse>,
    register: Script<RegisteredUser>,
    user: Script<UserProfile>,
    refresh: Script<RefreshResponse>,
    history: Script<Vec<HistoryEntry>>,
    pollinations: Script<ChatReply>,
    chat: Script<ProviderChatResponse>,
    vision: Script<VisionResponse>,
    calls: RefCell<Vec<&'static str>>,
    tokens: RefCell<Vec<String>>,
    chat_requests: RefCell<Vec<ProviderChatRequest>>,
    pollinations_requests: RefCell<Vec<PollinationsChatRequest>>,
    vision_requests: RefCell<Vec<VisionRequest>>,
    forgotten: Cell<usize>,
}

pub fn profile(username: &str) -> UserProfile {
    UserProfile {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        token_usage: TokenUsage::default(),
    }
}

fn next<T>(script: &Script<T>) -> ApiResult<T> {
    script
        .borrow_mut()
        .pop_front()
        .unwrap_or_else(|| Err(ApiError::Network("no scripted response".into())))
}

impl FakeBackend {
    pub fn push_login(&self, result: ApiResult<LoginResponse>) {
        self.login.borrow_mut().push_back(result);
    }

    pub fn push_login_ok(&self, token: &str, username: &str) {
        self.push_login(Ok(LoginResponse {
            access: token.to_string(),
            user: profile(username),
        }));
    }

    pub fn push_register(&self, result: ApiResult<RegisteredUser>) {
        self.register.borrow_mut().push_back(result);
    }

    pub fn push_user(&self, result: ApiResult<UserProfile>) {
        self.user.borrow_mut().push_back(result);
    }

    pub fn push_refresh(&self, result: ApiResult<RefreshResponse>) {
        self.refresh.borrow_mut().push_back(result);
    }

    pub fn push_refresh_ok(&self, token: &str) {
        self.push_refresh(Ok(RefreshResponse {
            access: token.to_string(),
            refresh: None,
        }));
    }

    pub fn push_history(&self, result: ApiResult<Vec<HistoryEntry>>) {
        self.history.borrow_mut().push_back(result);
    }

    pub fn push_pollinations(&self, result: ApiResult<ChatReply>) {
        self.pollinations.borrow_mut().push_back(result);
    }

    pub fn push_chat(&self, result: ApiResult<ProviderChatResponse>) {
        self.chat.borrow_mut().push_back(result);
    }

    pub fn push_vision(&self, result: ApiResult<VisionResponse>) {
        self.vision.borrow_mut().push_back(result);
    }

    /// Endpoint names in call order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    /// Access tokens presented by authenticated calls, in order
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.borrow().clone()
    }

    pub fn chat_requests(&self) -> Vec<ProviderChatRequest> {
        self.chat_requests.borrow().clone()
    }

    pub fn pollinations_requests(&self) -> Vec<PollinationsChatRequest> {
        self.pollinations_requests.borrow().clone()
    }

    pub fn vision_requests(&self) -> Vec<VisionRequest> {
        self.vision_requests.borrow().clone()
    }

    /// Times the session told the transport to drop its renewal cookie
    pub fn forgotten(&self) -> usize {
        self.forgotten.get()
    }

    fn record(&self, call: &'static str, credential: Option<&Credential>) {
        self.calls.borrow_mut().push(call);
        if let Some(credential) = credential {
            self.tokens.borrow_mut().push(credential.as_str().to_string());
        }
    }
}

#[async_trait(?Send)]
impl Backend for FakeBackend {
    async fn login(&self, _request: &LoginRequest) -> ApiResult<LoginResponse> {
        self.record("login", None);
        next(&self.login)
    }

    async fn register(&self, _request: &RegisterRequest) -> ApiResult<RegisteredUser> {
        self.record("register", None);
        next(&self.register)
    }

    async fn current_user(&self, credential: &Credential) -> ApiResult<UserProfile> {
        self.record("current_user", Some(credential));
        next(&self.user)
    }

    async fn refresh(&self) -> ApiResult<RefreshResponse> {
        self.record("refresh", None);
        next(&self.refresh)
    }

    async fn chat_history(&self, credential: &Credential) -> ApiResult<Vec<HistoryEntry>> {
        self.record("chat_history", Some(credential));
        next(&self.history)
    }

    async fn chat_pollinations(
        &self,
        credential: &Credential,
        request: &PollinationsChatRequest,
    ) -> ApiResult<ChatReply> {
        self.record("chat_pollinations", Some(credential));
        self.pollinations_requests.borrow_mut().push(request.clone());
        next(&self.pollinations)
    }

    async fn chat(
        &self,
        credential: &Credential,
        request: &ProviderChatRequest,
    ) -> ApiResult<ProviderChatResponse> {
        self.record("chat", Some(credential));
        self.chat_requests.borrow_mut().push(request.clone());
        next(&self.chat)
    }

    async fn generate_image(
        &self,
        credential: &Credential,
        request: &VisionRequest,
    ) -> ApiResult<VisionResponse> {
        self.record("generate_image", Some(credential));
        self.vision_requests.borrow_mut().push(request.clone());
        next(&self.vision)
    }

    fn forget_session(&self) {
        self.forgotten.set(self.forgotten.get() + 1);
    }
}
