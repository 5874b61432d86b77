//! Auth calls
//!
//! Thin wrappers that add logging around the auth endpoints. Session state is
//! handled by [`crate::session::Session`], not here.

use super::{ApiResult, Backend, LoginRequest, LoginResponse, RegisterRequest, RegisteredUser, UserProfile};
use crate::session::Credential;

/// Exchange username and password for an access token and profile
pub async fn login<B: Backend + ?Sized>(backend: &B, request: &LoginRequest) -> ApiResult<LoginResponse> {
    let result = backend.login(request).await;
    match &result {
        Ok(response) => tracing::info!(username = %response.user.username, "Logged in"),
        Err(e) => tracing::warn!(username = %request.username, error = %e, "Login failed"),
    }
    result
}

/// Create an account. Does not sign the user in.
pub async fn register<B: Backend + ?Sized>(
    backend: &B,
    request: &RegisterRequest,
) -> ApiResult<RegisteredUser> {
    let result = backend.register(request).await;
    if let Err(e) = &result {
        tracing::warn!(username = %request.username, error = %e, "Registration rejected");
    }
    result
}

/// Look up the user the credential belongs to
pub async fn fetch_user<B: Backend + ?Sized>(backend: &B, credential: &Credential) -> ApiResult<UserProfile> {
    backend.current_user(credential).await
}

/// Message shown after a successful registration
pub fn welcome_message(user: &RegisteredUser) -> String {
    format!("Registration successful! Welcome {}", user.username)
}
