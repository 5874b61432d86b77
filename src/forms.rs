//! Login and registration forms
//!
//! Validation runs before any request is built, so a rejected form never
//! reaches the backend.

use crate::api::{ApiError, FieldErrors, LoginRequest, RegisterRequest, UNKNOWN_ERROR};

pub const MISSING_LOGIN_FIELDS: &str = "Both fields are required";
pub const MISSING_REGISTER_FIELDS: &str = "All fields are required";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const SERVER_UNREACHABLE: &str = "Cannot connect to server. Please try again later.";
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, String> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(MISSING_LOGIN_FIELDS.to_string());
        }
        Ok(LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, FieldErrors> {
        let fields = [&self.username, &self.email, &self.password, &self.password2];
        if fields.iter().any(|field| field.is_empty()) {
            return Err(FieldErrors::general_only(MISSING_REGISTER_FIELDS));
        }
        if self.password != self.password2 {
            let mut errors = FieldErrors::default();
            errors.insert("password2", PASSWORD_MISMATCH);
            return Err(errors);
        }
        Ok(RegisterRequest {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            password2: self.password2.clone(),
        })
    }
}

/// Inline message for a failed login
pub fn login_error_message(error: &ApiError) -> String {
    if let Some(detail) = error.detail() {
        return detail.to_string();
    }
    match error {
        ApiError::Network(_) => SERVER_UNREACHABLE.to_string(),
        _ => LOGIN_FAILED.to_string(),
    }
}

/// Field errors for a failed registration
pub fn registration_errors(error: &ApiError) -> FieldErrors {
    match error {
        ApiError::Validation(errors) if !errors.is_empty() => errors.clone(),
        _ => FieldErrors::general_only(UNKNOWN_ERROR),
    }
}
