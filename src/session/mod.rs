//! Session / Credential Lifecycle
//!
//! The only stateful protocol in the client:
//!
//! ```text
//! Refreshing ──refresh ok──▶ Authenticated ──logout──▶ Unauthenticated
//!      └──────refresh failed─────────────────────────────▶ Unauthenticated
//! ```
//!
//! An `Authenticated` session whose credential is rejected goes through
//! [`Session::authorized`]: one refresh, then one resend of the original
//! request. A failed refresh ends the session.

pub mod credential;

pub use credential::{Credential, CredentialStore, MemoryStore};
#[cfg(not(target_arch = "wasm32"))]
pub use credential::FileStore;

use std::cell::RefCell;
use std::future::Future;

use crate::api::{self, ApiError, ApiResult, Backend, LoginRequest, UserProfile};

/// Coarse session phase used for routing and rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// Silent refresh in progress; nothing protected may render yet
    Refreshing,
    Authenticated,
    Unauthenticated,
}

/// Session state, owning the current credential
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Refreshing,
    Authenticated(Credential),
    Unauthenticated,
}

impl AuthState {
    pub fn phase(&self) -> AuthPhase {
        match self {
            AuthState::Refreshing => AuthPhase::Refreshing,
            AuthState::Authenticated(_) => AuthPhase::Authenticated,
            AuthState::Unauthenticated => AuthPhase::Unauthenticated,
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        match self {
            AuthState::Authenticated(credential) => Some(credential),
            _ => None,
        }
    }
}

type Listener = Box<dyn Fn(AuthPhase, Option<UserProfile>)>;

/// Explicit session context: current credential, profile, and the backend
/// they authorize.
///
/// Single-threaded by construction. State lives in `RefCell`s and no borrow
/// is held across an `.await`.
pub struct Session<B, S> {
    backend: B,
    store: S,
    state: RefCell<AuthState>,
    profile: RefCell<Option<UserProfile>>,
    listener: RefCell<Option<Listener>>,
}

impl<B: Backend, S: CredentialStore> Session<B, S> {
    /// Create a session in the `Refreshing` state. Call [`Session::bootstrap`]
    /// before trusting any credential.
    pub fn new(backend: B, store: S) -> Self {
        Self {
            backend,
            store,
            state: RefCell::new(AuthState::Refreshing),
            profile: RefCell::new(None),
            listener: RefCell::new(None),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> AuthPhase {
        self.state.borrow().phase()
    }

    pub fn credential(&self) -> Option<Credential> {
        self.state.borrow().credential().cloned()
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.profile.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase() == AuthPhase::Authenticated
    }

    /// Register a callback fired after every state or profile change
    pub fn set_listener(&self, listener: impl Fn(AuthPhase, Option<UserProfile>) + 'static) {
        *self.listener.borrow_mut() = Some(Box::new(listener));
    }

    /// Resolve the initial `Refreshing` state with a silent refresh, then load
    /// the profile. A failed profile lookup does not sign the user out.
    pub async fn bootstrap(&self) -> AuthPhase {
        if self.refresh().await.is_some() {
            self.load_profile().await;
        }
        let phase = self.phase();
        tracing::debug!(?phase, "Session bootstrapped");
        phase
    }

    /// Mint a new credential from the renewal cookie.
    ///
    /// Any failure clears the stored credential and leaves the session
    /// unauthenticated.
    pub async fn refresh(&self) -> Option<Credential> {
        match self.backend.refresh().await {
            Ok(response) => {
                let credential = Credential::new(response.access);
                self.adopt(credential.clone());
                Some(credential)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed");
                self.sign_out();
                None
            }
        }
    }

    /// Sign in. The login response's user becomes the session profile.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<UserProfile> {
        let response = api::auth::login(&self.backend, request).await?;
        *self.profile.borrow_mut() = Some(response.user.clone());
        self.adopt(Credential::new(response.access));
        Ok(response.user)
    }

    /// Sign out. There is no backend logout call; the transport only drops
    /// its renewal cookie.
    pub fn logout(&self) {
        tracing::info!("Signed out");
        self.sign_out();
    }

    /// Fetch the profile for the current credential, keeping it on success
    pub async fn load_profile(&self) -> Option<UserProfile> {
        let credential = self.credential()?;
        match api::auth::fetch_user(&self.backend, &credential).await {
            Ok(profile) => {
                *self.profile.borrow_mut() = Some(profile.clone());
                self.notify();
                Some(profile)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Profile lookup failed");
                None
            }
        }
    }

    /// Run `request` with the current credential, refreshing and resending
    /// exactly once if the backend answers 401.
    ///
    /// Only [`ApiError::Unauthorized`] triggers the retry. A failed refresh
    /// yields [`ApiError::SessionExpired`]; a second 401 is returned as is.
    pub async fn authorized<T, F, Fut>(&self, mut request: F) -> ApiResult<T>
    where
        F: FnMut(Credential) -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let Some(credential) = self.credential() else {
            return Err(ApiError::SessionExpired);
        };

        match request(credential).await {
            Err(ApiError::Unauthorized) => {
                tracing::debug!("Access token rejected, refreshing once");
                let fresh = self.refresh().await.ok_or(ApiError::SessionExpired)?;
                request(fresh).await
            }
            result => result,
        }
    }

    fn adopt(&self, credential: Credential) {
        self.store.save(&credential);
        *self.state.borrow_mut() = AuthState::Authenticated(credential);
        self.notify();
    }

    fn sign_out(&self) {
        self.store.clear();
        self.backend.forget_session();
        *self.state.borrow_mut() = AuthState::Unauthenticated;
        *self.profile.borrow_mut() = None;
        self.notify();
    }

    fn notify(&self) {
        let phase = self.phase();
        let profile = self.profile();
        if let Some(listener) = self.listener.borrow().as_ref() {
            listener(phase, profile);
        }
    }
}
