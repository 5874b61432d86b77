//! Auth State
//!
//! Wraps the shared [`Session`] in reactive signals. The session notifies on
//! every transition and the listener mirrors phase and profile into signals,
//! so views never read the session's cells directly.

use aithentica::api::UserProfile;
use aithentica::{AuthPhase, Credential, CredentialStore, Session};
use leptos::*;
use std::rc::Rc;

use crate::api::WebBackend;

/// Local storage key for the access token
const ACCESS_TOKEN_KEY: &str = "accessToken";

pub type WebSession = Session<WebBackend, LocalStorageStore>;

/// Access token mirrored to `localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl CredentialStore for LocalStorageStore {
    fn load(&self) -> Option<Credential> {
        let token = Self::storage()?.get_item(ACCESS_TOKEN_KEY).ok().flatten()?;
        Some(Credential::new(token))
    }

    fn save(&self, credential: &Credential) {
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(ACCESS_TOKEN_KEY, credential.as_str());
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(ACCESS_TOKEN_KEY);
        }
    }
}

/// Session context provided to all components
#[derive(Clone)]
pub struct AuthContext {
    pub session: Rc<WebSession>,
    /// Mirrors `session.phase()`
    pub phase: RwSignal<AuthPhase>,
    /// Mirrors `session.profile()`
    pub user: RwSignal<Option<UserProfile>>,
}

impl AuthContext {
    pub fn logout(&self) {
        self.session.logout();
    }
}

/// Create the session, provide it, and start the silent refresh
pub fn provide_auth() {
    let session = Rc::new(Session::new(WebBackend::default(), LocalStorageStore));
    let phase = create_rw_signal(session.phase());
    let user = create_rw_signal(None::<UserProfile>);

    session.set_listener(move |next, profile| {
        phase.set(next);
        user.set(profile);
    });

    provide_context(AuthContext {
        session: Rc::clone(&session),
        phase,
        user,
    });

    spawn_local(async move {
        session.bootstrap().await;
    });
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext not found")
}
