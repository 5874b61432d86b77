//! Access credential and its persistent mirror

use std::cell::RefCell;

/// Short-lived bearer token authorizing API calls
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Mirror of the current credential outside the process.
///
/// [`Session`](super::Session) only writes to it: every start goes through a
/// silent refresh, so a stored token is never trusted on its own.
pub trait CredentialStore {
    /// What the mirror currently holds. Not read by the session.
    fn load(&self) -> Option<Credential>;
    fn save(&self, credential: &Credential);
    fn clear(&self);
}

/// Process-local store, used when nothing should outlive the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<Credential>>,
}

impl MemoryStore {
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: RefCell::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Option<Credential> {
        self.slot.borrow().clone()
    }

    fn save(&self, credential: &Credential) {
        *self.slot.borrow_mut() = Some(credential.clone());
    }

    fn clear(&self) {
        *self.slot.borrow_mut() = None;
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use super::{Credential, CredentialStore};
    use std::path::{Path, PathBuf};

    /// Credential kept in a single file under the data directory
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        /// File name used inside the data directory
        pub const FILE_NAME: &'static str = "access_token";

        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn in_dir(dir: &Path) -> Self {
            Self::new(dir.join(Self::FILE_NAME))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl CredentialStore for FileStore {
        fn load(&self) -> Option<Credential> {
            let token = std::fs::read_to_string(&self.path).ok()?;
            let token = token.trim();
            if token.is_empty() {
                None
            } else {
                Some(Credential::new(token))
            }
        }

        fn save(&self, credential: &Credential) {
            if let Some(parent) = self.path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    tracing::warn!("Failed to create {:?}: {}", parent, e);
                    return;
                }
            }
            if let Err(e) = std::fs::write(&self.path, credential.as_str()) {
                tracing::warn!("Failed to store credential at {:?}: {}", self.path, e);
            }
        }

        fn clear(&self) {
            match std::fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("Failed to remove {:?}: {}", self.path, e),
            }
        }
    }
}
