//! Credential holder shared between the provider adapter and the host's
//! key-selection flow.
//!
//! [`KeyStore`] is seeded once from [`AuthConfig`] and can be replaced at
//! runtime by [`KeyStore::select`] (e.g. after the user picks a different
//! key). Adapters call [`KeyStore::current`] on every request so a newly
//! selected key takes effect immediately.
//!
//! The store is thread-safe (`Send + Sync`) and designed to be shared
//! across async tasks behind an `Arc`.

use nb_domain::config::AuthConfig;
use nb_domain::error::{Error, Result};
use parking_lot::RwLock;

pub use crate::util::{keychain_fallback_env_name, resolve_api_key, store_in_keychain};

/// Holds the active API key, if any.
pub struct KeyStore {
    key: RwLock<Option<String>>,
}

impl KeyStore {
    /// A store with no key. Requests fail with [`Error::Auth`] until
    /// [`KeyStore::select`] is called.
    pub fn empty() -> Self {
        Self {
            key: RwLock::new(None),
        }
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: RwLock::new(Some(key.into())),
        }
    }

    /// Resolve the configured key source.
    ///
    /// An unresolvable source is not fatal here: the store starts empty so
    /// an interactive selector can still supply a key later.
    pub fn from_auth_config(auth: &AuthConfig) -> Self {
        match resolve_api_key(auth) {
            Ok(key) => Self::with_key(key),
            Err(e) => {
                tracing::warn!(error = %e, "no API key resolved at startup");
                Self::empty()
            }
        }
    }

    /// The key to use for the next request.
    pub fn current(&self) -> Result<String> {
        self.key
            .read()
            .clone()
            .ok_or_else(|| Error::Auth("no API key selected".into()))
    }

    pub fn is_selected(&self) -> bool {
        self.key.read().is_some()
    }

    /// Replace the active key.
    pub fn select(&self, key: impl Into<String>) {
        let key = key.into();
        if key.is_empty() {
            tracing::warn!("ignoring empty API key selection");
            return;
        }
        *self.key.write() = Some(key);
        tracing::info!("API key selected");
    }
}

// Manual Debug impl to avoid leaking key values.
impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStore")
            .field("selected", &self.is_selected())
            .finish()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
