//! Application state shared across handlers.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tower_sessions::cookie::Key;

use crate::config::{AdminConfig, ConfigError};
use crate::db::Store;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The store is a trait object so the same
/// router runs against `PostgreSQL` in production and in memory in tests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: Arc<dyn Store>,
    session_key: Key,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InsecureSecret` if the session secret is too
    /// short to derive a cookie signing key.
    pub fn new(config: AdminConfig, store: Arc<dyn Store>) -> Result<Self, ConfigError> {
        let session_key = Key::try_from(config.session_secret.expose_secret().as_bytes())
            .map_err(|e| {
                ConfigError::InsecureSecret("ROYA_SESSION_SECRET".to_string(), e.to_string())
            })?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                session_key,
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the data store.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    /// Key used to sign the session cookie.
    #[must_use]
    pub fn session_key(&self) -> &Key {
        &self.inner.session_key
    }
}
