//! Integration test harness for Roya.
//!
//! Each [`TestApp`] serves the real router on an ephemeral local port, backed
//! by an in-memory data store and an in-memory session store, so the tests
//! need no database.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p roya-integration-tests
//! ```

use std::sync::Arc;

use reqwest::{Client, Response, StatusCode, redirect::Policy};
use roya_admin::config::{AdminConfig, BootstrapAdmin};
use roya_admin::db::{MemoryStore, UserStore};
use roya_admin::models::User;
use roya_admin::routes;
use roya_admin::services::hash_password;
use roya_admin::state::AppState;
use roya_core::DateStyle;
use secrecy::SecretString;

/// Username of the admin created by the bootstrap routine.
pub const ADMIN_USERNAME: &str = "admin";

/// Password of the admin created by the bootstrap routine.
pub const ADMIN_PASSWORD: &str = "first-run-pass";

const SESSION_SECRET: &str =
    "k7Qm2vX9pL4wR8tZ1nB6yH3cJ5fD0gS2aE7uI9oP4xV6bN8mC1qW3eR5tY7uK9zLq";

/// A running application plus a cookie-keeping client.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    /// Start a fresh application with an empty store.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn spawn() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state =
            AppState::new(test_config(), store.clone()).expect("Failed to create app state");
        let app = routes::app(state, tower_sessions::MemoryStore::default());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: new_client(),
            store,
        }
    }

    /// A second, independent browser against the same server.
    #[must_use]
    pub fn other_client(&self) -> Client {
        new_client()
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Trigger the first-visit bootstrap.
    pub async fn bootstrap(&self) {
        let response = self.get("/").await;
        assert_eq!(location(&response), Some("/"));
    }

    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.post_form("/login", &[("username", username), ("password", password)])
            .await
    }

    /// Bootstrap the admin and log this client in as it.
    pub async fn login_admin(&self) {
        self.bootstrap().await;
        let response = self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
        assert_eq!(location(&response), Some("/"));
    }

    /// Insert a user directly into the store.
    ///
    /// # Panics
    ///
    /// Panics if hashing or the insert fails.
    pub async fn add_user(&self, username: &str, password: &str, is_admin: bool) {
        let password_hash = hash_password(SecretString::from(password.to_owned()))
            .await
            .expect("Failed to hash password");
        self.store
            .insert_user(&User {
                username: username.to_owned(),
                password_hash,
                is_admin,
            })
            .await
            .expect("Failed to insert user");
    }
}

/// The `Location` header of a redirect, if any.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    if response.status() != StatusCode::SEE_OTHER {
        return None;
    }
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// Read a response body.
///
/// # Panics
///
/// Panics if the body cannot be read.
pub async fn body(response: Response) -> String {
    response.text().await.expect("Failed to read response body")
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

fn test_config() -> AdminConfig {
    AdminConfig {
        database_url: SecretString::from("postgres://unused"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://127.0.0.1".to_owned(),
        session_secret: SecretString::from(SESSION_SECRET),
        bootstrap: BootstrapAdmin {
            username: ADMIN_USERNAME.to_owned(),
            password: SecretString::from(ADMIN_PASSWORD),
        },
        date_style: DateStyle::Jalali,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}
