//! End-to-end tests for the Florê backend.
//!
//! Each test starts the real router on an ephemeral port over a store file
//! in a temporary directory, then talks to it with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p flore-integration-tests
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use reqwest::{Client, RequestBuilder};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use flore_server::{AppState, ServerConfig, app};

/// Admin password used to bootstrap every test store.
pub const ADMIN_PASSWORD: &str = "orquideas-raras-2024";

/// A running server bound to `127.0.0.1` on an ephemeral port.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pub data_path: PathBuf,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Start a server over the store at `data_path`, bootstrapping it with
    /// [`ADMIN_PASSWORD`] if it is empty.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be opened or the listener cannot bind.
    pub async fn start(data_path: &Path) -> Self {
        Self::start_with(data_path, |_| {}).await
    }

    /// Like [`TestServer::start`], with a hook to adjust the configuration.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be opened or the listener cannot bind.
    pub async fn start_with(data_path: &Path, configure: impl FnOnce(&mut ServerConfig)) -> Self {
        let mut config = ServerConfig::for_tests(data_path);
        config.admin_password = Some(SecretString::from(ADMIN_PASSWORD));
        configure(&mut config);

        let state = AppState::open(config)
            .await
            .expect("Failed to open test store");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let (tx, rx) = oneshot::channel::<()>();
        let service = app(state).into_make_service_with_connect_info::<SocketAddr>();
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, service)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await;
        });

        Self {
            base_url: format!("http://{addr}"),
            client: Client::new(),
            data_path: data_path.to_path_buf(),
            shutdown: Some(tx),
            task,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Log in with [`ADMIN_PASSWORD`] and return the bearer token.
    ///
    /// # Panics
    ///
    /// Panics if the login request fails or returns no token.
    pub async fn login(&self) -> String {
        let resp = self
            .client
            .post(self.url("/api/admin/login"))
            .json(&json!({ "password": ADMIN_PASSWORD }))
            .send()
            .await
            .expect("Login request failed");
        assert_eq!(resp.status(), 200, "admin login should succeed");
        let body: Value = resp.json().await.expect("Login response is not JSON");
        body["token"]
            .as_str()
            .expect("Login response has no token")
            .to_string()
    }

    /// A request builder with the admin bearer token attached.
    #[must_use]
    pub fn admin(&self, method: reqwest::Method, path: &str, token: &str) -> RequestBuilder {
        self.client.request(method, self.url(path)).bearer_auth(token)
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.task).await;
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
