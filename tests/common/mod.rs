//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use contact_api::config::ContactConfig;
use contact_api::store::{KvError, KvListPage, KvStore, MemoryKv, PutOptions};
use contact_api::{HttpServer, Shutdown};

/// Bind a server on an ephemeral port and run it until `Shutdown` fires.
pub async fn spawn_server(config: ContactConfig) -> (SocketAddr, Shutdown) {
    let store: Arc<dyn KvStore> = Arc::new(MemoryKv::new());
    spawn_server_with_store(config, Some(store)).await
}

/// Same, but with an injected store (or none, to exercise the
/// unconfigured paths).
pub async fn spawn_server_with_store(
    config: ContactConfig,
    store: Option<Arc<dyn KvStore>>,
) -> (SocketAddr, Shutdown) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = HttpServer::with_store(config, store);
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

/// Test config with generous limits so unrelated checks stay quiet.
pub fn test_config() -> ContactConfig {
    let mut config = ContactConfig::default();
    config.rate_limit.max_requests = 100;
    config
}

pub fn contact_url(addr: SocketAddr) -> String {
    format!("http://{addr}/api/contact")
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// A well-formed JSON submission body.
#[allow(dead_code)]
pub fn valid_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Ada Lovelace",
        "email": "Ada@Example.com",
        "message": "m".repeat(60),
        "cf-turnstile-response": "test-token",
    })
}

/// Store whose operations always fail, for exercising 500 paths.
#[allow(dead_code)]
pub struct FailingKv;

#[async_trait]
impl KvStore for FailingKv {
    async fn get(&self, _key: &str) -> Result<Option<String>, KvError> {
        Err(KvError::Backend("injected failure".into()))
    }

    async fn put(&self, _key: &str, _value: String, _opts: PutOptions) -> Result<(), KvError> {
        Err(KvError::Backend("injected failure".into()))
    }

    async fn list(
        &self,
        _prefix: &str,
        _limit: usize,
        _cursor: Option<&str>,
    ) -> Result<KvListPage, KvError> {
        Err(KvError::Backend("injected failure".into()))
    }
}
