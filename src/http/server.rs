//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Build shared state from configuration
//! - Bind server to listener and drain on shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Request};
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::ContactConfig;
use crate::http::handlers;
use crate::security::{ChallengeVerifier, RateLimiter};
use crate::store::{KvStore, MemoryKv, SubmissionStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ContactConfig>,
    pub submissions: Option<SubmissionStore>,
    pub rate_limiter: Option<RateLimiter>,
    pub verifier: Option<Arc<ChallengeVerifier>>,
}

/// UUID v4 request IDs for log correlation.
#[derive(Clone, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// HTTP server for the contact-form API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server with the store selected by `storage.backend`.
    pub fn new(config: ContactConfig) -> Self {
        let store: Option<Arc<dyn KvStore>> = match config.storage.backend.as_str() {
            "memory" => Some(Arc::new(MemoryKv::new())),
            _ => None,
        };
        Self::with_store(config, store)
    }

    /// Create a server around an externally supplied store. `None` runs
    /// the service unconfigured: submissions answer 503, listings 500.
    pub fn with_store(config: ContactConfig, store: Option<Arc<dyn KvStore>>) -> Self {
        let verifier = config.challenge.secret_key.as_ref().map(|secret| {
            Arc::new(ChallengeVerifier::new(
                config.challenge.verify_url.clone(),
                secret.clone(),
            ))
        });

        let (submissions, rate_limiter) = match store {
            Some(kv) => (
                Some(SubmissionStore::new(kv.clone(), config.storage.retention_days)),
                Some(RateLimiter::new(
                    kv,
                    config.rate_limit.window_secs,
                    config.rate_limit.max_requests,
                )),
            ),
            None => (None, None),
        };

        let state = AppState {
            config: Arc::new(config),
            submissions,
            rate_limiter,
            verifier,
        };

        let router = Self::build_router(state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let request_secs = state.config.timeouts.request_secs;
        Router::new()
            .route(
                "/api/contact",
                post(handlers::submit)
                    .get(handlers::list)
                    .options(handlers::preflight),
            )
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
