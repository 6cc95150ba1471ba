use std::any::Any;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use http::StatusCode;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::config::ProxyConfig;
use crate::conversion::{build_prompt, to_messages_response, truncate_for_log};
use crate::error::ProxyError;
use crate::generator::Generator;
use crate::models::messages::MessagesRequest;
use crate::models::response::MessagesResponse;
use crate::util::{error_response, shutdown_signal};

/// Shared handler state. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn Generator>,
}

impl AppState {
    pub fn new(generator: impl Generator + 'static) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::new(config.generator())
    }
}

/// Build the router:
/// - `GET /health`
/// - `POST /v1/messages`
/// - everything else (including other methods on those paths) is an empty 404
///
/// `get` also answers HEAD, so HEAD is routed to the 404 handler explicitly.
/// Request bodies are unbounded; an oversized prompt fails at spawn time instead.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(health).head(not_found).fallback(not_found),
        )
        .route("/v1/messages", post(messages).fallback(not_found))
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

/// Liveness probe.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Translate a Messages request into one generator run and wrap its output.
///
/// The body is parsed here rather than through the `Json` extractor so that malformed
/// input always gets the JSON error envelope, whatever the `Content-Type`.
async fn messages(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessagesResponse>, ProxyError> {
    let req: MessagesRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "rejecting malformed messages request");
        ProxyError::from(e)
    })?;

    let prompt = build_prompt(&req);
    debug!(
        model = req.model.as_deref().unwrap_or("-"),
        messages = req.messages().len(),
        has_system = req.system_text().is_some(),
        "messages request"
    );
    info!("PROMPT:\n{}", truncate_for_log(&prompt));

    let text = state.generator.generate(&prompt).await.map_err(|e| {
        warn!(error = %e, "generation failed");
        ProxyError::from(e)
    })?;

    info!("RESPONSE:\n{}", truncate_for_log(&text));

    Ok(Json(to_messages_response(&prompt, text)))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    tracing::error!(panic = %detail, "request handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, &detail)
}

/// A bound HTTP server. Construct with [`Server::bind`], then run until shutdown.
pub struct Server {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
}

impl Server {
    pub async fn bind(addr: SocketAddr, state: AppState) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind to {addr}"))?;
        let local_addr = listener
            .local_addr()
            .context("Failed to read bound address")?;
        Ok(Self {
            listener,
            router: build_router(state),
            local_addr,
        })
    }

    /// Bind using the address and generator from `config`.
    pub async fn from_config(config: &ProxyConfig) -> anyhow::Result<Self> {
        Self::bind(config.bind_addr, AppState::from_config(config)).await
    }

    /// Actual listening address (useful when bound to port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until `shutdown` resolves, then finish in-flight requests and return.
    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("messages2cli listening on http://{}", self.local_addr);
        axum::serve(self.listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .context("Server error")?;
        info!("messages2cli stopped");
        Ok(())
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_until(shutdown_signal()).await
    }
}
