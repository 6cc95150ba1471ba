#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use messages2cli::generator::{GenerateError, Generator};
use messages2cli::server::{build_router, AppState, Server};
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceExt;

/// What the stub generator does with every prompt.
#[derive(Debug, Clone)]
pub enum StubBehavior {
    Reply(String),
    Fail { code: i32, stderr: String },
    Timeout,
    Other(String),
}

/// In-process generator that records prompts and answers from a fixed script.
#[derive(Clone)]
pub struct StubGenerator {
    behavior: StubBehavior,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl StubGenerator {
    pub fn new(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn reply(text: &str) -> Self {
        Self::new(StubBehavior::Reply(text.to_string()))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.behavior {
            StubBehavior::Reply(text) => Ok(text.trim().to_string()),
            StubBehavior::Fail { code, stderr } => Err(GenerateError::Failed {
                program: "stub".into(),
                code: Some(*code),
                stderr: stderr.clone(),
            }),
            StubBehavior::Timeout => Err(GenerateError::Timeout {
                program: "stub".into(),
                timeout_secs: 120,
            }),
            StubBehavior::Other(msg) => Err(GenerateError::Other(msg.clone())),
        }
    }
}

/// Status and parsed body of a router response. Empty bodies become `Value::Null`.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub raw: Vec<u8>,
}

/// Router wrapper that drives requests with `oneshot`, no socket involved.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new(generator: StubGenerator) -> Self {
        Self {
            router: build_router(AppState::new(generator)),
        }
    }

    pub fn from_router(router: Router) -> Self {
        Self { router }
    }

    pub async fn request(&self, method: &str, uri: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to collect body");

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            body,
            raw: bytes.to_vec(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request("GET", uri, "").await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> TestResponse {
        self.request("POST", uri, &body.to_string()).await
    }
}

/// A real server bound to an ephemeral loopback port.
pub struct TestServer {
    pub base_url: String,
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<anyhow::Result<()>>>,
    client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn(state: AppState) -> Self {
        let server = Server::bind(SocketAddr::from(([127, 0, 0, 1], 0)), state)
            .await
            .expect("bind ephemeral port");
        let addr = server.local_addr();
        let (tx, rx) = oneshot::channel::<()>();
        let join = tokio::spawn(server.run_until(async move {
            let _ = rx.await;
        }));

        TestServer {
            base_url: format!("http://{addr}"),
            addr,
            shutdown: Some(tx),
            join: Some(join),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("failed building reqwest client"),
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("GET failed")
    }

    pub async fn post_raw(&self, path: &str, body: &str) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("POST failed")
    }

    /// Signal graceful shutdown and wait for the serve loop to return.
    pub async fn stop(mut self) -> anyhow::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.join.take() {
            Some(join) => join.await.expect("server task panicked"),
            None => Ok(()),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}

/// Minimal Messages request body.
pub fn sample_request() -> Value {
    serde_json::json!({
        "model": "claude-3-5-sonnet-latest",
        "max_tokens": 256,
        "system": "S",
        "messages": [
            {"role": "user", "content": "A"},
            {"role": "user", "content": "B"}
        ]
    })
}
