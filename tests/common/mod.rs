use std::{
    io,
    sync::{Arc, Mutex},
};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header::CONTENT_TYPE},
};
use broadcast_service::{
    api::{AppState, router},
    clients::MessagingProvider,
    errors::BroadcastError,
    models::multicast::{BatchResponse, MulticastMessage, SendResponse},
};
use serde_json::Value;
use tower::ServiceExt;
use tracing::{Level, Subscriber};

/// Provider double that replays a fixed outcome and records what it was asked to send.
pub struct MockProvider {
    outcome: Result<BatchResponse, BroadcastError>,
    sent: Mutex<Vec<MulticastMessage>>,
}

impl MockProvider {
    pub fn replying(responses: Vec<SendResponse>) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(BatchResponse::from_responses(responses)),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: BroadcastError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(error),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<MulticastMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingProvider for MockProvider {
    async fn send_multicast(
        &self,
        message: &MulticastMessage,
    ) -> Result<BatchResponse, BroadcastError> {
        self.sent.lock().unwrap().push(message.clone());
        self.outcome.clone()
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub raw_body: Vec<u8>,
    pub body: Value,
}

pub fn app(provider: Arc<MockProvider>) -> Router {
    router(Arc::new(AppState::new(provider)))
}

pub async fn call(app: Router, method: Method, uri: &str, body: Option<Value>) -> Result<TestResponse> {
    let body = match body {
        Some(json) => Body::from(json.to_string()),
        None => Body::empty(),
    };

    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(body)?;

    let response = app.oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let raw_body = to_bytes(response.into_body(), usize::MAX).await?.to_vec();
    let body = serde_json::from_slice(&raw_body).unwrap_or(Value::Null);

    Ok(TestResponse {
        status,
        headers,
        raw_body,
        body,
    })
}

pub async fn post(app: Router, body: Value) -> Result<TestResponse> {
    call(app, Method::POST, "/", Some(body)).await
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Subscriber that records `error` events into this buffer.
    pub fn error_subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        let writer = self.clone();

        tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(Level::ERROR)
            .finish()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
