use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State, rejection::BytesRejection},
    http::{
        HeaderValue, Method, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
    response::{IntoResponse, Json, Response},
    routing::{any, get},
};
use tokio::net::TcpListener;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    clients::MessagingProvider,
    config::Config,
    errors::BroadcastError,
    models::{
        broadcast::BroadcastResult, health::HealthCheckResponse, multicast::MulticastMessage,
        validation::parse_broadcast_request,
    },
};

pub const ONLY_POST_ACCEPTED: &str = "Only POST requests are accepted";

pub struct AppState {
    provider: Arc<dyn MessagingProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn MessagingProvider>) -> Self {
        Self { provider }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", any(send_broadcast))
        .route("/sendBroadcastMessage", any(send_broadcast))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::disable())
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server(
    config: Config,
    provider: Arc<dyn MessagingProvider>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(provider));
    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Broadcast server started");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn send_broadcast(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    if method == Method::OPTIONS {
        return (
            StatusCode::NO_CONTENT,
            [
                (ACCESS_CONTROL_ALLOW_METHODS, "POST"),
                (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
            ],
        )
            .into_response();
    }

    let request_id = Uuid::new_v4();

    match broadcast(state.provider.as_ref(), &method, body, request_id).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            error!(%request_id, error = %e, "Error sending broadcast");
            e.into_response()
        }
    }
}

async fn broadcast(
    provider: &dyn MessagingProvider,
    method: &Method,
    body: Result<Bytes, BytesRejection>,
    request_id: Uuid,
) -> Result<BroadcastResult, BroadcastError> {
    if *method != Method::POST {
        return Err(BroadcastError::validation(ONLY_POST_ACCEPTED));
    }

    let body = body.map_err(|rejection| {
        BroadcastError::validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;
    let request = parse_broadcast_request(&body)?;
    let message = MulticastMessage::from(request);

    info!(
        %request_id,
        token_count = message.tokens.len(),
        "Sending broadcast"
    );

    let batch = provider.send_multicast(&message).await?;
    let result = BroadcastResult::from_batch(&message.tokens, &batch);

    info!(
        %request_id,
        success = result.success,
        failure = result.failure,
        "Broadcast delivered"
    );

    Ok(result)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthCheckResponse::healthy()))
}
