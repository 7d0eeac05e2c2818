use std::sync::Arc;

use anyhow::{Error, Result};
use async_trait::async_trait;
use futures_util::{StreamExt, stream};
use gcp_auth::TokenProvider;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    clients::MessagingProvider,
    config::Config,
    errors::BroadcastError,
    models::{
        fcm::{FcmErrorEnvelope, FcmMessage, FcmNotification, FcmRequest, FcmSendResponse},
        multicast::{BatchResponse, MulticastMessage, SendResponse},
    },
};

pub const MAX_MULTICAST_TOKENS: usize = 500;

const FCM_SCOPES: &[&str] = &["https://www.googleapis.com/auth/firebase.messaging"];

enum AccessToken {
    Static(String),
    ApplicationDefault(Arc<dyn TokenProvider>),
}

const LOGGED_TOKEN_CHARS: usize = 8;

/// Leading characters of a device token, enough to correlate log lines.
pub fn token_prefix(device_token: &str) -> &str {
    let end = device_token
        .char_indices()
        .nth(LOGGED_TOKEN_CHARS)
        .map_or(device_token.len(), |(i, _)| i);
    &device_token[..end]
}

/// Multicast over FCM HTTP v1: one `messages:send` call per token.
pub struct FcmClient {
    http_client: Client,
    send_url: String,
    access_token: AccessToken,
    concurrency: usize,
}

impl FcmClient {
    pub async fn new(config: &Config) -> Result<Self, Error> {
        let access_token = match &config.fcm_access_token {
            Some(token) => AccessToken::Static(token.clone()),
            None => AccessToken::ApplicationDefault(gcp_auth::provider().await?),
        };

        info!(project_id = %config.fcm_project_id, "FCM client initialized");

        Ok(Self {
            http_client: Client::new(),
            send_url: config.fcm_send_url(),
            access_token,
            concurrency: config.multicast_concurrency,
        })
    }

    async fn bearer_token(&self) -> Result<String, BroadcastError> {
        match &self.access_token {
            AccessToken::Static(token) => Ok(token.clone()),
            AccessToken::ApplicationDefault(provider) => provider
                .token(FCM_SCOPES)
                .await
                .map(|token| token.as_str().to_string())
                .map_err(|e| {
                    BroadcastError::provider(format!("Failed to obtain FCM access token: {}", e))
                }),
        }
    }

    async fn send_one(
        &self,
        bearer: &str,
        device_token: &str,
        message: &MulticastMessage,
    ) -> SendResponse {
        let request = FcmRequest {
            message: FcmMessage {
                token: device_token,
                notification: FcmNotification {
                    title: &message.notification.title,
                    body: &message.notification.body,
                },
                data: (!message.data.is_empty()).then_some(&message.data),
            },
        };

        let response = match self
            .http_client
            .post(&self.send_url)
            .bearer_auth(bearer)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    token_prefix = token_prefix(device_token),
                    error = %e,
                    "FCM request could not be sent"
                );
                return SendResponse::failed(e.to_string(), None);
            }
        };

        let status = response.status();

        if status.is_success() {
            let message_id = response
                .json::<FcmSendResponse>()
                .await
                .ok()
                .and_then(|r| r.name);
            debug!(device_token, ?message_id, "FCM push notification sent");
            return SendResponse::delivered(message_id);
        }

        let error_text = response.text().await.unwrap_or_default();

        let failed = match serde_json::from_str::<FcmErrorEnvelope>(&error_text) {
            Ok(envelope) if !envelope.error.message.is_empty() => {
                let code = envelope.error.error_code();
                SendResponse::failed(envelope.error.message, code)
            }
            _ => SendResponse::failed(
                format!(
                    "FCM request failed with status {}: {}",
                    status.as_u16(),
                    error_text
                ),
                None,
            ),
        };

        warn!(
            token_prefix = token_prefix(device_token),
            status = status.as_u16(),
            error = ?failed.error,
            "FCM rejected push notification"
        );

        failed
    }
}

#[async_trait]
impl MessagingProvider for FcmClient {
    async fn send_multicast(
        &self,
        message: &MulticastMessage,
    ) -> Result<BatchResponse, BroadcastError> {
        if message.tokens.is_empty() {
            return Err(BroadcastError::provider("tokens must be a non-empty array"));
        }

        if message.tokens.len() > MAX_MULTICAST_TOKENS {
            return Err(BroadcastError::provider(format!(
                "tokens list must not contain more than {} items",
                MAX_MULTICAST_TOKENS
            )));
        }

        let bearer = self.bearer_token().await?;
        let bearer = bearer.as_str();

        let sends: Vec<_> = message
            .tokens
            .iter()
            .map(|device_token| self.send_one(bearer, device_token, message))
            .collect();

        // `buffered` yields in input order, keeping responses aligned with tokens.
        let responses = stream::iter(sends)
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        let batch = BatchResponse::from_responses(responses);

        info!(
            success_count = batch.success_count,
            failure_count = batch.failure_count,
            "FCM multicast completed"
        );

        Ok(batch)
    }
}
