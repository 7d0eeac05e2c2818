use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::multicast::BatchResponse;

const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// A validated broadcast request. `tokens` is never empty and both notification
/// fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastRequest {
    pub tokens: Vec<String>,
    pub notification: Notification,

    #[serde(default)]
    pub data: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenError {
    pub token: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResult {
    pub success: usize,
    pub failure: usize,
    pub errors: Vec<TokenError>,
}

impl BroadcastResult {
    /// Pairs `tokens[i]` with `batch.responses[i]`; the provider guarantees that alignment.
    pub fn from_batch(tokens: &[String], batch: &BatchResponse) -> Self {
        let errors = tokens
            .iter()
            .zip(&batch.responses)
            .filter(|(_, response)| !response.success)
            .map(|(token, response)| TokenError {
                token: token.clone(),
                error: response
                    .error
                    .as_ref()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            })
            .collect();

        Self {
            success: batch.success_count,
            failure: batch.failure_count,
            errors,
        }
    }
}
