use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::broadcast::{BroadcastRequest, Notification};

/// One notification payload addressed to many device tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MulticastMessage {
    pub notification: Notification,
    pub data: HashMap<String, String>,
    pub tokens: Vec<String>,
}

impl From<BroadcastRequest> for MulticastMessage {
    fn from(request: BroadcastRequest) -> Self {
        Self {
            notification: request.notification,
            data: request.data,
            tokens: request.tokens,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendError {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Outcome for a single token of a multicast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SendError>,
}

impl SendResponse {
    pub fn delivered(message_id: Option<String>) -> Self {
        Self {
            success: true,
            message_id,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(SendError {
                message: message.into(),
                code,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub success_count: usize,
    pub failure_count: usize,
    pub responses: Vec<SendResponse>,
}

impl BatchResponse {
    pub fn from_responses(responses: Vec<SendResponse>) -> Self {
        let success_count = responses.iter().filter(|r| r.success).count();

        Self {
            success_count,
            failure_count: responses.len() - success_count,
            responses,
        }
    }
}
