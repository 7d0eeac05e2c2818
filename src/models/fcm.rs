use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct FcmRequest<'a> {
    pub message: FcmMessage<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FcmMessage<'a> {
    pub token: &'a str,
    pub notification: FcmNotification<'a>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<&'a HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FcmNotification<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FcmSendResponse {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FcmErrorEnvelope {
    pub error: FcmErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FcmErrorBody {
    #[serde(default)]
    pub code: Option<u16>,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub details: Vec<FcmErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FcmErrorDetail {
    #[serde(default)]
    pub error_code: Option<String>,
}

impl FcmErrorBody {
    /// FCM `errorCode` from the details list, falling back to the RPC status.
    pub fn error_code(&self) -> Option<String> {
        self.details
            .iter()
            .find_map(|detail| detail.error_code.clone())
            .or_else(|| self.status.clone())
    }
}
