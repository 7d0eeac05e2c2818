use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::{
    errors::BroadcastError,
    models::broadcast::{BroadcastRequest, Notification},
};

pub const INVALID_TOKENS: &str = "No valid tokens provided";
pub const INVALID_NOTIFICATION: &str = "Invalid notification format";
pub const INVALID_DATA: &str = "Invalid data format";

/// Checks a raw request body against the broadcast schema.
///
/// An empty or unparsable body is treated as `{}`, so it fails on the token check.
pub fn parse_broadcast_request(body: &[u8]) -> Result<BroadcastRequest, BroadcastError> {
    let value = serde_json::from_slice::<Value>(body).unwrap_or(Value::Null);
    let empty = Map::new();
    let fields = value.as_object().unwrap_or(&empty);

    let tokens = validate_tokens(fields.get("tokens"))?;
    let notification = validate_notification(fields.get("notification"))?;
    let data = validate_data(fields.get("data"))?;

    Ok(BroadcastRequest {
        tokens,
        notification,
        data,
    })
}

fn validate_tokens(value: Option<&Value>) -> Result<Vec<String>, BroadcastError> {
    let items = match value {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(BroadcastError::validation(INVALID_TOKENS)),
    };

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| BroadcastError::validation(INVALID_TOKENS))
        })
        .collect()
}

fn validate_notification(value: Option<&Value>) -> Result<Notification, BroadcastError> {
    let non_empty = |field: &str| {
        value
            .and_then(|v| v.get(field))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    match (non_empty("title"), non_empty("body")) {
        (Some(title), Some(body)) => Ok(Notification { title, body }),
        _ => Err(BroadcastError::validation(INVALID_NOTIFICATION)),
    }
}

fn validate_data(value: Option<&Value>) -> Result<HashMap<String, String>, BroadcastError> {
    match value {
        None | Some(Value::Null) => Ok(HashMap::new()),
        Some(Value::Object(entries)) => entries
            .iter()
            .map(|(key, v)| match v {
                Value::String(s) => Ok((key.clone(), s.clone())),
                _ => Err(BroadcastError::validation(INVALID_DATA)),
            })
            .collect(),
        Some(_) => Err(BroadcastError::validation(INVALID_DATA)),
    }
}
