pub mod fcm;

use async_trait::async_trait;

use crate::{
    errors::BroadcastError,
    models::multicast::{BatchResponse, MulticastMessage},
};

/// The push delivery service broadcasts are delegated to.
///
/// Implementations must return exactly one entry in `BatchResponse::responses`
/// per input token, in the same order as `MulticastMessage::tokens`. Callers
/// map failures back to tokens by position.
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    async fn send_multicast(
        &self,
        message: &MulticastMessage,
    ) -> Result<BatchResponse, BroadcastError>;
}
