//! Outbound delivery of push messages to subscriber endpoints.

pub mod push;

use async_trait::async_trait;

use crate::message::PushMessage;
use crate::registry::SubscriptionEntry;

/// Error type for a single delivery attempt.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The push service answered with a non-2xx status code.
    #[error("Push service returned HTTP {0}")]
    HttpStatus(u16),

    /// Any other sender-specific failure.
    #[error("Delivery failed: {0}")]
    Other(String),
}

/// Sends one message to one endpoint.
///
/// Implementations make exactly one attempt; retry policy (there is none)
/// belongs to the dispatcher.
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(
        &self,
        entry: &SubscriptionEntry,
        message: &PushMessage,
    ) -> Result<(), DeliveryError>;
}
