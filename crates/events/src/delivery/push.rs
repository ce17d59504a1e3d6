//! HTTP delivery to push service endpoints.
//!
//! [`HttpPushSender`] POSTs the JSON-encoded [`PushMessage`] to the
//! subscription's endpoint URL. A single attempt is made; a failed attempt is
//! reported to the caller and never retried.

use std::time::Duration;

use async_trait::async_trait;

use super::{DeliveryError, PushSender};
use crate::message::PushMessage;
use crate::registry::SubscriptionEntry;

/// Default HTTP request timeout for a single delivery attempt.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How long the push service may hold an undelivered message, in seconds.
const MESSAGE_TTL_SECS: u32 = 24 * 60 * 60;

/// Delivers push messages over HTTP.
pub struct HttpPushSender {
    client: reqwest::Client,
}

impl HttpPushSender {
    /// Create a sender whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PushSender for HttpPushSender {
    async fn send(
        &self,
        entry: &SubscriptionEntry,
        message: &PushMessage,
    ) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&entry.endpoint)
            .header("TTL", MESSAGE_TTL_SECS.to_string())
            .header("Urgency", "normal")
            .json(message)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DeliveryError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}
