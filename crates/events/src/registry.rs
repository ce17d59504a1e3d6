//! Per-identity registry of push endpoints.
//!
//! [`SubscriptionRegistry`] is process-wide shared state, injected wherever it
//! is needed behind an `Arc`. Each owner's entry list sits behind its own
//! mutex, so the duplicate check and the append are atomic with respect to
//! other registrations for the same owner while different owners never
//! contend beyond the brief map lookup.

use std::collections::HashMap;
use std::sync::Arc;

use maintdesk_core::types::SubjectId;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

/// Key material the client generated for its endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryKeys {
    pub p256dh: String,
    pub auth: String,
}

/// A subscription as posted by a browser client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscription {
    pub endpoint: String,
    pub keys: DeliveryKeys,
}

/// A stored subscription. Never updated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionEntry {
    pub owner_subject_id: SubjectId,
    pub endpoint: String,
    pub keys: DeliveryKeys,
}

type EntryList = Arc<Mutex<Vec<SubscriptionEntry>>>;

/// Registry of push endpoints keyed by subject id.
#[derive(Default)]
pub struct SubscriptionRegistry {
    owners: RwLock<HashMap<SubjectId, EntryList>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an endpoint for `owner` unless one with the same endpoint
    /// string already exists. Delivery keys are not compared.
    ///
    /// Returns `true` when a new entry was stored.
    pub async fn register(&self, owner: &str, subscription: PushSubscription) -> bool {
        let slot = self.slot_for(owner).await;
        let mut entries = slot.lock().await;

        if entries.iter().any(|e| e.endpoint == subscription.endpoint) {
            tracing::debug!(subject_id = owner, "Push endpoint already registered");
            return false;
        }

        entries.push(SubscriptionEntry {
            owner_subject_id: owner.to_string(),
            endpoint: subscription.endpoint,
            keys: subscription.keys,
        });
        tracing::info!(
            subject_id = owner,
            endpoint_count = entries.len(),
            "Push endpoint registered"
        );
        true
    }

    /// Snapshot of every entry registered for `owner`; empty if none.
    pub async fn list_for(&self, owner: &str) -> Vec<SubscriptionEntry> {
        let slot = self.owners.read().await.get(owner).cloned();
        match slot {
            Some(slot) => slot.lock().await.clone(),
            None => Vec::new(),
        }
    }

    /// Number of owners with at least one registration attempt.
    pub async fn owner_count(&self) -> usize {
        self.owners.read().await.len()
    }

    async fn slot_for(&self, owner: &str) -> EntryList {
        if let Some(slot) = self.owners.read().await.get(owner) {
            return Arc::clone(slot);
        }
        let mut owners = self.owners.write().await;
        Arc::clone(owners.entry(owner.to_string()).or_default())
    }
}
