//! Best-effort fan-out of push messages.
//!
//! [`NotificationDispatcher::notify`] is fire-and-forget: it schedules a
//! detached task that looks up every endpoint registered for the target and
//! attempts each one concurrently. Delivery is at-most-once. A failed endpoint
//! is logged and discarded; it never aborts the remaining endpoints, is never
//! retried, and never reaches the caller.
//!
//! Detached tasks are tracked so graceful shutdown can wait for in-flight
//! deliveries with [`NotificationDispatcher::shutdown`].

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use futures::FutureExt;
use tokio_util::task::TaskTracker;

use crate::delivery::PushSender;
use crate::message::PushMessage;
use crate::registry::SubscriptionRegistry;

/// Outcome of delivering one message to one target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Delivers messages to every endpoint a target has registered.
pub struct NotificationDispatcher {
    registry: Arc<SubscriptionRegistry>,
    sender: Arc<dyn PushSender>,
    tracker: TaskTracker,
}

impl NotificationDispatcher {
    pub fn new(registry: Arc<SubscriptionRegistry>, sender: Arc<dyn PushSender>) -> Self {
        Self {
            registry,
            sender,
            tracker: TaskTracker::new(),
        }
    }

    /// The registry this dispatcher reads endpoints from.
    pub fn registry(&self) -> &Arc<SubscriptionRegistry> {
        &self.registry
    }

    /// Schedule delivery of `message` to `target` and return immediately.
    ///
    /// Without a Tokio runtime on the current thread the delivery runs inline
    /// on a throwaway current-thread runtime, so senders that need the Tokio
    /// reactor (the HTTP sender does) still work. Nothing the delivery does,
    /// including a panic, escapes this call.
    pub fn notify(&self, target: &str, message: PushMessage) {
        let registry = Arc::clone(&self.registry);
        let sender = Arc::clone(&self.sender);
        let target = target.to_string();

        let work = async move {
            deliver(&registry, sender.as_ref(), &target, &message).await;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                self.tracker.spawn_on(work, &handle);
            }
            Err(_) => {
                tracing::debug!("No async runtime available, delivering notification inline");
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            "Failed to build inline runtime, dropping notification"
                        );
                        return;
                    }
                };
                if runtime.block_on(AssertUnwindSafe(work).catch_unwind()).is_err() {
                    tracing::error!("Inline notification delivery panicked");
                }
            }
        }
    }

    /// Deliver `message` to `target` and wait for every attempt to finish.
    pub async fn deliver_now(&self, target: &str, message: &PushMessage) -> DispatchReport {
        deliver(&self.registry, self.sender.as_ref(), target, message).await
    }

    /// Number of detached deliveries still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until every delivery scheduled so far has finished.
    ///
    /// Once [`shutdown`](Self::shutdown) has closed the tracker it stays
    /// closed; do not race this against `shutdown`.
    pub async fn wait_idle(&self) {
        let already_closed = self.tracker.is_closed();
        self.tracker.close();
        self.tracker.wait().await;
        if !already_closed {
            self.tracker.reopen();
        }
    }

    /// Stop tracking and wait up to `timeout` for in-flight deliveries.
    ///
    /// Returns `true` if everything drained in time.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.tracker.close();
        let drained = tokio::time::timeout(timeout, self.tracker.wait())
            .await
            .is_ok();
        if !drained {
            tracing::warn!(
                in_flight = self.tracker.len(),
                "Notification deliveries still running at shutdown"
            );
        }
        drained
    }
}

async fn deliver(
    registry: &SubscriptionRegistry,
    sender: &dyn PushSender,
    target: &str,
    message: &PushMessage,
) -> DispatchReport {
    let entries = registry.list_for(target).await;
    if entries.is_empty() {
        tracing::debug!(
            subject_id = target,
            event_type = %message.event_type,
            "No push endpoints registered, skipping notification"
        );
        return DispatchReport::default();
    }

    let results = join_all(entries.iter().map(|entry| sender.send(entry, message))).await;

    let mut report = DispatchReport {
        attempted: entries.len(),
        ..DispatchReport::default()
    };
    for (entry, result) in entries.iter().zip(results) {
        match result {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                report.failed += 1;
                tracing::warn!(
                    subject_id = target,
                    endpoint = %entry.endpoint,
                    event_type = %message.event_type,
                    error = %e,
                    "Push delivery failed, discarding"
                );
            }
        }
    }

    tracing::debug!(
        subject_id = target,
        event_type = %message.event_type,
        attempted = report.attempted,
        delivered = report.delivered,
        failed = report.failed,
        "Notification dispatched"
    );
    report
}
