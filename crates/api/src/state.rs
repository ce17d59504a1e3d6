use std::sync::Arc;

use maintdesk_db::TicketStore;
use maintdesk_events::{NotificationDispatcher, PushSender, SubscriptionRegistry};

use crate::config::ServerConfig;
use crate::engine::TicketEngine;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Persistence collaborator.
    pub store: Arc<dyn TicketStore>,
    /// Server configuration (JWT secret, headquarters location, ...).
    pub config: Arc<ServerConfig>,
    /// Push endpoints per identity.
    pub registry: Arc<SubscriptionRegistry>,
    /// Fire-and-forget notification fan-out.
    pub dispatcher: Arc<NotificationDispatcher>,
    /// Ticket lifecycle state machine.
    pub engine: Arc<TicketEngine>,
}

impl AppState {
    /// Wire the registry, dispatcher, and engine around a store and sender.
    pub fn new(
        store: Arc<dyn TicketStore>,
        config: ServerConfig,
        sender: Arc<dyn PushSender>,
    ) -> Self {
        let registry = Arc::new(SubscriptionRegistry::new());
        let dispatcher = Arc::new(NotificationDispatcher::new(Arc::clone(&registry), sender));
        let engine = Arc::new(TicketEngine::new(
            Arc::clone(&store),
            Arc::clone(&dispatcher),
            config.hq_location.clone(),
        ));

        Self {
            store,
            config: Arc::new(config),
            registry,
            dispatcher,
            engine,
        }
    }
}
