//! Ticket lifecycle engine.
//!
//! [`TicketEngine`] is the only writer of tickets. Every operation
//! authorizes the caller, derives its [`LocationScope`], talks to the store,
//! and on success hands a message to the notification dispatcher. Queries
//! live here; the guarded transitions are in [`lifecycle`].

pub mod lifecycle;

use std::sync::Arc;

use maintdesk_core::error::CoreError;
use maintdesk_core::guard::{can_view_ticket, LocationScope};
use maintdesk_core::identity::IdentityClaim;
use maintdesk_core::types::DbId;
use maintdesk_db::models::ticket::{Ticket, TicketFilter};
use maintdesk_db::TicketStore;
use maintdesk_events::NotificationDispatcher;

pub struct TicketEngine {
    store: Arc<dyn TicketStore>,
    dispatcher: Arc<NotificationDispatcher>,
    hq_location: String,
}

impl TicketEngine {
    pub fn new(
        store: Arc<dyn TicketStore>,
        dispatcher: Arc<NotificationDispatcher>,
        hq_location: impl Into<String>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            hq_location: hq_location.into(),
        }
    }

    /// The location filter for everything `claim` reads or writes.
    pub fn scope_for(&self, claim: &IdentityClaim) -> LocationScope {
        LocationScope::for_claim(claim, &self.hq_location)
    }

    /// Fetch one ticket the caller is allowed to see.
    ///
    /// Invisible and missing tickets are both reported as NotFound.
    pub async fn get(&self, claim: &IdentityClaim, ticket_id: DbId) -> Result<Ticket, CoreError> {
        let scope = self.scope_for(claim);
        self.store
            .find_ticket(ticket_id, &scope)
            .await?
            .filter(|ticket| can_view_ticket(claim, &self.hq_location, ticket.access()))
            .ok_or_else(|| CoreError::ticket_not_found(ticket_id))
    }

    /// Tickets visible to the caller, newest first.
    ///
    /// Planners and admins see their whole location (or everything, for the
    /// headquarters admin). Other roles only see tickets they raised or are
    /// assigned to.
    pub async fn list(&self, claim: &IdentityClaim) -> Result<Vec<Ticket>, CoreError> {
        let filter = TicketFilter {
            scope: self.scope_for(claim),
            involving: (!claim.role.oversees_location()).then(|| claim.subject_id.clone()),
        };
        let tickets = self.store.list_tickets(&filter).await?;
        tracing::debug!(
            subject_id = %claim.subject_id,
            count = tickets.len(),
            "Listed tickets"
        );
        Ok(tickets)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use maintdesk_core::roles::Role;
    use maintdesk_db::models::user::User;
    use maintdesk_db::MemoryTicketStore;
    use maintdesk_events::{
        DeliveryError, DeliveryKeys, PushMessage, PushSender, PushSubscription, SubscriptionEntry,
        SubscriptionRegistry,
    };

    use super::*;

    pub const HQ: &str = "Mumbai HQ";

    /// Records `(owner, event_type)` for every delivery attempt.
    #[derive(Default)]
    pub struct RecordingSender {
        pub sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl PushSender for RecordingSender {
        async fn send(
            &self,
            entry: &SubscriptionEntry,
            message: &PushMessage,
        ) -> Result<(), DeliveryError> {
            self.sent
                .lock()
                .unwrap()
                .push((entry.owner_subject_id.clone(), message.event_type.clone()));
            Ok(())
        }
    }

    pub struct Harness {
        pub engine: TicketEngine,
        pub store: Arc<MemoryTicketStore>,
        pub dispatcher: Arc<NotificationDispatcher>,
        pub sender: Arc<RecordingSender>,
    }

    impl Harness {
        /// Deliveries recorded so far, after waiting for detached tasks.
        pub async fn deliveries(&self) -> Vec<(String, String)> {
            self.dispatcher.wait_idle().await;
            self.sender.sent.lock().unwrap().clone()
        }
    }

    pub fn claim(subject: &str, role: Role, location: &str) -> IdentityClaim {
        let now = Utc::now();
        IdentityClaim {
            subject_id: subject.to_string(),
            display_name: subject.to_uppercase(),
            role,
            location: location.to_string(),
            issued_at: now,
            expires_at: now + Duration::days(1),
        }
    }

    fn user(subject: &str, role: &str, location: &str) -> User {
        User {
            subject_id: subject.to_string(),
            display_name: subject.to_uppercase(),
            role: role.to_string(),
            location: location.to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Pune and Chennai staff, each with one registered push endpoint.
    pub async fn harness() -> Harness {
        let store = Arc::new(MemoryTicketStore::new());
        for (subject, role, location) in [
            ("u-pune", "normal_user", "Pune"),
            ("t-pune", "technician", "Pune"),
            ("p-pune", "planner", "Pune"),
            ("t-chennai", "technician", "Chennai"),
            ("a-hq", "admin", HQ),
        ] {
            store.insert_user(user(subject, role, location));
        }

        let registry = Arc::new(SubscriptionRegistry::new());
        for subject in ["u-pune", "t-pune", "p-pune", "t-chennai", "a-hq"] {
            registry
                .register(
                    subject,
                    PushSubscription {
                        endpoint: format!("https://push.example/{subject}"),
                        keys: DeliveryKeys {
                            p256dh: "p".into(),
                            auth: "a".into(),
                        },
                    },
                )
                .await;
        }

        let sender = Arc::new(RecordingSender::default());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            registry,
            Arc::clone(&sender) as Arc<dyn PushSender>,
        ));
        let engine = TicketEngine::new(
            Arc::clone(&store) as Arc<dyn TicketStore>,
            Arc::clone(&dispatcher),
            HQ,
        );

        Harness {
            engine,
            store,
            dispatcher,
            sender,
        }
    }

    #[tokio::test]
    async fn raiser_sees_own_ticket_but_colleague_does_not() {
        let h = harness().await;
        let raiser = claim("u-pune", Role::NormalUser, "Pune");
        let ticket = h.engine.submit(&raiser, Default::default()).await.unwrap();

        assert_eq!(h.engine.get(&raiser, ticket.id).await.unwrap().id, ticket.id);

        let colleague = claim("u-other", Role::NormalUser, "Pune");
        let err = h.engine.get(&colleague, ticket.id).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));

        let planner = claim("p-pune", Role::Planner, "Pune");
        assert!(h.engine.get(&planner, ticket.id).await.is_ok());
    }

    #[tokio::test]
    async fn listing_is_scoped_by_role_and_location() {
        let h = harness().await;
        let pune_user = claim("u-pune", Role::NormalUser, "Pune");
        let chennai_user = claim("u-chennai", Role::NormalUser, "Chennai");
        h.engine.submit(&pune_user, Default::default()).await.unwrap();
        h.engine.submit(&chennai_user, Default::default()).await.unwrap();

        let planner = claim("p-pune", Role::Planner, "Pune");
        assert_eq!(h.engine.list(&planner).await.unwrap().len(), 1);

        let tech = claim("t-pune", Role::Technician, "Pune");
        assert!(h.engine.list(&tech).await.unwrap().is_empty());

        let hq_admin = claim("a-hq", Role::Admin, HQ);
        assert_eq!(h.engine.list(&hq_admin).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn hq_admin_reads_any_location() {
        let h = harness().await;
        let raiser = claim("u-pune", Role::NormalUser, "Pune");
        let ticket = h.engine.submit(&raiser, Default::default()).await.unwrap();

        let hq_admin = claim("a-hq", Role::Admin, HQ);
        assert!(h.engine.get(&hq_admin, ticket.id).await.is_ok());

        let chennai_admin = claim("a-chennai", Role::Admin, "Chennai");
        let err = h.engine.get(&chennai_admin, ticket.id).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }
}
