//! Push notification infrastructure for ticket lifecycle events.
//!
//! - [`SubscriptionRegistry`] -- per-identity set of push endpoints.
//! - [`NotificationDispatcher`] -- best-effort, fire-and-forget fan-out of a
//!   [`PushMessage`] to every endpoint of a target identity.
//! - [`delivery`] -- the [`PushSender`] seam and its HTTP implementation.

pub mod delivery;
pub mod dispatcher;
pub mod message;
pub mod registry;

pub use delivery::push::HttpPushSender;
pub use delivery::{DeliveryError, PushSender};
pub use dispatcher::{DispatchReport, NotificationDispatcher};
pub use message::PushMessage;
pub use registry::{DeliveryKeys, PushSubscription, SubscriptionEntry, SubscriptionRegistry};
