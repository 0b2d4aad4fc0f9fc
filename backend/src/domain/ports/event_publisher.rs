//! Ports for realtime fan-out.
//!
//! [`EventPublisher`] is what domain services use to emit events.
//! [`TopicRegistry`] is what connection handlers use to register subscribers
//! and manage their topic memberships. Both are usually backed by the same
//! in-process hub.
//!
//! Delivery is best effort and at most once: publishing never blocks and never
//! fails, and frames are dropped for subscribers that have gone away.

use tokio::sync::mpsc::UnboundedReceiver;

use crate::domain::RealtimeEvent;

/// Handle identifying one connected subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered subscriber and the queue of serialized frames addressed to it.
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub frames: UnboundedReceiver<String>,
}

/// Fire-and-forget event emission.
#[cfg_attr(test, mockall::automock)]
pub trait EventPublisher: Send + Sync {
    /// Send `event` to every connected subscriber. Returns the number of
    /// subscribers the frame was queued for.
    fn publish_all(&self, event: &RealtimeEvent) -> usize;

    /// Send `event` to every member of `topic`. Returns the number of
    /// subscribers the frame was queued for.
    fn publish_to_topic(&self, topic: &str, event: &RealtimeEvent) -> usize;

    /// Send `event` to a single subscriber.
    fn publish_to(&self, subscriber: SubscriberId, event: &RealtimeEvent) -> bool;
}

/// Subscriber and topic membership management.
#[cfg_attr(test, mockall::automock)]
pub trait TopicRegistry: Send + Sync {
    /// Register a new subscriber with no topic memberships.
    fn connect(&self) -> Subscription;

    /// Add `subscriber` to each topic. Returns how many memberships were new.
    fn join(&self, subscriber: SubscriberId, topics: &[String]) -> usize;

    /// Remove `subscriber` from each topic. Returns how many memberships were
    /// removed.
    fn leave(&self, subscriber: SubscriberId, topics: &[String]) -> usize;

    /// Remove `subscriber` from every topic and drop its queue.
    fn disconnect(&self, subscriber: SubscriberId);
}
