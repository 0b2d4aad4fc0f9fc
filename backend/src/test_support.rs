//! Shared test doubles for service and adapter tests.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local, Utc};
use mockable::Clock;

use crate::domain::RealtimeEvent;
use crate::domain::ports::{EventPublisher, SubscriberId};

/// Clock frozen at a fixed instant.
pub struct FixtureClock(pub DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// `2025-06-14T17:00:00Z`, the ceremony.
pub fn fixture_clock() -> Arc<dyn Clock> {
    let instant = DateTime::from_timestamp(1_749_920_400, 0).unwrap_or_default();
    Arc::new(FixtureClock(instant))
}

/// Where a recorded event was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    Everyone,
    Topic(String),
    Subscriber(SubscriberId),
}

/// Publisher that records every event instead of delivering it.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<(Audience, RealtimeEvent)>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<(Audience, RealtimeEvent)> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Names of recorded events, in publication order.
    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(|(_, event)| event.name()).collect()
    }

    fn record(&self, audience: Audience, event: &RealtimeEvent) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((audience, event.clone()));
        1
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish_all(&self, event: &RealtimeEvent) -> usize {
        self.record(Audience::Everyone, event)
    }

    fn publish_to_topic(&self, topic: &str, event: &RealtimeEvent) -> usize {
        self.record(Audience::Topic(topic.to_owned()), event)
    }

    fn publish_to(&self, subscriber: SubscriberId, event: &RealtimeEvent) -> bool {
        self.record(Audience::Subscriber(subscriber), event) > 0
    }
}
