//! Subscriber registry and topic fan-out backing both [`EventPublisher`] and
//! [`TopicRegistry`].
//!
//! Each subscriber owns an unbounded queue of serialized frames drained by its
//! WebSocket session. Publishing serializes an event once, then pushes clones
//! of the frame while holding the registry lock; pushes never block, so no
//! lock is held across I/O. A subscriber whose queue has closed is pruned on
//! the next publish that reaches it.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, error};

use crate::domain::RealtimeEvent;
use crate::domain::ports::{EventPublisher, SubscriberId, Subscription, TopicRegistry};

#[derive(Debug, Default)]
struct HubState {
    next_id: u64,
    subscribers: HashMap<SubscriberId, UnboundedSender<String>>,
    topics: HashMap<String, HashSet<SubscriberId>>,
}

impl HubState {
    fn remove(&mut self, subscriber: SubscriberId) {
        self.subscribers.remove(&subscriber);
        self.topics.retain(|_, members| {
            members.remove(&subscriber);
            !members.is_empty()
        });
    }

    /// Queue `frame` for each target, pruning subscribers that are gone.
    fn deliver(&mut self, targets: Vec<SubscriberId>, frame: &str) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();
        for id in targets {
            match self.subscribers.get(&id) {
                Some(sender) if sender.send(frame.to_owned()).is_ok() => delivered += 1,
                Some(_) => closed.push(id),
                None => {}
            }
        }
        for id in closed {
            debug!(subscriber = %id, "pruning closed subscriber");
            self.remove(id);
        }
        delivered
    }
}

/// Shared realtime hub. Wrap in an `Arc` and hand out as either port.
#[derive(Debug, Default)]
pub struct RealtimeHub {
    state: Mutex<HubState>,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Number of subscribers in `topic`.
    pub fn topic_size(&self, topic: &str) -> usize {
        self.lock().topics.get(topic).map_or(0, HashSet::len)
    }

    fn encode(event: &RealtimeEvent) -> Option<String> {
        match serde_json::to_string(event) {
            Ok(frame) => Some(frame),
            Err(err) => {
                error!(event = event.name(), error = %err, "failed to encode realtime event");
                None
            }
        }
    }
}

impl EventPublisher for RealtimeHub {
    fn publish_all(&self, event: &RealtimeEvent) -> usize {
        let Some(frame) = Self::encode(event) else {
            return 0;
        };
        let mut state = self.lock();
        let targets = state.subscribers.keys().copied().collect();
        state.deliver(targets, &frame)
    }

    fn publish_to_topic(&self, topic: &str, event: &RealtimeEvent) -> usize {
        let Some(frame) = Self::encode(event) else {
            return 0;
        };
        let mut state = self.lock();
        let targets = state
            .topics
            .get(topic)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default();
        let delivered = state.deliver(targets, &frame);
        debug!(topic, event = event.name(), delivered, "topic fan-out");
        delivered
    }

    fn publish_to(&self, subscriber: SubscriberId, event: &RealtimeEvent) -> bool {
        let Some(frame) = Self::encode(event) else {
            return false;
        };
        self.lock().deliver(vec![subscriber], &frame) == 1
    }
}

impl TopicRegistry for RealtimeHub {
    fn connect(&self) -> Subscription {
        let (sender, frames) = mpsc::unbounded_channel();
        let mut state = self.lock();
        state.next_id += 1;
        let id = SubscriberId::new(state.next_id);
        state.subscribers.insert(id, sender);
        Subscription { id, frames }
    }

    fn join(&self, subscriber: SubscriberId, topics: &[String]) -> usize {
        let mut state = self.lock();
        if !state.subscribers.contains_key(&subscriber) {
            return 0;
        }
        topics
            .iter()
            .filter(|topic| {
                state
                    .topics
                    .entry((*topic).clone())
                    .or_default()
                    .insert(subscriber)
            })
            .count()
    }

    fn leave(&self, subscriber: SubscriberId, topics: &[String]) -> usize {
        let mut state = self.lock();
        let mut removed = 0;
        for topic in topics {
            if let Some(members) = state.topics.get_mut(topic) {
                if members.remove(&subscriber) {
                    removed += 1;
                }
                if members.is_empty() {
                    state.topics.remove(topic);
                }
            }
        }
        removed
    }

    fn disconnect(&self, subscriber: SubscriberId) {
        self.lock().remove(subscriber);
    }
}
