//! Topic-based event bus implementation.
//!
//! Delivery is synchronous: `publish` appends the event to every matching
//! subscriber's queue before returning. Subscribers drain their queue on the
//! simulation thread.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::types::{CombatEvent, EconomyEvent, Notification, PlayerEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// Items and gold changing hands
    Economy,
    /// Kills
    Combat,
    /// Player spawn/destroy and scene changes
    Player,
    /// User-facing notifications
    Ui,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Economy, Topic::Combat, Topic::Player, Topic::Ui];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Economy(EconomyEvent),
    Combat(CombatEvent),
    Player(PlayerEvent),
    Notification(Notification),
}

impl GameEvent {
    pub fn topic(&self) -> Topic {
        match self {
            GameEvent::Economy(_) => Topic::Economy,
            GameEvent::Combat(_) => Topic::Combat,
            GameEvent::Player(_) => Topic::Player,
            GameEvent::Notification(_) => Topic::Ui,
        }
    }
}

impl From<EconomyEvent> for GameEvent {
    fn from(event: EconomyEvent) -> Self {
        GameEvent::Economy(event)
    }
}

impl From<CombatEvent> for GameEvent {
    fn from(event: CombatEvent) -> Self {
        GameEvent::Combat(event)
    }
}

impl From<PlayerEvent> for GameEvent {
    fn from(event: PlayerEvent) -> Self {
        GameEvent::Player(event)
    }
}

impl From<Notification> for GameEvent {
    fn from(notification: Notification) -> Self {
        GameEvent::Notification(notification)
    }
}

type Queue = Mutex<VecDeque<GameEvent>>;

struct Subscription {
    topics: Vec<Topic>,
    queue: Weak<Queue>,
}

/// Topic-based event bus
///
/// Cloning shares the subscriber list. Dropped receivers are pruned on the
/// next publish.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Subscription>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an event to every subscriber of its topic
    pub fn publish(&self, event: impl Into<GameEvent>) {
        let event = event.into();
        let topic = event.topic();
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|s| s.queue.strong_count() > 0);

        let mut delivered = 0;
        for subscription in subscribers.iter().filter(|s| s.topics.contains(&topic)) {
            if let Some(queue) = subscription.queue.upgrade() {
                queue.lock().push_back(event.clone());
                delivered += 1;
            }
        }

        if delivered == 0 {
            log::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a set of topics
    pub fn subscribe(&self, topics: &[Topic]) -> EventReceiver {
        let queue = Arc::new(Mutex::new(VecDeque::new()));
        self.subscribers.lock().push(Subscription {
            topics: topics.to_vec(),
            queue: Arc::downgrade(&queue),
        });
        EventReceiver { queue }
    }

    /// Subscribe to every topic
    pub fn subscribe_all(&self) -> EventReceiver {
        self.subscribe(&Topic::ALL)
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .iter()
            .filter(|s| s.queue.strong_count() > 0)
            .count()
    }
}

/// Receiving end of a subscription
pub struct EventReceiver {
    queue: Arc<Queue>,
}

impl EventReceiver {
    /// Take the oldest pending event
    pub fn try_recv(&self) -> Option<GameEvent> {
        self.queue.lock().pop_front()
    }

    /// Take every pending event, oldest first
    pub fn drain(&self) -> Vec<GameEvent> {
        self.queue.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}
