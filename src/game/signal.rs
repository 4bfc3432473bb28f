//! Typed event channels with one-shot and persistent subscriptions.
//!
//! Subscribers register a reaction value rather than a callback. Publishing a
//! topic yields the ids of matching subscriptions; each id is then delivered
//! individually so that a reaction which tears down other subscriptions (for
//! example by changing state) prevents them from firing afterwards.

use super::Side;

/// Signals the combat core listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Throw input pressed
    Press,
    /// Throw input released
    Release,
    /// Intro sequence finished
    SetupComplete,
    /// Throw animation reached its release frame
    ReleaseTiming(Side),
    /// Throw animation finished
    AnimationFinished(Side),
    /// A grenade left the active list
    GrenadeDestroyed,
    /// Host asked for a new match
    Restart,
}

/// Subscription lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Removed after its first delivery
    Once,
    /// Stays until removed
    Persistent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone)]
struct Subscription<R> {
    id: SubscriptionId,
    topic: Topic,
    delivery: Delivery,
    reaction: R,
}

/// Subscription registry
#[derive(Debug, Clone)]
pub struct EventBus<R> {
    subscriptions: Vec<Subscription<R>>,
    next_id: u64,
}

impl<R: Clone> EventBus<R> {
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
            next_id: 0,
        }
    }

    pub fn subscribe(&mut self, topic: Topic, delivery: Delivery, reaction: R) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            topic,
            delivery,
            reaction,
        });
        id
    }

    pub fn add(&mut self, topic: Topic, reaction: R) -> SubscriptionId {
        self.subscribe(topic, Delivery::Persistent, reaction)
    }

    pub fn add_once(&mut self, topic: Topic, reaction: R) -> SubscriptionId {
        self.subscribe(topic, Delivery::Once, reaction)
    }

    /// Returns false if the subscription was already gone
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Ids subscribed to `topic`, in subscription order
    pub fn pending(&self, topic: Topic) -> Vec<SubscriptionId> {
        self.subscriptions
            .iter()
            .filter(|s| s.topic == topic)
            .map(|s| s.id)
            .collect()
    }

    /// Take the reaction for a pending id. One-shot subscriptions are consumed.
    /// Returns `None` if the subscription was removed since `pending` was called.
    pub fn deliver(&mut self, id: SubscriptionId) -> Option<R> {
        let idx = self.subscriptions.iter().position(|s| s.id == id)?;
        match self.subscriptions[idx].delivery {
            Delivery::Once => Some(self.subscriptions.remove(idx).reaction),
            Delivery::Persistent => Some(self.subscriptions[idx].reaction.clone()),
        }
    }

    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.subscriptions.iter().any(|s| s.id == id)
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscriptions.iter().filter(|s| s.topic == topic).count()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl<R: Clone> Default for EventBus<R> {
    fn default() -> Self {
        Self::new()
    }
}
