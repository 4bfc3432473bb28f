//! Finite state machine with state-scoped subscriptions.
//! Entering a state tears down every subscription the previous state made.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, warn};

use super::signal::{Delivery, EventBus, SubscriptionId, Topic};

/// Registration data for a state
#[derive(Debug, Clone, Copy, Default)]
pub struct StateSpec {
    /// Whether the state wants a per-frame update
    pub has_update: bool,
}

/// Result of a successful `start_state`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S> {
    pub from: Option<S>,
    pub to: S,
    /// Subscriptions dropped from the previous state
    pub released: usize,
}

pub struct StateMachine<S, R> {
    states: HashMap<S, StateSpec>,
    current: Option<S>,
    bus: EventBus<R>,
    scope: Vec<SubscriptionId>,
}

impl<S, R> StateMachine<S, R>
where
    S: Copy + Eq + Hash + Debug,
    R: Clone,
{
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            current: None,
            bus: EventBus::new(),
            scope: Vec::new(),
        }
    }

    pub fn add_state(&mut self, state: S, spec: StateSpec) {
        if self.states.insert(state, spec).is_some() {
            warn!(state = ?state, "state registered twice");
        }
    }

    pub fn is_registered(&self, state: S) -> bool {
        self.states.contains_key(&state)
    }

    pub fn current(&self) -> Option<S> {
        self.current
    }

    /// Whether the active state has an update hook
    pub fn has_update(&self) -> bool {
        self.current
            .and_then(|s| self.states.get(&s))
            .map(|spec| spec.has_update)
            .unwrap_or(false)
    }

    /// Switch to `next`. Unregistered states and re-entering the active state are
    /// ignored and return `None`.
    pub fn start_state(&mut self, next: S) -> Option<Transition<S>> {
        if !self.is_registered(next) {
            warn!(state = ?next, "ignoring transition to unregistered state");
            return None;
        }
        if self.current == Some(next) {
            warn!(state = ?next, "ignoring transition to the active state");
            return None;
        }

        let released = self.release_scope();
        let from = self.current.replace(next);
        debug!(from = ?from, to = ?next, released, "state changed");

        Some(Transition {
            from,
            to: next,
            released,
        })
    }

    /// Subscribe for the lifetime of the active state
    pub fn on(&mut self, topic: Topic, reaction: R) -> SubscriptionId {
        self.scoped(topic, Delivery::Persistent, reaction)
    }

    /// Subscribe for one delivery, dropped early if the state is left first
    pub fn on_once(&mut self, topic: Topic, reaction: R) -> SubscriptionId {
        self.scoped(topic, Delivery::Once, reaction)
    }

    pub fn pending(&self, topic: Topic) -> Vec<SubscriptionId> {
        self.bus.pending(topic)
    }

    pub fn deliver(&mut self, id: SubscriptionId) -> Option<R> {
        let reaction = self.bus.deliver(id);
        if reaction.is_some() && !self.bus.contains(id) {
            self.scope.retain(|s| *s != id);
        }
        reaction
    }

    #[cfg(test)]
    pub(crate) fn bus(&self) -> &EventBus<R> {
        &self.bus
    }

    fn scoped(&mut self, topic: Topic, delivery: Delivery, reaction: R) -> SubscriptionId {
        let id = self.bus.subscribe(topic, delivery, reaction);
        self.scope.push(id);
        id
    }

    fn release_scope(&mut self) -> usize {
        let mut released = 0;
        for id in self.scope.drain(..) {
            if self.bus.remove(id) {
                released += 1;
            }
        }
        released
    }
}

impl<S, R> Default for StateMachine<S, R>
where
    S: Copy + Eq + Hash + Debug,
    R: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Light {
        Red,
        Green,
        Blinking,
    }

    fn machine() -> StateMachine<Light, &'static str> {
        let mut fsm = StateMachine::new();
        fsm.add_state(Light::Red, StateSpec::default());
        fsm.add_state(Light::Green, StateSpec { has_update: true });
        fsm
    }

    fn publish(fsm: &mut StateMachine<Light, &'static str>, topic: Topic) -> Vec<&'static str> {
        fsm.pending(topic)
            .into_iter()
            .filter_map(|id| fsm.deliver(id))
            .collect()
    }

    #[test]
    fn starts_without_a_state() {
        let fsm = machine();
        assert_eq!(fsm.current(), None);
        assert!(!fsm.has_update());
    }

    #[test]
    fn unregistered_state_is_ignored() {
        let mut fsm = machine();
        fsm.start_state(Light::Red);
        assert_eq!(fsm.start_state(Light::Blinking), None);
        assert_eq!(fsm.current(), Some(Light::Red));
    }

    #[test]
    fn reentering_the_active_state_is_ignored() {
        let mut fsm = machine();
        fsm.start_state(Light::Red);
        fsm.on_once(Topic::Press, "go");

        assert_eq!(fsm.start_state(Light::Red), None);
        assert_eq!(fsm.bus().subscriber_count(Topic::Press), 1);
    }

    #[test]
    fn leaving_a_state_drops_its_subscriptions() {
        let mut fsm = machine();
        fsm.start_state(Light::Red);
        fsm.on_once(Topic::Press, "go");
        fsm.on(Topic::Release, "noop");

        let t = fsm.start_state(Light::Green).expect("registered");
        assert_eq!(t.from, Some(Light::Red));
        assert_eq!(t.to, Light::Green);
        assert_eq!(t.released, 2);
        assert!(fsm.bus().is_empty());
        assert!(publish(&mut fsm, Topic::Press).is_empty());
        assert!(fsm.has_update());
    }

    #[test]
    fn delivered_once_subscription_is_not_counted_on_exit() {
        let mut fsm = machine();
        fsm.start_state(Light::Red);
        fsm.on_once(Topic::Press, "go");
        assert_eq!(publish(&mut fsm, Topic::Press), vec!["go"]);

        let t = fsm.start_state(Light::Green).expect("registered");
        assert_eq!(t.released, 0);
    }

    #[test]
    fn persistent_scoped_subscription_repeats_within_state() {
        let mut fsm = machine();
        fsm.start_state(Light::Green);
        fsm.on(Topic::AnimationFinished(crate::game::Side::Player), "idle");

        let topic = Topic::AnimationFinished(crate::game::Side::Player);
        assert_eq!(publish(&mut fsm, topic), vec!["idle"]);
        assert_eq!(publish(&mut fsm, topic), vec!["idle"]);

        fsm.start_state(Light::Red);
        assert!(publish(&mut fsm, topic).is_empty());
    }
}
