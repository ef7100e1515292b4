//! Per-task event bus
//!
//! Every task owns an [`EventBus`] keyed by the closed [`Event`] set. A
//! subscription is either persistent or fire-once. Firing an event hands the
//! caller a snapshot of the current subscribers and keeps only the persistent
//! ones registered; subscribers added while the snapshot is being invoked
//! belong to the next firing, not the current one.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Lifecycle events a task emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    /// The task's own load logic has started
    Loading,
    /// The task's own load logic has finished
    Load,
    /// The task failed
    Error,
    /// The task and all of its branches succeeded
    Success,
}

impl Event {
    /// Get event name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Load => "load",
            Self::Error => "error",
            Self::Success => "success",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long a subscription stays registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    /// Fires on every emission
    Persistent,
    /// Fires on the next emission only
    Once,
}

/// Subscriber lists for one task
pub struct EventBus<C> {
    listeners: HashMap<Event, Vec<(C, Subscription)>>,
}

impl<C: Clone> EventBus<C> {
    /// Create an empty bus
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }

    /// Register a persistent callback
    pub fn on(&mut self, event: Event, callback: C) {
        self.subscribe(event, callback, Subscription::Persistent);
    }

    /// Register a fire-once callback
    pub fn one(&mut self, event: Event, callback: C) {
        self.subscribe(event, callback, Subscription::Once);
    }

    /// Register a callback with an explicit subscription kind
    pub fn subscribe(&mut self, event: Event, callback: C, subscription: Subscription) {
        self.listeners
            .entry(event)
            .or_default()
            .push((callback, subscription));
    }

    /// Take the batch of callbacks to invoke for `event`, in registration order.
    ///
    /// Fire-once subscriptions are dropped from the bus; persistent ones stay.
    pub fn fire(&mut self, event: Event) -> Vec<C> {
        let Some(items) = self.listeners.remove(&event) else {
            return Vec::new();
        };

        let retained: Vec<_> = items
            .iter()
            .filter(|(_, subscription)| *subscription == Subscription::Persistent)
            .cloned()
            .collect();
        if !retained.is_empty() {
            self.listeners.insert(event, retained);
        }

        items.into_iter().map(|(callback, _)| callback).collect()
    }

    /// Number of callbacks currently registered for `event`
    pub fn listener_count(&self, event: Event) -> usize {
        self.listeners.get(&event).map_or(0, Vec::len)
    }
}

impl<C: Clone> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<Event, usize> = self
            .listeners
            .iter()
            .map(|(event, items)| (*event, items.len()))
            .collect();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_in_registration_order() {
        let mut bus = EventBus::new();
        bus.on(Event::Load, 1);
        bus.one(Event::Load, 2);
        bus.on(Event::Load, 3);

        assert_eq!(bus.fire(Event::Load), vec![1, 2, 3]);
    }

    #[test]
    fn test_once_fires_exactly_once() {
        let mut bus = EventBus::new();
        bus.one(Event::Error, "once");
        bus.on(Event::Error, "always");

        assert_eq!(bus.fire(Event::Error), vec!["once", "always"]);
        assert_eq!(bus.fire(Event::Error), vec!["always"]);
        assert_eq!(bus.fire(Event::Error), vec!["always"]);
    }

    #[test]
    fn test_events_are_independent() {
        let mut bus = EventBus::new();
        bus.one(Event::Success, 'a');
        bus.one(Event::Error, 'b');

        assert_eq!(bus.fire(Event::Success), vec!['a']);
        assert_eq!(bus.listener_count(Event::Error), 1);
        assert!(bus.fire(Event::Loading).is_empty());
    }

    #[test]
    fn test_subscriptions_after_fire_join_next_batch() {
        let mut bus = EventBus::new();
        bus.one(Event::Success, 1);

        let batch = bus.fire(Event::Success);
        // registered while `batch` is being invoked
        bus.one(Event::Success, 2);

        assert_eq!(batch, vec![1]);
        assert_eq!(bus.fire(Event::Success), vec![2]);
    }

    #[test]
    fn test_listener_count() {
        let mut bus: EventBus<u8> = EventBus::default();
        assert_eq!(bus.listener_count(Event::Load), 0);
        bus.on(Event::Load, 0);
        bus.one(Event::Load, 1);
        assert_eq!(bus.listener_count(Event::Load), 2);
        bus.fire(Event::Load);
        assert_eq!(bus.listener_count(Event::Load), 1);
    }
}
