//! Event system
//!
//! Key principles:
//! - Key-value arguments (no order dependency)
//! - Topic registration (only notify interested listeners)
//! - Queued delivery: publishing never calls a listener re-entrantly, the
//!   queue is drained by [`EventBus::dispatch`] once per frame

use std::collections::HashMap;

/// Topic carrying key press and release events
pub const KEYBOARD_TOPIC: &str = "keyboard";

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Key went down
    KeyPressed,
    /// Key went up
    KeyReleased,
}

impl EventType {
    /// Topic this event type is published on
    pub const fn topic(self) -> &'static str {
        match self {
            Self::KeyPressed | Self::KeyReleased => KEYBOARD_TOPIC,
        }
    }
}

/// Variant for type-safe event arguments
/// Uses key-value pairs to avoid order dependency problems
#[derive(Debug, Clone, PartialEq)]
pub enum EventArg {
    /// Key name as reported by the input source
    Key(String),
    /// Boolean flag
    Flag(bool),
    /// Position coordinates
    Position(f32, f32),
}

/// Event with type ID and key-value arguments
#[derive(Debug, Clone)]
pub struct Event {
    /// Type of event
    pub event_type: EventType,
    /// Simulation time when the event was created (seconds)
    pub timestamp: f64,
    args: HashMap<&'static str, EventArg>,
}

impl Event {
    /// Create a new event with the given type and timestamp
    pub fn new(event_type: EventType, timestamp: f64) -> Self {
        Self {
            event_type,
            timestamp,
            args: HashMap::new(),
        }
    }

    /// Key press or release event
    pub fn key_event(key: impl Into<String>, pressed: bool, timestamp: f64) -> Self {
        let event_type = if pressed {
            EventType::KeyPressed
        } else {
            EventType::KeyReleased
        };
        Self::new(event_type, timestamp)
            .with_arg("key", EventArg::Key(key.into()))
            .with_arg("pressed", EventArg::Flag(pressed))
    }

    /// Add an argument to the event (builder pattern)
    #[must_use]
    pub fn with_arg(mut self, key: &'static str, value: EventArg) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&EventArg> {
        self.args.get(key)
    }

    /// Get key argument if present
    pub fn key(&self) -> Option<&str> {
        if let Some(EventArg::Key(key)) = self.get_arg("key") {
            Some(key)
        } else {
            None
        }
    }

    /// Whether this is a press; falls back to the event type
    pub fn is_pressed(&self) -> bool {
        if let Some(EventArg::Flag(pressed)) = self.get_arg("pressed") {
            *pressed
        } else {
            self.event_type == EventType::KeyPressed
        }
    }

    /// Get position argument if present
    pub fn position(&self) -> Option<(f32, f32)> {
        if let Some(EventArg::Position(x, y)) = self.get_arg("position") {
            Some((*x, *y))
        } else {
            None
        }
    }

    /// Topic this event is delivered on
    pub const fn topic(&self) -> &'static str {
        self.event_type.topic()
    }
}

/// Listener attached to the bus outside the ECS
///
/// Errors are logged by the bus and never stop delivery to other listeners.
pub trait EventListener {
    /// Handle one event
    fn on_event(&mut self, event: &Event) -> Result<(), String>;
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Topic-based publish/subscribe queue
#[derive(Default)]
pub struct EventBus {
    queue: Vec<Event>,
    listeners: HashMap<&'static str, Vec<(ListenerId, Box<dyn EventListener>)>>,
    next_id: u64,
}

impl EventBus {
    /// Create a new empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for a topic
    pub fn subscribe(&mut self, topic: &'static str, listener: Box<dyn EventListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.entry(topic).or_default().push((id, listener));
        log::debug!("Listener {} subscribed to '{topic}'", id.0);
        id
    }

    /// Remove a listener; returns `false` if it was not subscribed
    pub fn unsubscribe(&mut self, topic: &str, id: ListenerId) -> bool {
        let Some(listeners) = self.listeners.get_mut(topic) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        before != listeners.len()
    }

    /// Queue an event for the next dispatch
    pub fn publish(&mut self, event: Event) {
        self.queue.push(event);
    }

    /// Deliver every queued event to its topic's listeners
    ///
    /// Returns the delivered events in publication order so the caller can
    /// forward them further (the world hands them to subscribed systems).
    pub fn dispatch(&mut self) -> Vec<Event> {
        let events = std::mem::take(&mut self.queue);
        for event in &events {
            let Some(listeners) = self.listeners.get_mut(event.topic()) else {
                continue;
            };
            for (id, listener) in listeners.iter_mut() {
                if let Err(err) = listener.on_event(event) {
                    log::error!("Listener {} failed on {:?}: {err}", id.0, event.event_type);
                }
            }
        }
        events
    }

    /// Number of listeners on a topic
    pub fn listener_count(&self, topic: &str) -> usize {
        self.listeners.get(topic).map_or(0, Vec::len)
    }

    /// Number of events waiting for dispatch
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Clear all queued events (useful for state transitions)
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        seen: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl EventListener for Recorder {
        fn on_event(&mut self, event: &Event) -> Result<(), String> {
            self.seen
                .borrow_mut()
                .push(format!("{}:{}", event.key().unwrap_or("?"), event.is_pressed()));
            if self.fail {
                Err("listener refused".to_string())
            } else {
                Ok(())
            }
        }
    }

    fn recorder(fail: bool) -> (Box<Recorder>, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        (
            Box::new(Recorder {
                seen: Rc::clone(&seen),
                fail,
            }),
            seen,
        )
    }

    #[test]
    fn test_key_event_arguments() {
        let event = Event::key_event("space", true, 1.5);
        assert_eq!(event.event_type, EventType::KeyPressed);
        assert_eq!(event.key(), Some("space"));
        assert!(event.is_pressed());
        assert_eq!(event.topic(), KEYBOARD_TOPIC);
        assert_eq!(event.position(), None);

        let released = Event::key_event("space", false, 2.0);
        assert_eq!(released.event_type, EventType::KeyReleased);
        assert!(!released.is_pressed());
    }

    #[test]
    fn test_publish_is_deferred_until_dispatch() {
        let mut bus = EventBus::new();
        let (listener, seen) = recorder(false);
        bus.subscribe(KEYBOARD_TOPIC, listener);

        bus.publish(Event::key_event("w", true, 0.0));
        assert!(seen.borrow().is_empty());
        assert_eq!(bus.queue_len(), 1);

        let delivered = bus.dispatch();
        assert_eq!(delivered.len(), 1);
        assert_eq!(*seen.borrow(), vec!["w:true".to_string()]);
        assert_eq!(bus.queue_len(), 0);
    }

    #[test]
    fn test_failing_listener_does_not_block_others() {
        let mut bus = EventBus::new();
        let (first, first_seen) = recorder(true);
        let (second, second_seen) = recorder(false);
        bus.subscribe(KEYBOARD_TOPIC, first);
        bus.subscribe(KEYBOARD_TOPIC, second);

        bus.publish(Event::key_event("a", false, 0.0));
        bus.dispatch();
        assert_eq!(first_seen.borrow().len(), 1);
        assert_eq!(second_seen.borrow().len(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        let (listener, seen) = recorder(false);
        let id = bus.subscribe(KEYBOARD_TOPIC, listener);
        assert_eq!(bus.listener_count(KEYBOARD_TOPIC), 1);

        assert!(bus.unsubscribe(KEYBOARD_TOPIC, id));
        assert!(!bus.unsubscribe(KEYBOARD_TOPIC, id));
        assert!(!bus.unsubscribe("mouse", id));

        bus.publish(Event::key_event("d", true, 0.0));
        bus.dispatch();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_clear_drops_pending() {
        let mut bus = EventBus::new();
        bus.publish(Event::key_event("s", true, 0.0));
        bus.clear();
        assert!(bus.dispatch().is_empty());
    }
}
