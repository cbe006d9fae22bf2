use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use super::{AuthEvent, Listener};

static REGISTRY: OnceLock<EventRegistry> = OnceLock::new();

/// Process-wide listeners, installed once by [`register_event_listeners`].
pub struct EventRegistry {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventRegistry {
    fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Listeners are called in registration order.
    pub fn listen(&mut self, listener: impl Listener) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn deliver(&self, event: &AuthEvent) {
        for listener in self.listeners.iter().filter(|l| l.wants(event)) {
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| listener.handle(event)));
            if delivered.is_err() {
                log::warn!(
                    target: "portcullis",
                    "msg=\"event listener panicked\", event=\"{}\"",
                    event.name()
                );
            }
        }
    }
}

/// Installs the process-wide listeners. Only the first call takes effect;
/// later calls are logged and ignored.
pub fn register_event_listeners<F>(f: F)
where
    F: FnOnce(&mut EventRegistry),
{
    let mut registry = EventRegistry::new();
    f(&mut registry);
    if REGISTRY.set(registry).is_err() {
        log::warn!(
            target: "portcullis",
            "msg=\"listeners already registered, ignoring\""
        );
    }
}

/// Hands `event` to every interested listener. No-op before registration.
pub(crate) fn emit(event: AuthEvent) {
    if let Some(registry) = REGISTRY.get() {
        registry.deliver(&event);
    }
}
