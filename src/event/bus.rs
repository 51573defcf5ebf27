use std::cell::RefCell;

use super::{EditorEvent, EventHandler};

/// A simple event bus for broadcasting editor events to registered handlers
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    /// Emit an event to all registered handlers
    pub fn emit(&self, event: EditorEvent) {
        log::trace!("event: {event:?}");
        for handler in &mut *self.handlers.borrow_mut() {
            handler.handle_event(&event);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    struct Recorder(Arc<Mutex<Vec<EditorEvent>>>);

    impl EventHandler for Recorder {
        fn handle_event(&mut self, event: &EditorEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_emit_reaches_every_handler() {
        let bus = EventBus::new();
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(Box::new(Recorder(first.clone())));
        bus.subscribe(Box::new(Recorder(second.clone())));

        bus.emit(EditorEvent::Undone);

        assert_eq!(bus.handler_count(), 2);
        assert_eq!(*first.lock().unwrap(), vec![EditorEvent::Undone]);
        assert_eq!(*second.lock().unwrap(), vec![EditorEvent::Undone]);
    }
}
