use foundation::Millis;

/// A change notification stamped with the time it was published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event<E> {
    pub at: Millis,
    pub kind: E,
}

/// Ordered, single-threaded notification queue.
///
/// Producers `emit`; the host drains after each operation and reacts in
/// publication order.
#[derive(Debug)]
pub struct EventBus<E> {
    events: Vec<Event<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, at: Millis, kind: E) {
        self.events.push(Event { at, kind });
    }

    pub fn events(&self) -> &[Event<E>] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        std::mem::take(&mut self.events)
    }
}
