//=========================================================================
// Event Dispatcher
//=========================================================================
//
// One-shot helper bound to a single event instance. Each `dispatch` call
// compares the event's runtime type against a handler's static variant
// type and, on a match, runs the handler and stores its verdict in
// `handled`.
//
// ```text
// let mut dispatcher = EventDispatcher::new(&mut event);
// dispatcher.dispatch::<MouseMoved>(|e| { ...; true });   // matched?
// dispatcher.dispatch::<MouseScrolled>(|e| { ...; false });
// ```
//
//=========================================================================

use super::{Event, EventVariant};

//=== EventDispatcher =====================================================

/// Type-matches one event against any number of handlers.
pub struct EventDispatcher<'a> {
    event: &'a mut Event,
}

impl<'a> EventDispatcher<'a> {
    pub fn new(event: &'a mut Event) -> Self {
        Self { event }
    }

    /// Runs `handler` if the bound event is exactly variant `E`.
    ///
    /// On a match the handler's return value becomes the event's `handled`
    /// flag and `true` is returned, whatever the handler decided. On a
    /// mismatch the handler is not invoked and `false` is returned.
    pub fn dispatch<E, F>(&mut self, handler: F) -> bool
    where
        E: EventVariant,
        F: FnOnce(&mut E) -> bool,
    {
        if self.event.event_type() != E::TYPE {
            return false;
        }

        let Some(payload) = E::narrow_mut(self.event.kind_mut()) else {
            return false;
        };

        let claimed = handler(payload);
        self.event.handled = claimed;
        true
    }

    /// Whether the bound event has been claimed so far.
    pub fn is_handled(&self) -> bool {
        self.event.handled
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
