//! Hand-off between the window procedure, which produces events whenever the
//! OS dispatches a message, and the application loop, which polls once per
//! frame and expects an immediate answer.

use std::cell::RefCell;

use crate::event::TrayEvent;
use crate::queue::RingBuffer;

pub const EVENT_QUEUE_CAPACITY: usize = 50;

#[derive(Debug, Default)]
pub struct EventBridge {
    events: RingBuffer<TrayEvent, EVENT_QUEUE_CAPACITY>,
    selection: Option<u16>,
}

impl EventBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called from the OS callback. The oldest unread event is lost on overflow.
    pub fn push_event(&mut self, event: TrayEvent) {
        if let Some(lost) = self.events.push(event) {
            tracing::trace!(
                "Tray event queue full, dropped {lost} ({} dropped so far)",
                self.events.dropped()
            );
        }
    }

    pub fn pop_event(&mut self) -> Option<TrayEvent> {
        self.events.pop()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Records a context menu selection, replacing any unread one.
    pub fn select_menu_item(&mut self, id: u16) {
        if let Some(previous) = self.selection.replace(id) {
            tracing::debug!("Menu selection {previous} replaced by {id} before it was polled");
        }
    }

    pub fn take_menu_selection(&mut self) -> Option<u16> {
        self.selection.take()
    }
}

/// Something that can dispatch every OS message waiting for the tray window.
///
/// Dispatching re-enters the window procedure, which is where events get
/// pushed, so nothing may be borrowed from the shared context while pumping.
pub trait MessagePump {
    fn pump(&self);
}

/// Drains `pump` and only then borrows `cell` to read from it.
pub fn poll_with<T, P, R>(pump: &P, cell: &RefCell<T>, read: impl FnOnce(&mut T) -> R) -> R
where
    P: MessagePump + ?Sized,
{
    pump.pump();
    read(&mut *cell.borrow_mut())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn second_selection_replaces_first() {
        let mut bridge = EventBridge::new();
        bridge.select_menu_item(3);
        bridge.select_menu_item(9);

        assert_eq!(bridge.take_menu_selection(), Some(9));
        assert_eq!(bridge.take_menu_selection(), None);
    }

    #[test]
    fn selection_and_events_are_independent() {
        let mut bridge = EventBridge::new();
        bridge.push_event(TrayEvent::Clicked);
        bridge.select_menu_item(1);

        assert_eq!(bridge.take_menu_selection(), Some(1));
        assert_eq!(bridge.pop_event(), Some(TrayEvent::Clicked));
        assert_eq!(bridge.pop_event(), None);
    }

    struct PushOnPump(Rc<RefCell<EventBridge>>, TrayEvent);

    impl MessagePump for PushOnPump {
        fn pump(&self) {
            self.0.borrow_mut().push_event(self.1);
        }
    }

    #[test]
    fn poll_sees_events_delivered_during_the_pump() {
        let shared = Rc::new(RefCell::new(EventBridge::new()));
        let pump = PushOnPump(shared.clone(), TrayEvent::BalloonClicked);

        let event = poll_with(&pump, &*shared, EventBridge::pop_event);
        assert_eq!(event, Some(TrayEvent::BalloonClicked));
    }
}
