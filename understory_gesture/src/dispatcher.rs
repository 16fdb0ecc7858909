// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher: deliver normalized events to subscribers.
//!
//! The dispatcher is deliberately minimal:
//!
//! - Delivery is synchronous; [`EventDispatcher::publish`] returns once every
//!   subscriber has seen the event.
//! - Subscribers are called in subscription order, events in publish order.
//! - There is no buffering or replay; a late subscriber only sees later events.
//!
//! Handlers receive `&GestureEvent` and cannot reach the dispatcher while it is
//! delivering, so a handler is never invoked re-entrantly.
//!
//! ## Minimal example
//!
//! ```
//! use core::cell::RefCell;
//! use std::rc::Rc;
//! use kurbo::{Point, Vec2};
//! use understory_gesture::dispatcher::EventDispatcher;
//! use understory_gesture::event::{Buttons, ContactKind, EventKind, GestureEvent, PointerSample};
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let mut dispatcher = EventDispatcher::new();
//! let sink = Rc::clone(&seen);
//! dispatcher.subscribe(move |ev: &GestureEvent| sink.borrow_mut().push(ev.kind()));
//!
//! dispatcher.publish(&GestureEvent::Press(PointerSample {
//!     position: Point::new(1.0, 2.0),
//!     delta: Vec2::ZERO,
//!     drag: true,
//!     button: Buttons::PRIMARY,
//!     contact: ContactKind::Mouse,
//! }));
//!
//! assert_eq!(*seen.borrow(), vec![EventKind::Press]);
//! ```
//!
//! ## Callback sugar
//!
//! Consumers that only care about one-pointer interaction can implement
//! [`PointerCallbacks`] instead of matching on [`GestureEvent`]. The adapter
//! forwards press/move/release/click for the mouse and the one-finger channel,
//! and drops zoom and pinch-channel events.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::event::{ClickSample, ContactKind, GestureEvent, PointerSample};

/// Handle returned by [`EventDispatcher::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&GestureEvent)>;

/// Synchronous fan-out of gesture events.
#[derive(Default)]
pub struct EventDispatcher {
    subscribers: Vec<(SubscriptionId, Handler)>,
    next_id: u64,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("subscribers", &self.subscribers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl EventDispatcher {
    /// No subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler; it receives every event published from now on.
    pub fn subscribe(&mut self, handler: impl FnMut(&GestureEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Subscribe a [`PointerCallbacks`] implementation.
    pub fn subscribe_callbacks(
        &mut self,
        mut callbacks: impl PointerCallbacks + 'static,
    ) -> SubscriptionId {
        self.subscribe(move |ev| forward(&mut callbacks, ev))
    }

    /// Remove a handler. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Number of live subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// True when nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Deliver `event` to every subscriber, in subscription order.
    pub fn publish(&mut self, event: &GestureEvent) {
        for (_, handler) in &mut self.subscribers {
            handler(event);
        }
    }
}

/// Discrete callbacks for one-pointer consumers.
///
/// Every method defaults to doing nothing.
pub trait PointerCallbacks {
    /// A press began.
    fn on_press(&mut self, _sample: &PointerSample) {}
    /// The pointer moved.
    fn on_move(&mut self, _sample: &PointerSample) {}
    /// The press ended.
    fn on_release(&mut self, _sample: &PointerSample) {}
    /// The press/release pair was a tap.
    fn on_click(&mut self, _click: &ClickSample) {}
}

fn forward(callbacks: &mut impl PointerCallbacks, ev: &GestureEvent) {
    match ev {
        GestureEvent::Press(s) if s.contact != ContactKind::Pinch => callbacks.on_press(s),
        GestureEvent::Move(s) if s.contact != ContactKind::Pinch => callbacks.on_move(s),
        GestureEvent::Release(s) if s.contact != ContactKind::Pinch => callbacks.on_release(s),
        GestureEvent::Click(c) => callbacks.on_click(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Buttons, EventKind, ZoomSample};
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;
    use kurbo::{Point, Vec2};

    fn sample(contact: ContactKind) -> PointerSample {
        PointerSample {
            position: Point::new(1.0, 1.0),
            delta: Vec2::ZERO,
            drag: true,
            button: Buttons::empty(),
            contact,
        }
    }

    #[test]
    fn delivers_in_subscription_then_publish_order() {
        let log: Rc<RefCell<Vec<(u8, EventKind)>>> = Rc::default();
        let mut dispatcher = EventDispatcher::new();
        let a = Rc::clone(&log);
        dispatcher.subscribe(move |ev| a.borrow_mut().push((1, ev.kind())));
        let b = Rc::clone(&log);
        dispatcher.subscribe(move |ev| b.borrow_mut().push((2, ev.kind())));

        dispatcher.publish(&GestureEvent::Press(sample(ContactKind::Mouse)));
        dispatcher.publish(&GestureEvent::Move(sample(ContactKind::Mouse)));

        assert_eq!(
            *log.borrow(),
            vec![
                (1, EventKind::Press),
                (2, EventKind::Press),
                (1, EventKind::Move),
                (2, EventKind::Move),
            ]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0_u32));
        let mut dispatcher = EventDispatcher::new();
        let c = Rc::clone(&count);
        let id = dispatcher.subscribe(move |_| *c.borrow_mut() += 1);
        dispatcher.publish(&GestureEvent::Move(sample(ContactKind::Mouse)));
        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));
        assert!(dispatcher.is_empty());
        dispatcher.publish(&GestureEvent::Move(sample(ContactKind::Mouse)));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn no_replay_for_late_subscribers() {
        let count = Rc::new(RefCell::new(0_u32));
        let mut dispatcher = EventDispatcher::new();
        dispatcher.publish(&GestureEvent::Move(sample(ContactKind::Mouse)));
        let c = Rc::clone(&count);
        dispatcher.subscribe(move |_| *c.borrow_mut() += 1);
        assert_eq!(*count.borrow(), 0);
        assert_eq!(dispatcher.len(), 1);
    }

    #[derive(Default)]
    struct Recorder {
        calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl PointerCallbacks for Recorder {
        fn on_press(&mut self, _: &PointerSample) {
            self.calls.borrow_mut().push("press");
        }
        fn on_move(&mut self, _: &PointerSample) {
            self.calls.borrow_mut().push("move");
        }
        fn on_release(&mut self, _: &PointerSample) {
            self.calls.borrow_mut().push("release");
        }
        fn on_click(&mut self, _: &ClickSample) {
            self.calls.borrow_mut().push("click");
        }
    }

    #[test]
    fn callbacks_skip_zoom_and_pinch_channel() {
        let recorder = Recorder::default();
        let calls = Rc::clone(&recorder.calls);
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe_callbacks(recorder);

        dispatcher.publish(&GestureEvent::Press(sample(ContactKind::Single)));
        dispatcher.publish(&GestureEvent::Press(sample(ContactKind::Pinch)));
        dispatcher.publish(&GestureEvent::Move(sample(ContactKind::Single)));
        dispatcher.publish(&GestureEvent::Move(sample(ContactKind::Pinch)));
        dispatcher.publish(&GestureEvent::Zoom(ZoomSample {
            value: 1.0,
            center: Point::ZERO,
            sample: sample(ContactKind::Pinch),
        }));
        dispatcher.publish(&GestureEvent::Release(sample(ContactKind::Pinch)));
        dispatcher.publish(&GestureEvent::Release(sample(ContactKind::Single)));
        dispatcher.publish(&GestureEvent::Click(ClickSample {
            position: Point::ZERO,
            button: Buttons::empty(),
        }));

        assert_eq!(*calls.borrow(), vec!["press", "move", "release", "click"]);
    }
}
