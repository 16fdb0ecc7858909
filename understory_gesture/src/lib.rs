// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Gesture: normalize pointer input into gesture events.
//!
//! A drawing surface receives very different raw input depending on its host:
//! mouse buttons and a wheel on desktops, one or more touch contacts on phones
//! and tablets. This crate turns all of it into one small stream of
//! [`GestureEvent`]s so that tools built on the surface never look at raw input:
//!
//! - **Press / Move / Release** for the mouse, the first finger, and the pinch
//!   channel while two fingers are down.
//! - **Click** when a press is released close to where it started, soon enough.
//! - **Zoom** from the wheel, or from the change in distance between two fingers.
//!
//! The pieces, bottom-up:
//!
//! - [`CoordinateMapper`]: absolute input coordinates to integer-rounded surface
//!   coordinates.
//! - [`ClickWindow`]: the tap window opened by a press and closed by a timeout,
//!   a cancel, or a release that consumes it.
//! - [`ContactTracks`] / [`PointerTrack`]: identity and reference points of up to
//!   two touches.
//! - [`GestureRecognizer`]: the state machine, attached to a host through the
//!   [`InputHost`] trait.
//! - [`EventDispatcher`]: synchronous, ordered fan-out to subscribers.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::cell::RefCell;
//! use std::rc::Rc;
//! use kurbo::{Point, Vec2};
//! use understory_gesture::{
//!     Buttons, GestureEvent, GestureRecognizer, InputHost, LayoutOrigin, ListenerId,
//!     RawEventKind, RawInput,
//! };
//!
//! /// A desktop canvas placed 10px right of its window's origin.
//! struct Canvas {
//!     next: u64,
//! }
//!
//! impl InputHost for Canvas {
//!     fn supports_touch(&self) -> bool {
//!         false
//!     }
//!     fn listen(&mut self, _kind: RawEventKind) -> ListenerId {
//!         self.next += 1;
//!         ListenerId(self.next)
//!     }
//!     fn unlisten(&mut self, _kind: RawEventKind, _id: ListenerId) {}
//!     fn layout_origin(&self) -> Option<LayoutOrigin> {
//!         Some(LayoutOrigin::Root { surface_offset: Vec2::new(10.0, 0.0) })
//!     }
//! }
//!
//! let mut canvas = Canvas { next: 0 };
//! let mut recognizer = GestureRecognizer::default();
//! let events = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&events);
//! recognizer.subscribe(move |ev: &GestureEvent| sink.borrow_mut().push(*ev));
//! recognizer.start(&mut canvas);
//!
//! recognizer.handle(
//!     &RawInput::MouseDown { position: Point::new(110.0, 100.0), buttons: Buttons::PRIMARY },
//!     0,
//! );
//! recognizer.handle(&RawInput::MouseUp { position: Point::new(112.0, 101.0) }, 120);
//!
//! let events = events.borrow();
//! assert_eq!(events.len(), 3);
//! assert_eq!(events[0].position(), Point::new(100.0, 100.0));
//! assert_eq!(events[1].delta(), Vec2::new(2.0, 1.0));
//! assert!(matches!(events[2], GestureEvent::Click(_)));
//!
//! recognizer.stop(&mut canvas);
//! ```
//!
//! ## Time
//!
//! The recognizer never reads a clock. Every raw notification is handed in with
//! a millisecond timestamp, and the tap window closes lazily when a later
//! notification arrives past its deadline. Hosts with a scheduler may also
//! schedule [`GestureRecognizer::pending_click_timer`] and deliver it through
//! [`GestureRecognizer::on_click_timeout`]; superseded timers are ignored.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo` and `log`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//! - `serde`: `Serialize`/`Deserialize` for [`GestureConfig`] and the event types.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod click;
pub mod config;
pub mod dispatcher;
pub mod event;
pub mod geometry;
pub mod host;
pub mod raw;
pub mod recognizer;
pub mod track;

pub use click::{ClickTimer, ClickWindow};
pub use config::GestureConfig;
pub use dispatcher::{EventDispatcher, PointerCallbacks, SubscriptionId};
pub use event::{
    Buttons, ClickSample, ContactKind, EventKind, GestureEvent, PointerSample, ZoomSample,
};
pub use geometry::{CoordinateMapper, LayoutOrigin};
pub use host::{InputHost, InputMode, ListenerId};
pub use raw::{ContactId, RawContact, RawEventKind, RawInput, TouchList};
pub use recognizer::{GestureRecognizer, IgnoreReason, InputOutcome};
pub use track::{ContactTracks, Pairing, PointerTrack, Slot};
