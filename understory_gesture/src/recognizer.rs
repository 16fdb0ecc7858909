// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gesture state machine.
//!
//! [`GestureRecognizer`] consumes [`RawInput`] notifications from one host surface
//! and publishes [`GestureEvent`]s through its [`EventDispatcher`].
//!
//! ## Channels
//!
//! - **Mouse** ([`ContactKind::Mouse`]): one implicit contact. Moves are reported
//!   while hovering over the surface (incremental `delta`, `drag == false`) and
//!   while a button is held anywhere (cumulative `delta` from the press).
//! - **Single** ([`ContactKind::Single`]): the primary touch. `delta` is
//!   cumulative from the press origin and survives a two-finger handoff.
//! - **Pinch** ([`ContactKind::Pinch`]): live while two touches are down. Its
//!   position is the primary touch, its `delta` is measured from where the pinch
//!   began, and it carries the [`Zoom`](GestureEvent::Zoom) events.
//!
//! ## Emission order
//!
//! Events for one notification are published in a fixed order once the
//! notification has been fully processed:
//!
//! - Release that completes a tap: `Release`, then `Click`.
//! - Two-finger move: `Move` (single), `Move` (pinch), then `Zoom` once a
//!   baseline distance exists.
//! - Both fingers lifting together: `Release` (pinch), `Release` (single),
//!   then possibly `Click`.
//!
//! ## Example
//!
//! ```
//! use core::cell::RefCell;
//! use std::rc::Rc;
//! use kurbo::Point;
//! use understory_gesture::event::{Buttons, EventKind};
//! use understory_gesture::geometry::LayoutOrigin;
//! use understory_gesture::host::{InputHost, ListenerId};
//! use understory_gesture::raw::{RawEventKind, RawInput};
//! use understory_gesture::recognizer::GestureRecognizer;
//!
//! struct Desktop(u64);
//! impl InputHost for Desktop {
//!     fn supports_touch(&self) -> bool { false }
//!     fn listen(&mut self, _: RawEventKind) -> ListenerId { self.0 += 1; ListenerId(self.0) }
//!     fn unlisten(&mut self, _: RawEventKind, _: ListenerId) {}
//!     fn layout_origin(&self) -> Option<LayoutOrigin> { None }
//! }
//!
//! let mut host = Desktop(0);
//! let mut recognizer = GestureRecognizer::default();
//! let kinds = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&kinds);
//! recognizer.subscribe(move |ev| sink.borrow_mut().push(ev.kind()));
//! recognizer.start(&mut host);
//!
//! let at = Point::new(100.0, 100.0);
//! recognizer.handle(&RawInput::MouseDown { position: at, buttons: Buttons::PRIMARY }, 0);
//! recognizer.handle(&RawInput::MouseUp { position: at }, 80);
//!
//! assert_eq!(*kinds.borrow(), [EventKind::Press, EventKind::Release, EventKind::Click]);
//! ```

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::click::{ClickTimer, ClickWindow};
use crate::config::GestureConfig;
use crate::dispatcher::{EventDispatcher, PointerCallbacks, SubscriptionId};
use crate::event::{Buttons, ClickSample, ContactKind, GestureEvent, PointerSample, ZoomSample};
use crate::geometry::{CoordinateMapper, LayoutOrigin};
use crate::host::{InputHost, InputMode, ListenerId};
use crate::raw::{RawContact, RawEventKind, RawInput, locate};
use crate::track::{ContactTracks, Pairing, PointerTrack, Slot};

/// Why a raw notification produced no events.
///
/// None of these are errors; they exist for diagnostics and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// The recognizer is not started.
    Stopped,
    /// The notification is for the other input family (e.g. wheel on a touch host).
    WrongDevice,
    /// Mouse move or wheel away from the surface with no press held.
    OffSurface,
    /// Release or move with nothing pressed.
    NoActivePress,
    /// Another mouse button went down during a press.
    AlreadyPressed,
    /// A tracked contact is missing from the notification.
    StaleContact,
    /// None of the tracked contacts changed.
    Unchanged,
    /// More than two touches are down.
    ContactLimit,
}

/// Result of [`GestureRecognizer::handle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputOutcome {
    /// This many events were published.
    Emitted(usize),
    /// No events were published.
    Ignored(IgnoreReason),
}

type Step = Result<(), IgnoreReason>;

/// A held press on the mouse or single channel.
#[derive(Clone, Copy, Debug)]
struct Press {
    /// Drag reference; moved by the inter-contact offset on handoff.
    origin: Point,
    /// Sampled at press time.
    button: Buttons,
}

/// Normalizes the raw input of one surface into gesture events.
#[derive(Debug)]
pub struct GestureRecognizer {
    config: GestureConfig,
    mapper: CoordinateMapper,
    dispatcher: EventDispatcher,
    click: ClickWindow,
    /// `None` while stopped.
    mode: Option<InputMode>,
    listeners: SmallVec<[(RawEventKind, ListenerId); 4]>,
    press: Option<Press>,
    /// Last mouse position, for incremental hover deltas.
    hover: Option<Point>,
    tracks: ContactTracks,
    /// Inter-contact distance at the previous pinch sample.
    pinch_distance: Option<f64>,
    /// Events of the notification being processed.
    pending: SmallVec<[GestureEvent; 4]>,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureRecognizer {
    /// Create a stopped recognizer.
    pub fn new(config: GestureConfig) -> Self {
        let config = config.sanitized();
        Self {
            config,
            mapper: CoordinateMapper::unresolved(),
            dispatcher: EventDispatcher::new(),
            click: ClickWindow::new(config.click_timeout),
            mode: None,
            listeners: SmallVec::new(),
            press: None,
            hover: None,
            tracks: ContactTracks::new(),
            pinch_distance: None,
            pending: SmallVec::new(),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Current coordinate mapper.
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Update the surface layout origin, e.g. after a relayout.
    pub fn set_layout_origin(&mut self, origin: Option<LayoutOrigin>) {
        self.mapper = CoordinateMapper::from_origin(origin);
    }

    /// Subscribe to normalized events.
    pub fn subscribe(&mut self, handler: impl FnMut(&GestureEvent) + 'static) -> SubscriptionId {
        self.dispatcher.subscribe(handler)
    }

    /// Subscribe discrete one-pointer callbacks.
    pub fn subscribe_callbacks(
        &mut self,
        callbacks: impl PointerCallbacks + 'static,
    ) -> SubscriptionId {
        self.dispatcher.subscribe_callbacks(callbacks)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.dispatcher.unsubscribe(id)
    }

    /// Attach to a host.
    ///
    /// Registers the listeners of the host's input family and resolves the
    /// layout origin. Returns `false`, doing nothing, if already started.
    pub fn start(&mut self, host: &mut impl InputHost) -> bool {
        if self.mode.is_some() {
            return false;
        }
        let mode = host.input_mode();
        self.mapper = CoordinateMapper::from_origin(host.layout_origin());
        if self.mapper.origin().is_none() {
            log::debug!("surface layout origin unresolved, treating input as local");
        }
        for &kind in mode.listeners() {
            let id = host.listen(kind);
            self.listeners.push((kind, id));
        }
        self.mode = Some(mode);
        log::debug!("gesture recognizer started in {mode:?} mode");
        true
    }

    /// Detach from a host.
    ///
    /// Hands every listener id back to the host, cancels the click timer and drops
    /// all contact state. Returns `false`, doing nothing, if already stopped.
    pub fn stop(&mut self, host: &mut impl InputHost) -> bool {
        if self.mode.is_none() {
            return false;
        }
        for (kind, id) in self.listeners.drain(..) {
            host.unlisten(kind, id);
        }
        self.mode = None;
        self.reset();
        log::debug!("gesture recognizer stopped");
        true
    }

    /// True between [`start`](Self::start) and [`stop`](Self::stop).
    pub fn is_started(&self) -> bool {
        self.mode.is_some()
    }

    /// Input family chosen at start.
    pub fn mode(&self) -> Option<InputMode> {
        self.mode
    }

    /// True while the mouse or single channel is pressed.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Number of touches being tracked.
    pub fn active_contacts(&self) -> usize {
        self.tracks.len()
    }

    /// The click timer a host may schedule, if a tap window is open.
    pub fn pending_click_timer(&self) -> Option<ClickTimer> {
        self.click.pending()
    }

    /// Deliver a scheduled click timer.
    ///
    /// Returns `true` if it closed the live tap window. Timers from a superseded
    /// window, or delivered after [`stop`](Self::stop), do nothing.
    pub fn on_click_timeout(&mut self, timer: ClickTimer) -> bool {
        self.click.expire(timer)
    }

    /// Process one raw notification received at `now` (milliseconds).
    pub fn handle(&mut self, input: &RawInput, now: u64) -> InputOutcome {
        let step = self.step(input, now);
        match step {
            Ok(()) => InputOutcome::Emitted(self.flush()),
            Err(reason) => {
                log::debug!("ignored {:?}: {reason:?}", input.kind());
                self.pending.clear();
                InputOutcome::Ignored(reason)
            }
        }
    }

    fn step(&mut self, input: &RawInput, now: u64) -> Step {
        let mode = self.mode.ok_or(IgnoreReason::Stopped)?;
        if !mode.accepts(input.kind()) {
            return Err(IgnoreReason::WrongDevice);
        }
        self.click.tick(now);
        match input {
            RawInput::MouseDown { position, buttons } => self.mouse_down(*position, *buttons, now),
            RawInput::MouseMove {
                position,
                buttons,
                over_surface,
            } => self.mouse_move(*position, *buttons, *over_surface),
            RawInput::MouseUp { position } => self.mouse_up(*position, now),
            RawInput::Wheel {
                position,
                delta_y,
                over_surface,
            } => self.wheel(*position, *delta_y, *over_surface),
            RawInput::TouchStart { touches } => self.touch_start(touches, now),
            RawInput::TouchMove { touches, changed } => self.touch_move(touches, changed),
            RawInput::TouchEnd { touches, changed } => self.touch_end(touches, changed, now),
        }
    }

    fn flush(&mut self) -> usize {
        let count = self.pending.len();
        for event in self.pending.drain(..) {
            log::trace!("emit {event:?}");
            self.dispatcher.publish(&event);
        }
        count
    }

    fn reset(&mut self) {
        self.click.clear();
        self.press = None;
        self.hover = None;
        self.tracks.clear();
        self.pinch_distance = None;
        self.pending.clear();
    }

    // Mouse

    fn mouse_down(&mut self, position: Point, buttons: Buttons, now: u64) -> Step {
        if self.press.is_some() {
            return Err(IgnoreReason::AlreadyPressed);
        }
        let p = self.mapper.map(position);
        self.press = Some(Press {
            origin: p,
            button: buttons,
        });
        self.hover = Some(p);
        self.click.arm(p, now);
        self.emit_press(p, buttons, ContactKind::Mouse);
        Ok(())
    }

    fn mouse_move(&mut self, position: Point, buttons: Buttons, over_surface: bool) -> Step {
        let p = self.mapper.map(position);
        let sample = match self.press {
            Some(press) => sample(p, p - press.origin, true, press.button, ContactKind::Mouse),
            None => {
                if !over_surface {
                    self.hover = None;
                    return Err(IgnoreReason::OffSurface);
                }
                let delta = self.hover.map_or(Vec2::ZERO, |last| p - last);
                sample(p, delta, false, buttons, ContactKind::Mouse)
            }
        };
        self.hover = Some(p);
        self.pending.push(GestureEvent::Move(sample));
        Ok(())
    }

    fn mouse_up(&mut self, position: Point, now: u64) -> Step {
        if self.press.is_none() {
            return Err(IgnoreReason::NoActivePress);
        }
        let p = self.mapper.map(position);
        self.hover = Some(p);
        self.release_press(p, ContactKind::Mouse, now);
        Ok(())
    }

    fn wheel(&mut self, position: Point, delta_y: f64, over_surface: bool) -> Step {
        if self.press.is_none() && !over_surface {
            return Err(IgnoreReason::OffSurface);
        }
        let p = self.mapper.map(position);
        let sample = match self.press {
            Some(press) => sample(p, p - press.origin, true, press.button, ContactKind::Mouse),
            None => sample(p, Vec2::ZERO, false, Buttons::empty(), ContactKind::Mouse),
        };
        self.pending.push(GestureEvent::Zoom(ZoomSample {
            value: -delta_y / self.config.wheel_divisor,
            center: p,
            sample,
        }));
        Ok(())
    }

    // Touch

    fn touch_start(&mut self, touches: &[RawContact], now: u64) -> Step {
        match *touches {
            [] => Err(IgnoreReason::Unchanged),
            [only] => {
                if let Some(primary) = self.tracks.primary() {
                    if self.tracks.len() == 1 && primary.id == only.id {
                        return Err(IgnoreReason::Unchanged);
                    }
                    log::debug!("touch start with stale contacts, restarting at {:?}", only.id);
                }
                self.begin_single(only, now);
                Ok(())
            }
            [first, second] => {
                if self.tracks.is_pinching() {
                    return Err(IgnoreReason::Unchanged);
                }
                match self.tracks.reconcile(first.id, second.id) {
                    Pairing::Ordered => self.begin_pinch(first, second),
                    Pairing::Swapped => self.begin_pinch(second, first),
                    Pairing::Unknown => {
                        if !self.tracks.is_empty() {
                            log::debug!("tracked primary missing from touch start, restarting");
                        }
                        self.begin_single(first, now);
                        self.begin_pinch(first, second)
                    }
                }
            }
            _ => Err(IgnoreReason::ContactLimit),
        }
    }

    fn begin_single(&mut self, contact: RawContact, now: u64) {
        let p = self.mapper.map(contact.position);
        self.tracks.begin_primary(contact.id, p);
        self.press = Some(Press {
            origin: p,
            button: Buttons::empty(),
        });
        self.pinch_distance = None;
        self.click.arm(p, now);
        self.emit_press(p, Buttons::empty(), ContactKind::Single);
    }

    fn begin_pinch(&mut self, primary: RawContact, secondary: RawContact) -> Step {
        let p0 = self.mapper.map(primary.position);
        let p1 = self.mapper.map(secondary.position);
        if !self.tracks.begin_secondary(p0, secondary.id, p1) {
            return Err(IgnoreReason::ContactLimit);
        }
        self.pinch_distance = None;
        self.emit_press(p0, Buttons::empty(), ContactKind::Pinch);
        Ok(())
    }

    fn touch_move(&mut self, touches: &[RawContact], changed: &[RawContact]) -> Step {
        let primary = *self.tracks.primary().ok_or(IgnoreReason::NoActivePress)?;
        let c0 = locate(primary.id, touches, changed).ok_or(IgnoreReason::StaleContact)?;

        let Some(secondary) = self.tracks.secondary().copied() else {
            if !c0.changed {
                return Err(IgnoreReason::Unchanged);
            }
            let p0 = self.mapper.map(c0.position);
            self.tracks.set_position(Slot::Primary, p0);
            self.emit_single_move(p0);
            return Ok(());
        };

        let c1 = locate(secondary.id, touches, changed).ok_or(IgnoreReason::StaleContact)?;
        if !c0.changed && !c1.changed {
            return Err(IgnoreReason::Unchanged);
        }
        let p0 = self.mapper.map(c0.position);
        let p1 = self.mapper.map(c1.position);
        self.tracks.set_position(Slot::Primary, p0);
        self.tracks.set_position(Slot::Secondary, p1);

        self.emit_single_move(p0);
        let anchor_delta = self.tracks.primary().map_or(Vec2::ZERO, PointerTrack::delta);
        let pinch = sample(p0, anchor_delta, true, Buttons::empty(), ContactKind::Pinch);
        self.pending.push(GestureEvent::Move(pinch));

        if let (Some(distance), Some(center)) = (self.tracks.distance(), self.tracks.center()) {
            if let Some(previous) = self.pinch_distance.replace(distance) {
                self.pending.push(GestureEvent::Zoom(ZoomSample {
                    value: distance - previous,
                    center,
                    sample: pinch,
                }));
            }
        }
        Ok(())
    }

    fn touch_end(&mut self, touches: &[RawContact], changed: &[RawContact], now: u64) -> Step {
        let primary = *self.tracks.primary().ok_or(IgnoreReason::NoActivePress)?;
        let c0 = locate(primary.id, touches, changed).ok_or(IgnoreReason::StaleContact)?;

        let Some(secondary) = self.tracks.secondary().copied() else {
            if !c0.changed {
                return Err(IgnoreReason::Unchanged);
            }
            let p0 = self.mapper.map(c0.position);
            self.tracks.clear();
            self.release_press(p0, ContactKind::Single, now);
            return Ok(());
        };

        // A secondary missing from both lists has lifted without being reported.
        let c1 = locate(secondary.id, touches, changed);
        if c1.is_none() {
            log::debug!("{:?} missing from touch end, treating as lifted", secondary.id);
        }
        let p0 = self.mapper.map(c0.position);
        match (c0.changed, c1) {
            (false, Some(c1)) if !c1.changed => return Err(IgnoreReason::Unchanged),
            (false, _) => {
                self.tracks.set_position(Slot::Primary, p0);
                self.tracks.end_secondary();
                self.emit_pinch_release(p0, primary.reference);
            }
            (true, Some(c1)) if !c1.changed => {
                let p1 = self.mapper.map(c1.position);
                self.tracks.set_position(Slot::Primary, p0);
                self.tracks.set_position(Slot::Secondary, p1);
                self.emit_pinch_release(p0, primary.reference);
                if let Some(offset) = self.tracks.promote_secondary() {
                    log::trace!("primary lifted, promoting {:?} by {offset:?}", secondary.id);
                    if let Some(press) = self.press.as_mut() {
                        press.origin += offset;
                    }
                    self.click.rebase(offset);
                }
            }
            (true, _) => {
                self.emit_pinch_release(p0, primary.reference);
                self.tracks.clear();
                self.release_press(p0, ContactKind::Single, now);
            }
        }
        self.pinch_distance = None;
        Ok(())
    }

    // Emission helpers

    fn emit_press(&mut self, p: Point, button: Buttons, contact: ContactKind) {
        self.pending
            .push(GestureEvent::Press(sample(p, Vec2::ZERO, true, button, contact)));
    }

    fn emit_single_move(&mut self, p: Point) {
        let delta = self.press.map_or(Vec2::ZERO, |press| p - press.origin);
        self.pending.push(GestureEvent::Move(sample(
            p,
            delta,
            true,
            Buttons::empty(),
            ContactKind::Single,
        )));
    }

    fn emit_pinch_release(&mut self, p: Point, anchor: Point) {
        self.pending.push(GestureEvent::Release(sample(
            p,
            p - anchor,
            false,
            Buttons::empty(),
            ContactKind::Pinch,
        )));
    }

    /// End the held press at `p`, then emit a click if the tap window agrees.
    fn release_press(&mut self, p: Point, contact: ContactKind, now: u64) {
        let (delta, button) = self
            .press
            .take()
            .map_or((Vec2::ZERO, Buttons::empty()), |press| {
                (p - press.origin, press.button)
            });
        self.pending
            .push(GestureEvent::Release(sample(p, delta, false, button, contact)));
        if self
            .click
            .check_and_consume(p, self.config.click_zone, now)
        {
            self.pending.push(GestureEvent::Click(ClickSample {
                position: p,
                button,
            }));
        }
    }
}

fn sample(
    position: Point,
    delta: Vec2,
    drag: bool,
    button: Buttons,
    contact: ContactKind,
) -> PointerSample {
    PointerSample {
        position,
        delta,
        drag,
        button,
        contact,
    }
}
