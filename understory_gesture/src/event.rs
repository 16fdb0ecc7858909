// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Normalized gesture events.
//!
//! Every raw mouse or touch notification is translated into zero or more
//! [`GestureEvent`]s. There are five kinds:
//!
//! | Kind      | `delta`                          | `drag`                    |
//! |-----------|----------------------------------|---------------------------|
//! | `Press`   | always zero                      | always `true`             |
//! | `Move`    | cumulative while pressed, incremental while hovering | press held |
//! | `Release` | from the press origin            | always `false`            |
//! | `Zoom`    | as `Move` on the same channel    | as `Move`                 |
//! | `Click`   | always zero                      | n/a                       |
//!
//! A `Click` never appears on its own: it immediately follows the `Release` that
//! completed the tap.
//!
//! [`ContactKind`] tells consumers which logical channel an event belongs to, so
//! two-finger handling can keep the one-finger drag and the pinch apart.

use kurbo::{Point, Vec2};

bitflags::bitflags! {
    /// Mouse buttons held during a press sequence.
    ///
    /// Touch input always reports an empty mask.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Buttons: u8 {
        /// Left button.
        const PRIMARY = 1;
        /// Right button.
        const SECONDARY = 2;
        /// Middle button.
        const AUXILIARY = 4;
    }
}

/// Logical input channel an event belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContactKind {
    /// The mouse pointer.
    Mouse,
    /// The one-finger channel, driven by the primary touch.
    Single,
    /// The two-finger channel, live while a second touch is down.
    Pinch,
}

/// Position, delta and press state shared by press, move, release and zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerSample {
    /// Surface-local position.
    pub position: Point,
    /// Offset from the channel's reference position.
    pub delta: Vec2,
    /// Whether a press is held on this channel.
    pub drag: bool,
    /// Buttons sampled at press time.
    pub button: Buttons,
    /// Channel this sample belongs to.
    pub contact: ContactKind,
}

/// A pinch-zoom step.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoomSample {
    /// Signed change in zoom distance since the previous step.
    ///
    /// For two touches this is the change in inter-contact distance; for the
    /// mouse wheel it is the scaled wheel delta.
    pub value: f64,
    /// Point the zoom is centered on.
    pub center: Point,
    /// Pointer state of the channel carrying the zoom.
    pub sample: PointerSample,
}

/// A completed tap.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClickSample {
    /// Release position.
    pub position: Point,
    /// Buttons of the press that produced the click.
    pub button: Buttons,
}

/// Event kind without payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// See [`GestureEvent::Press`].
    Press,
    /// See [`GestureEvent::Move`].
    Move,
    /// See [`GestureEvent::Release`].
    Release,
    /// See [`GestureEvent::Zoom`].
    Zoom,
    /// See [`GestureEvent::Click`].
    Click,
}

/// A normalized gesture event.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum GestureEvent {
    /// A channel went down.
    Press(PointerSample),
    /// A channel moved, pressed or hovering.
    Move(PointerSample),
    /// A channel went up.
    Release(PointerSample),
    /// Pinch or wheel zoom.
    Zoom(ZoomSample),
    /// A tap, right after its release.
    Click(ClickSample),
}

impl GestureEvent {
    /// The payload-less kind.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Press(_) => EventKind::Press,
            Self::Move(_) => EventKind::Move,
            Self::Release(_) => EventKind::Release,
            Self::Zoom(_) => EventKind::Zoom,
            Self::Click(_) => EventKind::Click,
        }
    }

    /// The pointer sample, for every kind except `Click`.
    pub fn sample(&self) -> Option<&PointerSample> {
        match self {
            Self::Press(s) | Self::Move(s) | Self::Release(s) => Some(s),
            Self::Zoom(z) => Some(&z.sample),
            Self::Click(_) => None,
        }
    }

    /// Surface-local position.
    pub fn position(&self) -> Point {
        match self {
            Self::Click(c) => c.position,
            _ => self.sample().map_or(Point::ZERO, |s| s.position),
        }
    }

    /// Offset from the channel reference; zero for clicks.
    pub fn delta(&self) -> Vec2 {
        self.sample().map_or(Vec2::ZERO, |s| s.delta)
    }

    /// Whether a press is held; `false` for clicks.
    pub fn drag(&self) -> bool {
        self.sample().is_some_and(|s| s.drag)
    }

    /// Button mask of the press sequence.
    pub fn button(&self) -> Buttons {
        match self {
            Self::Click(c) => c.button,
            _ => self.sample().map_or(Buttons::empty(), |s| s.button),
        }
    }

    /// Channel of the event. Clicks are reported on no particular channel.
    pub fn contact(&self) -> Option<ContactKind> {
        self.sample().map(|s| s.contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(contact: ContactKind) -> PointerSample {
        PointerSample {
            position: Point::new(4.0, 5.0),
            delta: Vec2::new(1.0, -1.0),
            drag: true,
            button: Buttons::PRIMARY,
            contact,
        }
    }

    #[test]
    fn accessors_read_through_zoom() {
        let ev = GestureEvent::Zoom(ZoomSample {
            value: 2.5,
            center: Point::new(10.0, 10.0),
            sample: sample(ContactKind::Pinch),
        });
        assert_eq!(ev.kind(), EventKind::Zoom);
        assert_eq!(ev.position(), Point::new(4.0, 5.0));
        assert_eq!(ev.delta(), Vec2::new(1.0, -1.0));
        assert!(ev.drag());
        assert_eq!(ev.contact(), Some(ContactKind::Pinch));
    }

    #[test]
    fn click_has_zero_delta_and_no_drag() {
        let ev = GestureEvent::Click(ClickSample {
            position: Point::new(7.0, 8.0),
            button: Buttons::SECONDARY,
        });
        assert_eq!(ev.kind(), EventKind::Click);
        assert_eq!(ev.delta(), Vec2::ZERO);
        assert!(!ev.drag());
        assert_eq!(ev.button(), Buttons::SECONDARY);
        assert_eq!(ev.contact(), None);
    }

    #[test]
    fn button_bits_match_host_masks() {
        assert_eq!(Buttons::PRIMARY.bits(), 1);
        assert_eq!(Buttons::SECONDARY.bits(), 2);
        assert_eq!(Buttons::AUXILIARY.bits(), 4);
        assert_eq!(
            Buttons::from_bits_truncate(0b1101),
            Buttons::PRIMARY | Buttons::AUXILIARY
        );
    }
}
