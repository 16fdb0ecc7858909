// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw input notifications as delivered by a host.
//!
//! Positions here are *absolute*; the recognizer maps them to surface-local
//! space before doing anything else.
//!
//! Touch notifications follow the usual browser shape:
//!
//! - `touches`: every contact currently down on the surface.
//! - `changed`: the contacts this notification is about. For an end
//!   notification these are the lifted contacts, with their final positions,
//!   and they no longer appear in `touches`.

use kurbo::Point;
use smallvec::SmallVec;

use crate::event::Buttons;

/// Opaque host-assigned identifier of a touch contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactId(pub u64);

/// A touch contact as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawContact {
    /// Host identifier, stable for the lifetime of the contact.
    pub id: ContactId,
    /// Absolute position.
    pub position: Point,
}

impl RawContact {
    /// Create a contact from an id and absolute coordinates.
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self {
            id: ContactId(id),
            position: Point::new(x, y),
        }
    }
}

/// Inline list of contacts; two fit without allocating, which covers the common case.
pub type TouchList = SmallVec<[RawContact; 2]>;

/// Kind of raw notification a host can deliver, used to register listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RawEventKind {
    /// Mouse button pressed over the surface.
    MouseDown,
    /// Mouse moved anywhere in the host.
    MouseMove,
    /// Mouse button released anywhere in the host.
    MouseUp,
    /// Wheel or scroll.
    Wheel,
    /// A touch began on the surface.
    TouchStart,
    /// Touches moved.
    TouchMove,
    /// Touches lifted.
    TouchEnd,
}

impl RawEventKind {
    /// Listeners a mouse-only host must provide.
    pub const MOUSE: [Self; 4] = [Self::MouseDown, Self::MouseMove, Self::MouseUp, Self::Wheel];
    /// Listeners a touch-capable host must provide.
    pub const TOUCH: [Self; 3] = [Self::TouchStart, Self::TouchMove, Self::TouchEnd];
}

/// One raw notification.
#[derive(Clone, Debug, PartialEq)]
pub enum RawInput {
    /// Mouse button pressed over the surface.
    MouseDown {
        /// Absolute position.
        position: Point,
        /// Buttons held, including the one just pressed.
        buttons: Buttons,
    },
    /// Mouse moved.
    MouseMove {
        /// Absolute position.
        position: Point,
        /// Buttons currently held.
        buttons: Buttons,
        /// Whether the pointer is over the surface.
        over_surface: bool,
    },
    /// Mouse button released.
    MouseUp {
        /// Absolute position.
        position: Point,
    },
    /// Wheel scrolled.
    Wheel {
        /// Absolute pointer position.
        position: Point,
        /// Vertical scroll amount; positive scrolls down.
        delta_y: f64,
        /// Whether the pointer is over the surface.
        over_surface: bool,
    },
    /// One or more touches began.
    TouchStart {
        /// All contacts currently down on the surface.
        touches: TouchList,
    },
    /// Touches moved.
    TouchMove {
        /// All contacts currently down.
        touches: TouchList,
        /// Contacts that moved.
        changed: TouchList,
    },
    /// Touches lifted.
    TouchEnd {
        /// Contacts still down.
        touches: TouchList,
        /// Contacts that lifted, at their final positions.
        changed: TouchList,
    },
}

impl RawInput {
    /// The listener kind that delivers this notification.
    pub fn kind(&self) -> RawEventKind {
        match self {
            Self::MouseDown { .. } => RawEventKind::MouseDown,
            Self::MouseMove { .. } => RawEventKind::MouseMove,
            Self::MouseUp { .. } => RawEventKind::MouseUp,
            Self::Wheel { .. } => RawEventKind::Wheel,
            Self::TouchStart { .. } => RawEventKind::TouchStart,
            Self::TouchMove { .. } => RawEventKind::TouchMove,
            Self::TouchEnd { .. } => RawEventKind::TouchEnd,
        }
    }
}

/// A tracked contact located in a touch notification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Located {
    pub(crate) position: Point,
    /// The contact is listed in `changed`.
    pub(crate) changed: bool,
}

/// Find `id` in a notification, preferring the changed list.
pub(crate) fn locate(
    id: ContactId,
    touches: &[RawContact],
    changed: &[RawContact],
) -> Option<Located> {
    if let Some(c) = changed.iter().find(|c| c.id == id) {
        return Some(Located {
            position: c.position,
            changed: true,
        });
    }
    touches.iter().find(|c| c.id == id).map(|c| Located {
        position: c.position,
        changed: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn locate_prefers_changed_list() {
        let touches: TouchList = smallvec![RawContact::new(1, 0.0, 0.0)];
        let changed: TouchList = smallvec![RawContact::new(1, 5.0, 5.0)];
        let found = locate(ContactId(1), &touches, &changed).unwrap();
        assert!(found.changed);
        assert_eq!(found.position, Point::new(5.0, 5.0));
    }

    #[test]
    fn locate_falls_back_to_active_list() {
        let touches: TouchList =
            smallvec![RawContact::new(1, 1.0, 2.0), RawContact::new(2, 3.0, 4.0)];
        let found = locate(ContactId(2), &touches, &[]).unwrap();
        assert!(!found.changed);
        assert_eq!(found.position, Point::new(3.0, 4.0));
    }

    #[test]
    fn locate_unknown_id_is_none() {
        let touches: TouchList = smallvec![RawContact::new(1, 1.0, 2.0)];
        assert!(locate(ContactId(9), &touches, &touches).is_none());
    }

    #[test]
    fn kinds_partition_by_device() {
        let up = RawInput::MouseUp {
            position: Point::ZERO,
        };
        assert_eq!(up.kind(), RawEventKind::MouseUp);
        let start = RawInput::TouchStart {
            touches: TouchList::new(),
        };
        assert!(RawEventKind::TOUCH.contains(&start.kind()));
        assert!(RawEventKind::MOUSE.contains(&up.kind()));
    }
}
