// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-contact bookkeeping for up to two touches.
//!
//! [`ContactTracks`] holds zero, one or two [`PointerTrack`]s ordered as
//! *primary* (the first contact down) and *secondary*. The primary drives the
//! one-finger channel; the pair drives the pinch.
//!
//! Hosts do not always list touches in a consistent order, so a second contact
//! is placed by matching identifiers against the known primary
//! ([`ContactTracks::reconcile`]) rather than by list position.

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::raw::ContactId;

/// State of one live contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerTrack {
    /// Host identifier.
    pub id: ContactId,
    /// Latest surface-local position.
    pub position: Point,
    /// Position deltas on this contact's pinch channel are measured from.
    pub reference: Point,
}

impl PointerTrack {
    /// Start tracking a contact at `position`.
    pub fn new(id: ContactId, position: Point) -> Self {
        Self {
            id,
            position,
            reference: position,
        }
    }

    /// Offset of the current position from the reference.
    pub fn delta(&self) -> Vec2 {
        self.position - self.reference
    }
}

/// How an incoming pair of contacts lines up with the tracked primary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pairing {
    /// The first contact of the pair is the known primary.
    Ordered,
    /// The second contact of the pair is the known primary.
    Swapped,
    /// Neither contact is the known primary; the tracked state is stale.
    Unknown,
}

/// Which tracked contact a notification is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Index 0.
    Primary,
    /// Index 1.
    Secondary,
}

/// Zero, one or two live contacts.
#[derive(Clone, Debug, Default)]
pub struct ContactTracks {
    tracks: SmallVec<[PointerTrack; 2]>,
}

impl ContactTracks {
    /// Maximum simultaneous contacts.
    pub const MAX: usize = 2;

    /// No contacts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live contacts.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// True when no contact is down.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// True when two contacts are down.
    pub fn is_pinching(&self) -> bool {
        self.tracks.len() == Self::MAX
    }

    /// The first contact down.
    pub fn primary(&self) -> Option<&PointerTrack> {
        self.tracks.first()
    }

    /// The second contact down.
    pub fn secondary(&self) -> Option<&PointerTrack> {
        self.tracks.get(1)
    }

    /// Mutable access to a slot.
    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut PointerTrack> {
        match slot {
            Slot::Primary => self.tracks.get_mut(0),
            Slot::Secondary => self.tracks.get_mut(1),
        }
    }

    /// Replace everything with a single primary contact.
    pub fn begin_primary(&mut self, id: ContactId, position: Point) {
        self.tracks.clear();
        self.tracks.push(PointerTrack::new(id, position));
    }

    /// Add a secondary contact and re-anchor the primary at `primary_position`.
    ///
    /// Returns `false` without changing anything unless exactly one contact is
    /// tracked.
    pub fn begin_secondary(
        &mut self,
        primary_position: Point,
        id: ContactId,
        position: Point,
    ) -> bool {
        if self.tracks.len() != 1 {
            return false;
        }
        self.tracks[0] = PointerTrack::new(self.tracks[0].id, primary_position);
        self.tracks.push(PointerTrack::new(id, position));
        true
    }

    /// Match an incoming pair of ids against the tracked primary, in both orders.
    pub fn reconcile(&self, first: ContactId, second: ContactId) -> Pairing {
        match self.primary() {
            Some(p) if p.id == first => Pairing::Ordered,
            Some(p) if p.id == second => Pairing::Swapped,
            _ => Pairing::Unknown,
        }
    }

    /// Update a slot's position.
    pub fn set_position(&mut self, slot: Slot, position: Point) {
        if let Some(track) = self.get_mut(slot) {
            track.position = position;
        }
    }

    /// Drop the secondary, returning it.
    pub fn end_secondary(&mut self) -> Option<PointerTrack> {
        if self.tracks.len() == Self::MAX {
            self.tracks.pop()
        } else {
            None
        }
    }

    /// Drop the primary and promote the secondary in its place.
    ///
    /// Returns the offset from the lifted primary to the promoted contact at the
    /// moment of the swap, which callers add to their drag origins to keep
    /// deltas continuous. `None` unless two contacts were tracked.
    pub fn promote_secondary(&mut self) -> Option<Vec2> {
        if self.tracks.len() != Self::MAX {
            return None;
        }
        let lifted = self.tracks.remove(0);
        let promoted = &mut self.tracks[0];
        promoted.reference = promoted.position;
        Some(promoted.position - lifted.position)
    }

    /// Forget all contacts.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Vector from the primary to the secondary.
    pub fn span(&self) -> Option<Vec2> {
        Some(self.secondary()?.position - self.primary()?.position)
    }

    /// Euclidean distance between the two contacts.
    pub fn distance(&self) -> Option<f64> {
        self.span().map(Vec2::hypot)
    }

    /// Midpoint between the two contacts.
    pub fn center(&self) -> Option<Point> {
        let span = self.span()?;
        Some(self.primary()?.position + span * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: (u64, f64, f64), b: (u64, f64, f64)) -> ContactTracks {
        let mut tracks = ContactTracks::new();
        tracks.begin_primary(ContactId(a.0), Point::new(a.1, a.2));
        assert!(tracks.begin_secondary(Point::new(a.1, a.2), ContactId(b.0), Point::new(b.1, b.2)));
        tracks
    }

    #[test]
    fn never_more_than_two() {
        let mut tracks = pair((1, 0.0, 0.0), (2, 10.0, 0.0));
        assert!(!tracks.begin_secondary(Point::ZERO, ContactId(3), Point::ZERO));
        assert_eq!(tracks.len(), 2);
        assert!(tracks.is_pinching());
    }

    #[test]
    fn secondary_needs_a_primary() {
        let mut tracks = ContactTracks::new();
        assert!(!tracks.begin_secondary(Point::ZERO, ContactId(3), Point::ZERO));
        assert!(tracks.is_empty());
    }

    #[test]
    fn reconcile_matches_both_orders() {
        let mut tracks = ContactTracks::new();
        tracks.begin_primary(ContactId(7), Point::ZERO);
        assert_eq!(tracks.reconcile(ContactId(7), ContactId(8)), Pairing::Ordered);
        assert_eq!(tracks.reconcile(ContactId(8), ContactId(7)), Pairing::Swapped);
        assert_eq!(tracks.reconcile(ContactId(8), ContactId(9)), Pairing::Unknown);
    }

    #[test]
    fn begin_secondary_reanchors_primary() {
        let mut tracks = ContactTracks::new();
        tracks.begin_primary(ContactId(1), Point::new(0.0, 0.0));
        tracks.set_position(Slot::Primary, Point::new(20.0, 0.0));
        assert!(tracks.begin_secondary(Point::new(25.0, 0.0), ContactId(2), Point::new(60.0, 0.0)));
        let primary = tracks.primary().unwrap();
        assert_eq!(primary.reference, Point::new(25.0, 0.0));
        assert_eq!(primary.delta(), Vec2::ZERO);
    }

    #[test]
    fn distance_and_center() {
        let tracks = pair((1, 0.0, 0.0), (2, 30.0, 40.0));
        assert_eq!(tracks.distance(), Some(50.0));
        assert_eq!(tracks.center(), Some(Point::new(15.0, 20.0)));
    }

    #[test]
    fn single_contact_has_no_distance() {
        let mut tracks = ContactTracks::new();
        tracks.begin_primary(ContactId(1), Point::ZERO);
        assert_eq!(tracks.distance(), None);
        assert_eq!(tracks.center(), None);
    }

    #[test]
    fn promote_reports_swap_offset() {
        let mut tracks = pair((1, 10.0, 10.0), (2, 40.0, 50.0));
        let offset = tracks.promote_secondary().unwrap();
        assert_eq!(offset, Vec2::new(30.0, 40.0));
        assert_eq!(tracks.len(), 1);
        let primary = tracks.primary().unwrap();
        assert_eq!(primary.id, ContactId(2));
        assert_eq!(primary.reference, primary.position);
        assert!(tracks.secondary().is_none());
    }

    #[test]
    fn end_secondary_keeps_primary() {
        let mut tracks = pair((1, 0.0, 0.0), (2, 5.0, 5.0));
        let ended = tracks.end_secondary().unwrap();
        assert_eq!(ended.id, ContactId(2));
        assert_eq!(tracks.primary().map(|t| t.id), Some(ContactId(1)));
        assert!(tracks.end_secondary().is_none());
        assert!(tracks.promote_secondary().is_none());
    }
}
