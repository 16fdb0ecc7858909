// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap recognition window.
//!
//! A [`ClickWindow`] decides whether a just-completed press/release pair was a
//! tap rather than a drag. It combines two independent checks:
//!
//! - **Temporal**: the window is *armed* on press and disarms once
//!   `timeout` milliseconds pass without a release.
//! - **Spatial**: at release, the pointer must lie strictly within
//!   `click_zone` pixels of the press origin on *both* axes.
//!
//! Keeping the two apart means a press that drags away and comes back to its
//! origin after the timeout is still rejected, while a quick press/release on
//! the same spot always succeeds.
//!
//! ## Usage
//!
//! ```
//! use understory_gesture::click::ClickWindow;
//! use kurbo::Point;
//!
//! let mut window = ClickWindow::new(300);
//!
//! // Press at t=1000.
//! window.arm(Point::new(100.0, 100.0), 1000);
//!
//! // Release 2px away, 120ms later: a click.
//! assert!(window.check_and_consume(Point::new(102.0, 101.0), 5.0, 1120));
//!
//! // The window is single-shot.
//! assert!(!window.check_and_consume(Point::new(102.0, 101.0), 5.0, 1130));
//! ```
//!
//! ## Timers
//!
//! Expiry is driven two ways, whichever comes first:
//!
//! - Every check passes the current timestamp, and a deadline in the past disarms
//!   the window.
//! - [`arm`](ClickWindow::arm) returns a [`ClickTimer`] that a host may schedule
//!   with its own fire-once callback facility and hand back to
//!   [`expire`](ClickWindow::expire). Timers carry a generation, so a timer that
//!   was superseded by a newer `arm` or by [`cancel`](ClickWindow::cancel) is
//!   ignored when it fires late.
//!
//! ```
//! # use understory_gesture::click::ClickWindow;
//! # use kurbo::Point;
//! let mut window = ClickWindow::new(300);
//! let stale = window.arm(Point::new(0.0, 0.0), 0);
//! let fresh = window.arm(Point::new(10.0, 10.0), 50);
//!
//! // The first timer was superseded; firing it changes nothing.
//! assert!(!window.expire(stale));
//! assert!(window.is_armed());
//!
//! assert!(window.expire(fresh));
//! assert!(!window.is_armed());
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

/// Handle for a scheduled click-window expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClickTimer {
    /// Arming generation this timer belongs to.
    pub generation: u64,
    /// Timestamp (milliseconds) at which the window closes.
    pub deadline: u64,
}

/// Single-slot tap window shared by all contacts of a recognizer.
///
/// Only one window exists at a time; arming it again replaces the previous
/// origin and invalidates the previous timer.
#[derive(Clone, Debug)]
pub struct ClickWindow {
    /// Window length in milliseconds.
    timeout: u64,
    /// True from `arm` until expiry or consumption.
    armed: bool,
    /// Close time of the current window.
    deadline: u64,
    /// Press position the release is measured against.
    origin: Option<Point>,
    /// Bumped on every arm/cancel so late timers can be told apart.
    generation: u64,
}

impl ClickWindow {
    /// Create a disarmed window with the given timeout in milliseconds.
    pub fn new(timeout: u64) -> Self {
        Self {
            timeout,
            armed: false,
            deadline: 0,
            origin: None,
            generation: 0,
        }
    }

    /// Start a fresh window at `origin`, cancelling any pending one.
    ///
    /// # Arguments
    /// * `origin` - Surface-local press position
    /// * `now` - Press timestamp in milliseconds
    ///
    /// # Returns
    /// The timer for the new window. Hosts with a scheduler may fire it through
    /// [`expire`](Self::expire); hosts without one can ignore it.
    pub fn arm(&mut self, origin: Point, now: u64) -> ClickTimer {
        self.generation = self.generation.wrapping_add(1);
        self.armed = true;
        self.deadline = now.saturating_add(self.timeout);
        self.origin = Some(origin);
        log::trace!("click window armed at {origin:?} until {}", self.deadline);
        self.timer()
    }

    /// Timer-fired expiry.
    ///
    /// Returns `true` if `timer` belonged to the live window and disarmed it,
    /// `false` for superseded, cancelled, or already expired timers. The origin is
    /// kept.
    pub fn expire(&mut self, timer: ClickTimer) -> bool {
        if !self.armed || timer.generation != self.generation {
            return false;
        }
        self.armed = false;
        true
    }

    /// Clock-driven expiry: disarm if `now` has reached the deadline.
    pub fn tick(&mut self, now: u64) {
        if self.armed && now >= self.deadline {
            log::trace!("click window expired at {now}");
            self.armed = false;
        }
    }

    /// Decide whether a release at `current` completes a tap, and close the window.
    ///
    /// A tap requires the window to still be armed at `now` and the release to lie
    /// strictly within `click_zone` of the origin on both axes. The pending timer is
    /// cancelled regardless of the result.
    pub fn check_and_consume(&mut self, current: Point, click_zone: f64, now: u64) -> bool {
        self.tick(now);
        let inside = self.origin.is_some_and(|origin| {
            let d = current - origin;
            d.x.abs() < click_zone && d.y.abs() < click_zone
        });
        let clicked = self.armed && inside;
        self.cancel();
        self.origin = None;
        clicked
    }

    /// Disarm and invalidate the pending timer without touching the origin.
    pub fn cancel(&mut self) {
        self.armed = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Disarm and forget everything.
    pub fn clear(&mut self) {
        self.cancel();
        self.origin = None;
    }

    /// Translate the origin, keeping the armed state and timer.
    ///
    /// Used when a remaining contact takes over from a lifted one.
    pub fn rebase(&mut self, offset: Vec2) {
        if let Some(origin) = self.origin.as_mut() {
            *origin += offset;
        }
    }

    /// True while a release could still produce a tap (ignoring position).
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// The press origin of the current or most recently expired window.
    pub fn origin(&self) -> Option<Point> {
        self.origin
    }

    /// The live timer, if the window is armed.
    pub fn pending(&self) -> Option<ClickTimer> {
        self.armed.then(|| self.timer())
    }

    fn timer(&self) -> ClickTimer {
        ClickTimer {
            generation: self.generation,
            deadline: self.deadline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_release_in_place_is_a_click() {
        let mut window = ClickWindow::new(300);
        window.arm(Point::new(10.0, 20.0), 1000);
        assert!(window.check_and_consume(Point::new(10.0, 20.0), 5.0, 1050));
    }

    #[test]
    fn release_at_zone_edge_is_not_a_click() {
        let mut window = ClickWindow::new(300);
        window.arm(Point::new(10.0, 20.0), 1000);
        // 5px on x equals the zone; the comparison is strict.
        assert!(!window.check_and_consume(Point::new(15.0, 20.0), 5.0, 1050));
    }

    #[test]
    fn either_axis_outside_zone_rejects() {
        let mut window = ClickWindow::new(300);
        window.arm(Point::new(0.0, 0.0), 0);
        assert!(!window.check_and_consume(Point::new(1.0, -7.0), 5.0, 10));

        window.arm(Point::new(0.0, 0.0), 100);
        assert!(window.check_and_consume(Point::new(-4.0, 4.0), 5.0, 110));
    }

    #[test]
    fn release_after_timeout_is_not_a_click() {
        let mut window = ClickWindow::new(300);
        window.arm(Point::new(10.0, 20.0), 1000);
        assert!(!window.check_and_consume(Point::new(10.0, 20.0), 5.0, 1300));
    }

    #[test]
    fn release_just_before_deadline_is_a_click() {
        let mut window = ClickWindow::new(300);
        window.arm(Point::new(10.0, 20.0), 1000);
        assert!(window.check_and_consume(Point::new(10.0, 20.0), 5.0, 1299));
    }

    #[test]
    fn consume_always_cancels() {
        let mut window = ClickWindow::new(300);
        let timer = window.arm(Point::new(0.0, 0.0), 0);
        assert!(!window.check_and_consume(Point::new(50.0, 0.0), 5.0, 10));
        assert!(!window.is_armed());
        assert!(window.pending().is_none());
        // The timer fired after consumption is a no-op.
        assert!(!window.expire(timer));
    }

    #[test]
    fn expiry_keeps_origin() {
        let mut window = ClickWindow::new(300);
        let timer = window.arm(Point::new(3.0, 4.0), 0);
        assert!(window.expire(timer));
        assert_eq!(window.origin(), Some(Point::new(3.0, 4.0)));
        // Expired window rejects even an in-place release.
        assert!(!window.check_and_consume(Point::new(3.0, 4.0), 5.0, 10));
        assert_eq!(window.origin(), None);
    }

    #[test]
    fn tick_disarms_at_deadline() {
        let mut window = ClickWindow::new(100);
        window.arm(Point::ZERO, 500);
        window.tick(599);
        assert!(window.is_armed());
        window.tick(600);
        assert!(!window.is_armed());
    }

    #[test]
    fn rearm_supersedes_previous_timer() {
        let mut window = ClickWindow::new(300);
        let first = window.arm(Point::ZERO, 0);
        let second = window.arm(Point::new(1.0, 1.0), 200);
        assert_ne!(first, second);
        assert_eq!(window.pending(), Some(second));
        assert_eq!(second.deadline, 500);
        assert!(!window.expire(first));
        assert!(window.is_armed());
    }

    #[test]
    fn cancel_invalidates_timer() {
        let mut window = ClickWindow::new(300);
        let timer = window.arm(Point::ZERO, 0);
        window.cancel();
        assert!(!window.expire(timer));
        assert!(!window.is_armed());
    }

    #[test]
    fn rebase_translates_origin() {
        let mut window = ClickWindow::new(300);
        window.arm(Point::new(10.0, 10.0), 0);
        window.rebase(Vec2::new(30.0, -5.0));
        assert_eq!(window.origin(), Some(Point::new(40.0, 5.0)));
        assert!(window.is_armed());
        assert!(window.check_and_consume(Point::new(41.0, 6.0), 5.0, 100));
    }

    #[test]
    fn check_without_arm_is_not_a_click() {
        let mut window = ClickWindow::new(300);
        assert!(!window.check_and_consume(Point::ZERO, 5.0, 0));
    }
}
