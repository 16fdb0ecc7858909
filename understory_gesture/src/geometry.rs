// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Absolute → surface-local coordinate mapping.
//!
//! Hosts report pointer positions in an absolute (page or window) space. Gesture
//! deltas, click zones and pinch centers are all computed in the space of the
//! surface that receives input, so every raw coordinate passes through a
//! [`CoordinateMapper`] first.
//!
//! The offset to subtract depends on where the surface sits in the host layout:
//!
//! - A surface placed directly under the document root is positioned by its own
//!   offset ([`LayoutOrigin::Root`]).
//! - A surface nested in a positioned container is positioned by that container
//!   ([`LayoutOrigin::Container`]).
//!
//! Mapped coordinates are rounded half-up to whole pixels.
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_gesture::geometry::{CoordinateMapper, LayoutOrigin};
//!
//! let mapper = CoordinateMapper::new(LayoutOrigin::Root {
//!     surface_offset: Vec2::new(5.0, 10.0),
//! });
//! assert_eq!(mapper.map(Point::new(105.4, 110.5)), Point::new(100.0, 101.0));
//!
//! // Without a resolvable origin, input is treated as already local.
//! let fallback = CoordinateMapper::unresolved();
//! assert_eq!(fallback.map(Point::new(3.6, 4.2)), Point::new(4.0, 4.0));
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

/// Where a surface's local coordinate space starts, relative to absolute input coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutOrigin {
    /// The surface is a direct child of the document root and is placed by its own offset.
    Root {
        /// Offset of the surface's top-left corner in absolute coordinates.
        surface_offset: Vec2,
    },
    /// The surface lives inside a positioned container whose top-left is the local origin.
    Container {
        /// Offset of the container's top-left corner in absolute coordinates.
        container_offset: Vec2,
    },
}

impl LayoutOrigin {
    /// The absolute offset of the local origin.
    pub fn offset(&self) -> Vec2 {
        match *self {
            Self::Root { surface_offset } => surface_offset,
            Self::Container { container_offset } => container_offset,
        }
    }
}

/// Converts absolute input coordinates into integer-rounded surface-local ones.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoordinateMapper {
    origin: Option<LayoutOrigin>,
}

impl CoordinateMapper {
    /// Create a mapper for a surface with a known layout origin.
    pub fn new(origin: LayoutOrigin) -> Self {
        Self {
            origin: Some(origin),
        }
    }

    /// Create a mapper for a surface whose layout origin could not be resolved.
    ///
    /// Coordinates are only rounded, not translated.
    pub fn unresolved() -> Self {
        Self { origin: None }
    }

    /// Create a mapper from whatever the host could resolve.
    pub fn from_origin(origin: Option<LayoutOrigin>) -> Self {
        Self { origin }
    }

    /// The layout origin in use, if any.
    pub fn origin(&self) -> Option<LayoutOrigin> {
        self.origin
    }

    /// The absolute offset that [`map`](Self::map) subtracts.
    pub fn offset(&self) -> Vec2 {
        self.origin.map_or(Vec2::ZERO, |origin| origin.offset())
    }

    /// Map an absolute coordinate into the surface's local space.
    pub fn map(&self, absolute: Point) -> Point {
        let local = absolute - self.offset();
        Point::new(round_half_up(local.x), round_half_up(local.y))
    }
}

/// Half-up rounding, so `-0.5` goes to `0` and `0.5` goes to `1`.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_origin_subtracts_surface_offset() {
        let mapper = CoordinateMapper::new(LayoutOrigin::Root {
            surface_offset: Vec2::new(8.0, 16.0),
        });
        assert_eq!(mapper.map(Point::new(108.0, 116.0)), Point::new(100.0, 100.0));
    }

    #[test]
    fn container_origin_subtracts_container_offset() {
        let mapper = CoordinateMapper::new(LayoutOrigin::Container {
            container_offset: Vec2::new(200.0, 50.0),
        });
        assert_eq!(mapper.map(Point::new(210.0, 75.0)), Point::new(10.0, 25.0));
        assert_eq!(mapper.offset(), Vec2::new(200.0, 50.0));
    }

    #[test]
    fn rounds_half_up_on_both_axes() {
        let mapper = CoordinateMapper::unresolved();
        assert_eq!(mapper.map(Point::new(1.5, 2.49)), Point::new(2.0, 2.0));
        assert_eq!(mapper.map(Point::new(-0.5, -1.51)), Point::new(0.0, -2.0));
    }

    #[test]
    fn unresolved_origin_is_identity_up_to_rounding() {
        let mapper = CoordinateMapper::from_origin(None);
        assert_eq!(mapper.origin(), None);
        assert_eq!(mapper.offset(), Vec2::ZERO);
        assert_eq!(mapper.map(Point::new(42.0, 7.0)), Point::new(42.0, 7.0));
    }

    #[test]
    fn mapping_can_go_negative_outside_the_surface() {
        let mapper = CoordinateMapper::new(LayoutOrigin::Root {
            surface_offset: Vec2::new(50.0, 50.0),
        });
        assert_eq!(mapper.map(Point::new(10.0, 60.0)), Point::new(-40.0, 10.0));
    }
}
