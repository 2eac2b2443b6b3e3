//! Support mapping based Capsule shape.

use crate::math::{Point, Real, Vector};
use crate::shape::support_map::unit_or_x;
use crate::shape::{Segment, SupportMap};
use na::Unit;

/// A capsule: the set of points within `radius` of a segment.
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Capsule {
    /// The axis and endpoint-centers of the capsule.
    pub segment: Segment,
    /// The radius of the capsule.
    pub radius: Real,
}

impl Capsule {
    /// Creates a new capsule aligned with the `y` axis and with the given half-height and radius.
    pub fn new_y(half_height: Real, radius: Real) -> Self {
        let b = Point::new(0.0, half_height, 0.0);
        Self::new(-b, b, radius)
    }

    /// Creates a new capsule defined as the segment between `a` and `b` and with the given `radius`.
    pub fn new(a: Point<Real>, b: Point<Real>, radius: Real) -> Self {
        assert!(radius >= 0.0, "A capsule radius must be positive.");
        let segment = Segment::new(a, b);
        Self { segment, radius }
    }

    /// The height of this capsule, i.e., the length of its segment.
    pub fn height(&self) -> Real {
        self.segment.length()
    }

    /// The half-height of this capsule.
    pub fn half_height(&self) -> Real {
        self.height() / 2.0
    }

    /// The center of this capsule.
    pub fn center(&self) -> Point<Real> {
        self.segment.center()
    }
}

impl SupportMap for Capsule {
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        self.local_support_point_toward(&unit_or_x(dir))
    }

    fn local_support_point_toward(&self, dir: &Unit<Vector<Real>>) -> Point<Real> {
        self.segment.local_support_point(dir) + **dir * self.radius
    }
}
