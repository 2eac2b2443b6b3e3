//! Support mapping based Ramp shape.

use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;
use crate::utils;

/// A ramp, i.e., a right-angle wedge.
///
/// In its local frame the ramp covers `x ∈ [0, size.x]`, `y ∈ [-size.y / 2, size.y / 2]` and
/// `z ∈ [0, size.z]`. Its sloped face rises from the bottom edge at `x = 0` up to the top
/// edge at `x = size.x`, `z = size.z`.
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Ramp {
    /// The length, width and height of the ramp.
    pub size: Vector<Real>,
}

impl Ramp {
    /// Creates a new ramp from its length (`x`), width (`y`) and height (`z`).
    pub fn new(size: Vector<Real>) -> Self {
        assert!(
            size.iter().all(|s| *s >= 0.0),
            "The ramp dimensions must be positive."
        );
        Self { size }
    }

    /// The six corners of this ramp.
    ///
    /// The first three are on the `-y` side, ordered as bottom-front, bottom-back, top-back;
    /// the last three are their `+y` counterparts.
    pub fn vertices(&self) -> [Point<Real>; 6] {
        let hy = self.size.y / 2.0;
        let (sx, sz) = (self.size.x, self.size.z);
        [
            Point::new(0.0, -hy, 0.0),
            Point::new(sx, -hy, 0.0),
            Point::new(sx, -hy, sz),
            Point::new(0.0, hy, 0.0),
            Point::new(sx, hy, 0.0),
            Point::new(sx, hy, sz),
        ]
    }

    /// The length of the sloped face, measured along its steepest line.
    pub fn ramp_length(&self) -> Real {
        self.size.x.hypot(self.size.z)
    }

    /// The angle between the sloped face and the bottom face.
    pub fn ramp_incline(&self) -> Real {
        self.size.z.atan2(self.size.x)
    }

    /// The outward unit normal of the sloped face.
    pub fn ramp_surface_normal(&self) -> Vector<Real> {
        let len = self.ramp_length();
        if len == 0.0 {
            Vector::z()
        } else {
            Vector::new(-self.size.z / len, 0.0, self.size.x / len)
        }
    }

    /// The centroid of this ramp.
    pub fn centroid(&self) -> Point<Real> {
        Point::new(2.0 * self.size.x / 3.0, 0.0, self.size.z / 3.0)
    }
}

impl SupportMap for Ramp {
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        utils::point_cloud_support_point(dir, &self.vertices())
    }
}
