//! Support mapping based Ellipsoid shape.

use crate::math::{Point, Real, Vector, DEFAULT_EPSILON};
use crate::shape::SupportMap;

/// An axis-aligned ellipsoid centered at the origin of its local frame.
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Ellipsoid {
    /// The radii of the ellipsoid along each local axis.
    pub radii: Vector<Real>,
}

impl Ellipsoid {
    /// Creates a new ellipsoid from its three radii.
    pub fn new(radii: Vector<Real>) -> Self {
        assert!(
            radii.iter().all(|r| *r >= 0.0),
            "Ellipsoid radii must be positive."
        );
        Self { radii }
    }
}

impl SupportMap for Ellipsoid {
    // The ellipsoid is the image of the unit sphere by `D = diag(radii)`, so its support
    // point along `dir` is `D² dir / |D dir|`.
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let scaled = self.radii.component_mul(dir);
        let norm = scaled.norm();

        if norm <= DEFAULT_EPSILON {
            return Point::new(self.radii.x, 0.0, 0.0);
        }

        Point::from(self.radii.component_mul(&scaled) / norm)
    }
}
