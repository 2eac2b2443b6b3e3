//! Support mapping based Cylinder shape.

use crate::math::{Point, Real, UnitVector, Vector, DEFAULT_EPSILON};
use crate::shape::SupportMap;
use na::Unit;

/// Cylinder shape with its principal axis aligned with the `y` axis.
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Cylinder {
    /// The half height of the cylinder.
    pub half_height: Real,
    /// The radius of the cylinder.
    pub radius: Real,
}

impl Cylinder {
    /// Creates a new cylinder.
    ///
    /// # Arguments:
    /// * `half_height` - the half length of the cylinder along the `y` axis.
    /// * `radius` - the length of the cylinder along all other axis.
    pub fn new(half_height: Real, radius: Real) -> Cylinder {
        assert!(half_height.is_sign_positive() && radius.is_sign_positive());

        Cylinder {
            half_height,
            radius,
        }
    }

    /// The normalized projection of `dir` on the `xz` plane, if it isn't parallel to the axis.
    #[inline]
    pub fn radial_direction(dir: &Vector<Real>) -> Option<UnitVector<Real>> {
        Unit::try_new(Vector::new(dir.x, 0.0, dir.z), DEFAULT_EPSILON)
    }
}

impl SupportMap for Cylinder {
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let radial = Self::radial_direction(dir)
            .map(|u| *u * self.radius)
            .unwrap_or_else(Vector::zeros);

        Point::new(radial.x, self.half_height.copysign(dir.y), radial.z)
    }
}
