//! Traits for support mapping based shapes.

use crate::math::{Isometry, Point, Real, Vector, DEFAULT_EPSILON};
use na::Unit;

/// Traits of convex shapes representable by a support mapping function.
///
/// A support function associates a direction to the point of the shape which maximizes
/// their dot product. This is the only geometric query GJK and EPA ever perform on a shape.
pub trait SupportMap {
    /// Evaluates the support function of this shape in its local frame.
    ///
    /// `dir` does not need to be normalized, but may be zero: implementations must then
    /// return some point of the shape rather than NaN.
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real>;

    /// Same as `self.local_support_point` except that `dir` is normalized.
    fn local_support_point_toward(&self, dir: &Unit<Vector<Real>>) -> Point<Real> {
        self.local_support_point(dir.as_ref())
    }

    /// Evaluates the support function of this shape transformed by `transform`.
    fn support_point(&self, transform: &Isometry<Real>, dir: &Vector<Real>) -> Point<Real> {
        let local_dir = transform.inverse_transform_vector(dir);
        transform * self.local_support_point(&local_dir)
    }

    /// Same as `self.support_point` except that `dir` is normalized.
    fn support_point_toward(
        &self,
        transform: &Isometry<Real>,
        dir: &Unit<Vector<Real>>,
    ) -> Point<Real> {
        let local_dir = Unit::new_unchecked(transform.inverse_transform_vector(dir));
        transform * self.local_support_point_toward(&local_dir)
    }
}

impl<S: SupportMap + ?Sized> SupportMap for &S {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        (**self).local_support_point(dir)
    }

    #[inline]
    fn local_support_point_toward(&self, dir: &Unit<Vector<Real>>) -> Point<Real> {
        (**self).local_support_point_toward(dir)
    }
}

/// Normalizes a support direction, falling back to the `x` axis for (near-)zero vectors.
#[inline]
pub(crate) fn unit_or_x(dir: &Vector<Real>) -> Unit<Vector<Real>> {
    Unit::try_new(*dir, DEFAULT_EPSILON).unwrap_or_else(Vector::x_axis)
}
