//! Support mapping based Cuboid shape.

use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;
use crate::utils::WSign;

/// Shape of a box, centered at the origin of its local frame.
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Cuboid {
    /// The half-extents of the cuboid.
    pub half_extents: Vector<Real>,
}

impl Cuboid {
    /// Creates a new box from its half-extents. Half-extents are the box half-width along
    /// each axis. Each half-extent must be positive.
    #[inline]
    pub fn new(half_extents: Vector<Real>) -> Cuboid {
        assert!(
            half_extents.iter().all(|e| *e >= 0.0),
            "Cuboid half-extents must be positive."
        );
        Cuboid { half_extents }
    }

    /// The eight corners of this cuboid.
    ///
    /// Corner `i` has a negative `x` (resp. `y`, `z`) coordinate iff bit 0 (resp. 1, 2) of
    /// `i` is set.
    pub fn vertices(&self) -> [Point<Real>; 8] {
        let mut res = [Point::origin(); 8];
        for (i, pt) in res.iter_mut().enumerate() {
            let mut v = self.half_extents;
            for k in 0..3 {
                if i & (1 << k) != 0 {
                    v[k] = -v[k];
                }
            }
            *pt = Point::from(v);
        }
        res
    }
}

impl SupportMap for Cuboid {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        dir.copy_sign_to(self.half_extents).into()
    }
}
