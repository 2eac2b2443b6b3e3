use crate::bounding_volume::stp::{SphereTorusPatches, StpMargins, StpRadii};
use crate::math::{Point, Real, UnitVector, Vector};
use crate::shape::Cuboid;
use na::Unit;

/// A cuboid rounded by sphere-torus patches.
///
/// The support function is evaluated in the positive octant of the cuboid, where only one
/// vertex, three edges and three faces can be reached, and mirrored back afterward.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StpCuboid {
    cuboid: Cuboid,
    radii: StpRadii,
    // Distance between the center of each face and the center of its patch sphere.
    face_offsets: [Real; 3],
}

impl StpCuboid {
    /// Rounds `cuboid` with the given margins.
    pub fn new(cuboid: Cuboid, margins: StpMargins) -> Self {
        let h = cuboid.half_extents;
        let face_radii = [0, 1, 2].map(|i| {
            let (j, k) = ((i + 1) % 3, (i + 2) % 3);
            (h[j] * h[j] + h[k] * h[k]).sqrt()
        });
        let largest = face_radii.iter().copied().fold(0.0, Real::max);
        let radii = StpRadii::new(margins, 2.0 * largest);

        Self {
            cuboid,
            radii,
            face_offsets: face_radii.map(|rho| radii.sphere_offset(rho)),
        }
    }

    /// The rounded cuboid.
    #[inline]
    pub fn cuboid(&self) -> &Cuboid {
        &self.cuboid
    }

    /// The radii of the patches.
    #[inline]
    pub fn radii(&self) -> &StpRadii {
        &self.radii
    }
}

/// A direction brought into the positive octant.
pub(crate) struct Octant {
    dir: Vector<Real>,
    signs: Vector<Real>,
}

impl Octant {
    fn mirror(&self, pt: Vector<Real>) -> Point<Real> {
        pt.component_mul(&self.signs).into()
    }
}

impl SphereTorusPatches for StpCuboid {
    type Anchor = Octant;

    fn anchor(&self, dir: &UnitVector<Real>) -> Octant {
        Octant {
            dir: dir.abs(),
            signs: dir.map(|e| if e < 0.0 { -1.0 } else { 1.0 }),
        }
    }

    fn face_support(&self, octant: &Octant, _: &UnitVector<Real>) -> Option<Point<Real>> {
        let d = &octant.dir;
        let h = &self.cuboid.half_extents;
        let mut axes = [0, 1, 2];
        axes.sort_by(|a, b| d[*b].total_cmp(&d[*a]));

        for i in axes {
            let (j, k) = ((i + 1) % 3, (i + 2) % 3);
            let offset = self.face_offsets[i];

            // The ray from the sphere center must cross the face rectangle.
            if d[i] > 0.0 && offset * d[j] <= h[j] * d[i] && offset * d[k] <= h[k] * d[i] {
                let mut center = Vector::zeros();
                center[i] = h[i] - offset;
                return Some(octant.mirror(center + d * self.radii.large_radius()));
            }
        }

        None
    }

    fn edge_support(&self, octant: &Octant, _: &UnitVector<Real>) -> Option<Point<Real>> {
        let d = &octant.dir;
        let h = &self.cuboid.half_extents;

        for k in 0..3 {
            // The edge parallel to the axis `k`, at the corner of the faces `i` and `j`.
            let (i, j) = ((k + 1) % 3, (k + 2) % 3);
            let (off_i, off_j) = (self.face_offsets[i], self.face_offsets[j]);

            if off_i * d[j] > h[j] * d[i]
                && off_j * d[i] > h[i] * d[j]
                && d[k] * self.radii.reach() <= h[k]
            {
                let mut radial = *d;
                radial[k] = 0.0;
                let radial = Unit::try_new(radial, 0.0)?;

                let mut midpoint = *h;
                midpoint[k] = 0.0;

                let pt = midpoint - radial.into_inner() * self.radii.sphere_offset(h[k])
                    + d * self.radii.large_radius();
                return Some(octant.mirror(pt));
            }
        }

        None
    }

    fn vertex_support(&self, octant: &Octant, _: &UnitVector<Real>) -> Point<Real> {
        octant.mirror(self.cuboid.half_extents + octant.dir * self.radii.min_margin())
    }
}
