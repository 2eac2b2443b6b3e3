use crate::bounding_volume::stp::{edge_patch_support, SphereTorusPatches, StpMargins, StpRadii};
use crate::math::{Point, Real, UnitVector};
use crate::shape::Capsule;

/// A capsule rounded by sphere-torus patches.
///
/// The capsule is seen as its segment dilated by its radius: the segment is rounded by a
/// single spindle torus capped by two vertex spheres, and the result is dilated by the
/// capsule radius. This keeps the rounded surface strictly convex along the cylindrical
/// part of the capsule.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StpCapsule {
    capsule: Capsule,
    radii: StpRadii,
}

impl StpCapsule {
    /// Rounds `capsule` with the given margins.
    pub fn new(capsule: Capsule, margins: StpMargins) -> Self {
        let radii = StpRadii::new(margins, capsule.height());
        Self { capsule, radii }
    }

    /// The rounded capsule.
    #[inline]
    pub fn capsule(&self) -> &Capsule {
        &self.capsule
    }

    /// The radii of the patches.
    #[inline]
    pub fn radii(&self) -> &StpRadii {
        &self.radii
    }
}

impl SphereTorusPatches for StpCapsule {
    type Anchor = ();

    fn anchor(&self, _: &UnitVector<Real>) {}

    fn face_support(&self, _: &(), _: &UnitVector<Real>) -> Option<Point<Real>> {
        None
    }

    fn edge_support(&self, _: &(), dir: &UnitVector<Real>) -> Option<Point<Real>> {
        let segment = &self.capsule.segment;
        edge_patch_support(&segment.a, &segment.b, &self.radii, dir)
            .map(|pt| pt + dir.into_inner() * self.capsule.radius)
    }

    fn vertex_support(&self, _: &(), dir: &UnitVector<Real>) -> Point<Real> {
        let segment = &self.capsule.segment;
        let endpoint = if dir.dot(&(segment.b - segment.a)) > 0.0 {
            segment.b
        } else {
            segment.a
        };

        endpoint + dir.into_inner() * (self.radii.min_margin() + self.capsule.radius)
    }
}
