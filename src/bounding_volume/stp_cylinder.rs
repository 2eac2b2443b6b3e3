use crate::bounding_volume::stp::{
    inner_torus_support, sphere_support, SphereTorusPatches, StpMargins, StpRadii,
};
use crate::math::{Point, Real, UnitVector, Vector};
use crate::shape::Cylinder;

/// A cylinder rounded by sphere-torus patches.
///
/// Each cap is rounded by a large sphere, the lateral surface by a spindle torus swept
/// around the cylinder axis, and both rims by a torus of tube radius `r`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StpCylinder {
    cylinder: Cylinder,
    radii: StpRadii,
    cap_offset: Real,
    side_ring_radius: Real,
}

impl StpCylinder {
    /// Rounds `cylinder` with the given margins.
    pub fn new(cylinder: Cylinder, margins: StpMargins) -> Self {
        let feature_length = 2.0 * cylinder.radius.max(cylinder.half_height);
        let radii = StpRadii::new(margins, feature_length);

        Self {
            cylinder,
            radii,
            cap_offset: radii.sphere_offset(cylinder.radius),
            side_ring_radius: radii.sphere_offset(cylinder.half_height),
        }
    }

    /// The rounded cylinder.
    #[inline]
    pub fn cylinder(&self) -> &Cylinder {
        &self.cylinder
    }

    /// The radii of the patches.
    #[inline]
    pub fn radii(&self) -> &StpRadii {
        &self.radii
    }
}

pub(crate) struct CylinderAnchor {
    // The sign of the cap facing the direction.
    cap: Real,
    radial: Option<UnitVector<Real>>,
    radial_len: Real,
}

impl SphereTorusPatches for StpCylinder {
    type Anchor = CylinderAnchor;

    fn anchor(&self, dir: &UnitVector<Real>) -> CylinderAnchor {
        CylinderAnchor {
            cap: if dir.y < 0.0 { -1.0 } else { 1.0 },
            radial: Cylinder::radial_direction(dir),
            radial_len: dir.x.hypot(dir.z),
        }
    }

    fn face_support(
        &self,
        anchor: &CylinderAnchor,
        dir: &UnitVector<Real>,
    ) -> Option<Point<Real>> {
        // The ray from the sphere center must cross the cap disk.
        if self.cap_offset * anchor.radial_len > self.cylinder.radius * dir.y.abs() {
            return None;
        }

        let center = Point::new(
            0.0,
            anchor.cap * (self.cylinder.half_height - self.cap_offset),
            0.0,
        );
        Some(sphere_support(&center, self.radii.large_radius(), dir))
    }

    fn edge_support(
        &self,
        anchor: &CylinderAnchor,
        dir: &UnitVector<Real>,
    ) -> Option<Point<Real>> {
        let radial = anchor.radial?;

        if dir.y.abs() * self.radii.reach() > self.cylinder.half_height {
            return None;
        }

        let center = Point::from(radial.into_inner() * self.cylinder.radius);
        Some(inner_torus_support(
            &center,
            &Vector::y_axis(),
            self.side_ring_radius,
            self.radii.large_radius(),
            dir,
        ))
    }

    fn vertex_support(&self, anchor: &CylinderAnchor, dir: &UnitVector<Real>) -> Point<Real> {
        let rim = anchor
            .radial
            .map(|u| u.into_inner() * self.cylinder.radius)
            .unwrap_or_else(Vector::zeros);
        let rim = Point::new(rim.x, anchor.cap * self.cylinder.half_height, rim.z);

        sphere_support(&rim, self.radii.min_margin(), dir)
    }
}
