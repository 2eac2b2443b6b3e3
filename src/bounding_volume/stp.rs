//! Geometry shared by the sphere-torus-patch bounding volumes.
//!
//! A sphere-torus-patch (STP) bounding volume replaces every feature of a sharp convex
//! shape by a smooth patch:
//! * each face by a cap of a large sphere of radius `R` centered below the face,
//! * each edge by a piece of an inner (spindle) torus of tube radius `R`,
//! * each vertex by a small sphere of radius `r`.
//!
//! The patches are sized so that they join where adjacent features meet, which gives a
//! rounded surface lying between `r` and the max margin `g` away from the wrapped shape.

use crate::bounding_volume::{StpCapsule, StpConvexPolytope, StpCuboid, StpCylinder, StpRamp};
use crate::math::{Point, Real, UnitVector, Vector, DEFAULT_EPSILON};
use crate::shape::{unit_or_x, SupportMap};
use na::Unit;

/// The margins requested for an STP bounding volume.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StpMargins {
    /// The smallest distance between the rounded surface and the wrapped shape, reached at
    /// its vertices. Must be positive.
    pub min_margin: Real,
    /// The largest distance between the rounded surface and the wrapped shape, reached at the
    /// center of its largest face. Must be greater than `min_margin`.
    pub max_margin: Real,
}

impl Default for StpMargins {
    fn default() -> Self {
        Self {
            min_margin: 1.0e-3,
            max_margin: 1.0e-2,
        }
    }
}

impl StpMargins {
    /// Margins ranging from `min_margin` to `max_margin`.
    pub fn new(min_margin: Real, max_margin: Real) -> Self {
        Self {
            min_margin,
            max_margin,
        }
    }
}

/// The radii of the patches of an STP bounding volume.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StpRadii {
    min_margin: Real,
    max_margin: Real,
    large_radius: Real,
}

impl StpRadii {
    /// Solves the large radius `R` of the patches rounding a shape whose largest feature
    /// (face diameter, or edge length for curved shapes) is `feature_length`.
    ///
    /// The face spheres must bulge by at most `max_margin` above a feature of that size, which
    /// is only possible if `max_margin - min_margin < feature_length / 2`. Otherwise the max
    /// margin is clamped to `min_margin + 0.99 * feature_length / 2` and a warning is logged.
    ///
    /// # Panics
    /// If `min_margin` isn't positive or `max_margin` isn't greater than `min_margin`.
    pub fn new(margins: StpMargins, feature_length: Real) -> Self {
        let r = margins.min_margin;
        let mut g = margins.max_margin;

        assert!(r > 0.0, "The minimum STP margin must be positive.");
        assert!(g > r, "The maximum STP margin must exceed the minimum margin.");

        let half_length = feature_length / 2.0;

        let large_radius = if half_length <= DEFAULT_EPSILON {
            g
        } else {
            if g - r >= half_length {
                let clamped = r + 0.99 * half_length;
                log::warn!(
                    "STP max margin {} is too large for a feature of length {}, clamped to {}.",
                    g,
                    feature_length,
                    clamped
                );
                g = clamped;
            }

            (r * r - g * g - half_length * half_length) / (2.0 * (r - g))
        };

        Self {
            min_margin: r,
            max_margin: g,
            large_radius,
        }
    }

    /// The radius `r` of the vertex spheres.
    #[inline]
    pub fn min_margin(&self) -> Real {
        self.min_margin
    }

    /// The max margin actually achieved, after clamping.
    #[inline]
    pub fn max_margin(&self) -> Real {
        self.max_margin
    }

    /// The radius `R` of the face spheres and of the tube of the edge tori.
    #[inline]
    pub fn large_radius(&self) -> Real {
        self.large_radius
    }

    /// `R - r`: the distance between the center of a large sphere and the centers of the
    /// vertex spheres it is tangent to.
    #[inline]
    pub(crate) fn reach(&self) -> Real {
        self.large_radius - self.min_margin
    }

    /// The distance from the center of a feature to the center of the large sphere rounding
    /// it, for a feature whose vertices are at most `enclosing_radius` away from its center.
    #[inline]
    pub(crate) fn sphere_offset(&self, enclosing_radius: Real) -> Real {
        let reach = self.reach();
        (reach * reach - enclosing_radius * enclosing_radius)
            .max(0.0)
            .sqrt()
    }
}

/// The three-tier decomposition of an STP bounding volume.
///
/// The support point along a direction is searched on the face patches first, then on the
/// edge patches, then on the vertex spheres which always apply.
pub(crate) trait SphereTorusPatches {
    /// Per-direction data shared by the three tiers.
    type Anchor;

    fn anchor(&self, dir: &UnitVector<Real>) -> Self::Anchor;

    fn face_support(&self, anchor: &Self::Anchor, dir: &UnitVector<Real>) -> Option<Point<Real>>;

    fn edge_support(&self, anchor: &Self::Anchor, dir: &UnitVector<Real>) -> Option<Point<Real>>;

    fn vertex_support(&self, anchor: &Self::Anchor, dir: &UnitVector<Real>) -> Point<Real>;
}

pub(crate) fn patch_support<P: SphereTorusPatches>(
    patches: &P,
    dir: &UnitVector<Real>,
) -> Point<Real> {
    let anchor = patches.anchor(dir);
    patches
        .face_support(&anchor, dir)
        .or_else(|| patches.edge_support(&anchor, dir))
        .unwrap_or_else(|| patches.vertex_support(&anchor, dir))
}

macro_rules! impl_stp_support_map(
    ($($t: ty),*) => {$(
        impl SupportMap for $t {
            #[inline]
            fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
                patch_support(self, &unit_or_x(dir))
            }

            #[inline]
            fn local_support_point_toward(&self, dir: &Unit<Vector<Real>>) -> Point<Real> {
                patch_support(self, dir)
            }
        }
    )*}
);

impl_stp_support_map!(StpCuboid, StpCapsule, StpCylinder, StpRamp, StpConvexPolytope);

#[inline]
pub(crate) fn sphere_support(
    center: &Point<Real>,
    radius: Real,
    dir: &UnitVector<Real>,
) -> Point<Real> {
    center + dir.into_inner() * radius
}

/// Support point of the inner torus whose ring of tube centers is the circle of radius
/// `ring_radius` around `axis` through `center`.
///
/// The tube center used is the one opposite to `dir`, which makes the torus a spindle.
pub(crate) fn inner_torus_support(
    center: &Point<Real>,
    axis: &UnitVector<Real>,
    ring_radius: Real,
    tube_radius: Real,
    dir: &UnitVector<Real>,
) -> Point<Real> {
    let radial = dir.into_inner() - axis.into_inner() * dir.dot(&**axis);
    let radial = Unit::try_new(radial, DEFAULT_EPSILON)
        .map(|u| u.into_inner())
        .unwrap_or_else(Vector::zeros);

    center - radial * ring_radius + dir.into_inner() * tube_radius
}

/// Support point of the patch rounding the edge `[a, b]`, if `dir` points toward it.
///
/// The tube circles of the torus pass through the vertex spheres at `a` and `b`. Returns
/// `None` if the support point would fall beyond them, i.e., on a vertex sphere.
pub(crate) fn edge_patch_support(
    a: &Point<Real>,
    b: &Point<Real>,
    radii: &StpRadii,
    dir: &UnitVector<Real>,
) -> Option<Point<Real>> {
    let (axis, length) = Unit::try_new_and_get(b - a, DEFAULT_EPSILON)?;
    let half_length = length / 2.0;

    if dir.dot(&*axis).abs() * radii.reach() > half_length {
        return None;
    }

    Some(inner_torus_support(
        &na::center(a, b),
        &axis,
        radii.sphere_offset(half_length),
        radii.large_radius(),
        dir,
    ))
}

/// Is `dir`, cast from `sphere_center`, on the inner side of the edge `a -> b` of a face
/// wound counter-clockwise around its outward normal?
#[inline]
pub(crate) fn wedge_contains(
    sphere_center: &Point<Real>,
    a: &Point<Real>,
    b: &Point<Real>,
    dir: &Vector<Real>,
) -> bool {
    dir.dot(&(a - sphere_center).cross(&(b - sphere_center))) >= 0.0
}

/// The large sphere rounding a planar face.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct FacePatch {
    pub normal: UnitVector<Real>,
    pub sphere_center: Point<Real>,
}

impl FacePatch {
    /// The patch of a cocircular face whose first three vertices are `a`, `b` and `c`,
    /// counter-clockwise around its outward normal.
    ///
    /// The sphere center is `R - r` away from every vertex of the face, so the patch meets
    /// the vertex spheres exactly. Returns `None` if the three points are collinear.
    pub fn through(
        a: &Point<Real>,
        b: &Point<Real>,
        c: &Point<Real>,
        radii: &StpRadii,
    ) -> Option<Self> {
        let normal = Unit::try_new((b - a).cross(&(c - a)), DEFAULT_EPSILON)?;
        let (center, radius) = circumcircle(a, b, c)?;

        Some(Self {
            normal,
            sphere_center: center - normal.into_inner() * radii.sphere_offset(radius),
        })
    }

    /// The support point of this patch, if the ray cast from the sphere center along `dir`
    /// crosses the face bounded by `edges`.
    pub fn support<'a>(
        &self,
        mut edges: impl Iterator<Item = (&'a Point<Real>, &'a Point<Real>)>,
        radii: &StpRadii,
        dir: &UnitVector<Real>,
    ) -> Option<Point<Real>> {
        if self.normal.dot(&**dir) <= 0.0 {
            return None;
        }

        if edges.all(|(a, b)| wedge_contains(&self.sphere_center, a, b, dir)) {
            Some(sphere_support(&self.sphere_center, radii.large_radius(), dir))
        } else {
            None
        }
    }
}

/// The center and radius of the circle through `a`, `b` and `c`.
///
/// Returns `None` if the points are collinear.
pub(crate) fn circumcircle(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
) -> Option<(Point<Real>, Real)> {
    let ab = b - a;
    let ac = c - a;
    let n = ab.cross(&ac);
    let n2 = n.norm_squared();

    if n2 <= DEFAULT_EPSILON * DEFAULT_EPSILON * ab.norm_squared() * ac.norm_squared() {
        return None;
    }

    let offset = (n.cross(&ab) * ac.norm_squared() + ac.cross(&n) * ab.norm_squared()) / (2.0 * n2);
    Some((a + offset, offset.norm()))
}

/// The largest distance between `center` and the given points.
pub(crate) fn enclosing_radius<'a>(
    center: &Point<Real>,
    pts: impl IntoIterator<Item = &'a Point<Real>>,
) -> Real {
    pts.into_iter()
        .map(|pt| na::distance(center, pt))
        .fold(0.0, Real::max)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn large_radius_bulges_by_max_margin() {
        let radii = StpRadii::new(StpMargins::new(0.1, 0.2), 2.0);
        assert_relative_eq!(radii.large_radius(), 5.15, epsilon = 1.0e-12);
        assert_relative_eq!(radii.max_margin(), 0.2);
        // A face of enclosing radius 1 is covered with a bulge of exactly the max margin.
        assert_relative_eq!(
            radii.large_radius() - radii.sphere_offset(1.0),
            0.2,
            epsilon = 1.0e-12
        );
    }

    #[test]
    fn infeasible_max_margin_is_clamped() {
        let radii = StpRadii::new(StpMargins::new(0.1, 2.0), 2.0);
        assert_relative_eq!(radii.max_margin(), 1.09, epsilon = 1.0e-12);
        assert!(radii.large_radius() > radii.max_margin());
        assert_relative_eq!(
            radii.large_radius() - radii.sphere_offset(1.0),
            1.09,
            epsilon = 1.0e-9
        );
    }

    #[test]
    fn point_like_feature() {
        let radii = StpRadii::new(StpMargins::new(0.1, 0.2), 0.0);
        assert_eq!(radii.large_radius(), 0.2);
    }

    #[test]
    #[should_panic]
    fn non_positive_min_margin() {
        let _ = StpRadii::new(StpMargins::new(0.0, 0.2), 1.0);
    }

    #[test]
    #[should_panic]
    fn max_margin_below_min_margin() {
        let _ = StpRadii::new(StpMargins::new(0.2, 0.1), 1.0);
    }

    #[test]
    fn edge_patch_meets_vertex_spheres() {
        let radii = StpRadii::new(StpMargins::new(0.1, 0.3), 2.0);
        let a = Point::new(-1.0, 0.0, 0.0);
        let b = Point::new(1.0, 0.0, 0.0);

        // Perpendicular to the edge: the torus bulges above its midpoint.
        let up = Vector::y_axis();
        let mid = edge_patch_support(&a, &b, &radii, &up).unwrap();
        assert_relative_eq!(mid.x, 0.0);
        assert!(mid.y > radii.min_margin() && mid.y <= radii.max_margin() + 1.0e-12);

        // Near the limit angle, the torus touches the vertex sphere of `b`.
        let sin = (1.0 - 1.0e-9) / radii.reach();
        let limit = Unit::new_normalize(Vector::new(sin, (1.0 - sin * sin).sqrt(), 0.0));
        let on_torus = edge_patch_support(&a, &b, &radii, &limit).unwrap();
        let on_sphere = sphere_support(&b, radii.min_margin(), &limit);
        assert_relative_eq!(on_torus, on_sphere, epsilon = 1.0e-6);

        let beyond = Unit::new_normalize(Vector::new(1.0, 0.1, 0.0));
        assert!(edge_patch_support(&a, &b, &radii, &beyond).is_none());
    }

    #[test]
    fn face_patch_validity() {
        let square = [
            Point::new(-1.0, -1.0, 0.0),
            Point::new(1.0, -1.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(-1.0, 1.0, 0.0),
        ];
        let rho = enclosing_radius(&Point::origin(), &square);
        let radii = StpRadii::new(StpMargins::new(0.01, 0.1), 2.0 * rho);
        let patch = FacePatch::through(&square[0], &square[1], &square[2], &radii).unwrap();
        let edges = || (0..4).map(|i| (&square[i], &square[(i + 1) % 4]));

        assert_relative_eq!(*patch.normal, Vector::z(), epsilon = 1.0e-12);
        let top = patch.support(edges(), &radii, &Vector::z_axis()).unwrap();
        assert_relative_eq!(top.z, radii.max_margin(), epsilon = 1.0e-9);

        let grazing = Unit::new_normalize(Vector::new(1.0, 0.0, 0.05));
        assert!(patch.support(edges(), &radii, &grazing).is_none());
    }

    #[test]
    fn face_spheres_pass_through_every_vertex() {
        // A right triangle: its circumcenter is the middle of the hypotenuse, not its centroid.
        let tri = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(2.0, 0.0, 0.0),
            Point::new(2.0, 1.0, 0.0),
        ];
        let (center, radius) = circumcircle(&tri[0], &tri[1], &tri[2]).unwrap();
        assert_relative_eq!(center, Point::new(1.0, 0.5, 0.0), epsilon = 1.0e-12);
        assert_relative_eq!(radius, 1.25f64.sqrt(), epsilon = 1.0e-12);

        let radii = StpRadii::new(StpMargins::new(0.01, 0.1), 2.0 * radius);
        let patch = FacePatch::through(&tri[0], &tri[1], &tri[2], &radii).unwrap();
        for pt in &tri {
            assert_relative_eq!(
                na::distance(&patch.sphere_center, pt),
                radii.reach(),
                epsilon = 1.0e-9
            );
        }

        let collinear = Point::new(4.0, 0.0, 0.0);
        assert!(circumcircle(&tri[0], &tri[1], &collinear).is_none());
    }
}
