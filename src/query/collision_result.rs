use crate::frame::FrameId;
use crate::math::{Isometry, Point, Real, Vector};
use crate::shape::ShapeType;
use core::mem;

/// The outcome of a collision query between two shapes `a` and `b`.
///
/// A result is meant to be created once and overwritten in place by every query.
///
/// When the shapes are disjoint, `signed_distance` is their positive distance and
/// `point_on_a`/`point_on_b` are the closest points. When they are intersecting,
/// `signed_distance` is minus the penetration depth and translating `b` by
/// `-signed_distance * normal_on_a` makes them touch.
///
/// `normal_on_a` always points from `a` toward `b`, and `normal_on_b` is its opposite.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct CollisionResult {
    /// Are the two shapes intersecting?
    pub colliding: bool,
    /// The separation distance, negative when the shapes are penetrating.
    pub signed_distance: Real,
    /// The witness point on the first shape.
    pub point_on_a: Point<Real>,
    /// The contact normal on the first shape, pointing toward the second.
    pub normal_on_a: Vector<Real>,
    /// The witness point on the second shape.
    pub point_on_b: Point<Real>,
    /// The contact normal on the second shape, pointing toward the first.
    pub normal_on_b: Vector<Real>,
    /// The type of the first shape of the query.
    pub shape_a: Option<ShapeType>,
    /// The type of the second shape of the query.
    pub shape_b: Option<ShapeType>,
    /// The frame the points and normals are expressed in, for frame-aware queries.
    pub frame: Option<FrameId>,
}

impl Default for CollisionResult {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionResult {
    /// A result with every point and normal set to NaN and no shape.
    pub fn new() -> Self {
        let mut result = CollisionResult {
            colliding: false,
            signed_distance: Real::NAN,
            point_on_a: Point::origin(),
            normal_on_a: Vector::zeros(),
            point_on_b: Point::origin(),
            normal_on_b: Vector::zeros(),
            shape_a: None,
            shape_b: None,
            frame: None,
        };
        result.set_to_nan();
        result
    }

    /// Sets the distance, points and normals to NaN.
    pub fn set_to_nan(&mut self) {
        self.signed_distance = Real::NAN;
        self.point_on_a.coords.fill(Real::NAN);
        self.point_on_b.coords.fill(Real::NAN);
        self.normal_on_a.fill(Real::NAN);
        self.normal_on_b.fill(Real::NAN);
    }

    /// The result of a query where at least one shape has no geometry: not colliding and
    /// without any valid distance.
    pub fn set_to_empty_sentinel(&mut self) {
        self.colliding = false;
        self.set_to_nan();
    }

    /// The distance between the shapes, zero if they are colliding.
    pub fn distance(&self) -> Real {
        if self.colliding {
            0.0
        } else {
            self.signed_distance
        }
    }

    /// The penetration depth, zero if the shapes are disjoint.
    pub fn depth(&self) -> Real {
        if self.colliding {
            -self.signed_distance
        } else {
            0.0
        }
    }

    /// Exchanges the roles of the two shapes.
    pub fn swap_shapes(&mut self) {
        mem::swap(&mut self.point_on_a, &mut self.point_on_b);
        mem::swap(&mut self.normal_on_a, &mut self.normal_on_b);
        mem::swap(&mut self.shape_a, &mut self.shape_b);
    }

    /// Applies `m` to the points and normals of this result.
    pub fn transform_by(&mut self, m: &Isometry<Real>) {
        self.point_on_a = m * self.point_on_a;
        self.point_on_b = m * self.point_on_b;
        self.normal_on_a = m * self.normal_on_a;
        self.normal_on_b = m * self.normal_on_b;
    }

    /// Does any point, normal or the distance contain a NaN?
    pub fn contains_nan(&self) -> bool {
        self.signed_distance.is_nan()
            || self.point_on_a.iter().any(|e| e.is_nan())
            || self.point_on_b.iter().any(|e| e.is_nan())
            || self.normal_on_a.iter().any(|e| e.is_nan())
            || self.normal_on_b.iter().any(|e| e.is_nan())
    }

    /// Compares two results up to the given tolerances, regardless of the order in which
    /// their shapes were given.
    ///
    /// Points and normals are compared component-wise. Two NaN distances are equal.
    pub fn geometrically_equals(
        &self,
        other: &CollisionResult,
        distance_epsilon: Real,
        point_epsilon: Real,
        normal_epsilon: Real,
    ) -> bool {
        let same_distance = (self.signed_distance.is_nan() && other.signed_distance.is_nan())
            || abs_diff_eq!(
                self.signed_distance,
                other.signed_distance,
                epsilon = distance_epsilon
            );

        if self.colliding != other.colliding || !same_distance {
            return false;
        }

        let same_order = abs_diff_eq!(self.point_on_a, other.point_on_a, epsilon = point_epsilon)
            && abs_diff_eq!(self.point_on_b, other.point_on_b, epsilon = point_epsilon)
            && abs_diff_eq!(self.normal_on_a, other.normal_on_a, epsilon = normal_epsilon)
            && abs_diff_eq!(self.normal_on_b, other.normal_on_b, epsilon = normal_epsilon);

        same_order
            || abs_diff_eq!(self.point_on_a, other.point_on_b, epsilon = point_epsilon)
                && abs_diff_eq!(self.point_on_b, other.point_on_a, epsilon = point_epsilon)
                && abs_diff_eq!(self.normal_on_a, other.normal_on_b, epsilon = normal_epsilon)
                && abs_diff_eq!(self.normal_on_b, other.normal_on_a, epsilon = normal_epsilon)
    }

    /// Fills this result for two disjoint or touching shapes, from their witness points.
    ///
    /// `fallback_normal` is used when the points coincide.
    pub(crate) fn set_separated(
        &mut self,
        point_on_a: Point<Real>,
        point_on_b: Point<Real>,
        fallback_normal: &Vector<Real>,
    ) {
        let diff = point_on_b - point_on_a;
        let distance = diff.norm();

        self.colliding = false;
        self.signed_distance = distance;
        self.point_on_a = point_on_a;
        self.point_on_b = point_on_b;
        self.normal_on_a = if distance > 0.0 {
            diff / distance
        } else {
            *fallback_normal
        };
        self.normal_on_b = -self.normal_on_a;
    }

    /// Fills this result for two penetrating shapes.
    ///
    /// `normal` is the unit direction along which `b` must move to separate the shapes.
    pub(crate) fn set_penetrating(
        &mut self,
        point_on_a: Point<Real>,
        point_on_b: Point<Real>,
        normal: &Vector<Real>,
        depth: Real,
    ) {
        self.colliding = true;
        self.signed_distance = -depth;
        self.point_on_a = point_on_a;
        self.point_on_b = point_on_b;
        self.normal_on_a = *normal;
        self.normal_on_b = -*normal;
    }
}
