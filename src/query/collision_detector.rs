use crate::math::{Isometry, Real, Vector};
use crate::query::CollisionResult;
use crate::shape::Shape;

/// A detector answering collision queries between two posed shapes.
///
/// Detectors keep their scratch state between queries, so a single instance must not be
/// used by concurrent queries.
pub trait CollisionDetector {
    /// Computes the collision between `shape_a` placed at `pos_a` and `shape_b` placed at
    /// `pos_b`, overwriting `result`.
    ///
    /// Points and normals are expressed in the frame `pos_a` and `pos_b` are relative to.
    /// Returns `result.colliding`.
    fn evaluate_collision_into(
        &mut self,
        pos_a: &Isometry<Real>,
        shape_a: &dyn Shape,
        pos_b: &Isometry<Real>,
        shape_b: &dyn Shape,
        result: &mut CollisionResult,
    ) -> bool;

    /// Computes the collision between two shapes into a new result.
    fn evaluate_collision(
        &mut self,
        pos_a: &Isometry<Real>,
        shape_a: &dyn Shape,
        pos_b: &Isometry<Real>,
        shape_b: &dyn Shape,
    ) -> CollisionResult {
        let mut result = CollisionResult::new();
        let _ = self.evaluate_collision_into(pos_a, shape_a, pos_b, shape_b, &mut result);
        result
    }

    /// Sets the first search direction of the next query only.
    ///
    /// The direction points from the first shape toward the second and is expressed in the
    /// same frame as the query positions.
    fn set_initial_support_direction(&mut self, dir: Vector<Real>);

    /// The number of iterations performed by the last query.
    fn number_of_iterations(&self) -> usize;
}
