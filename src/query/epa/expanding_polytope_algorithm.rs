use crate::math::{Isometry, Real, Vector};
use crate::query::epa::{self, EpaOptions, EpaWorkspace};
use crate::query::gjk::GjkCollisionDetector;
use crate::query::{CollisionDetector, CollisionResult};
use crate::shape::{ConvexPolytope, FaceId, Shape};

/// Collision detection with penetration depth: GJK followed by EPA.
///
/// Disjoint shapes are reported exactly as by [`GjkCollisionDetector`]. For intersecting
/// shapes, EPA expands the final GJK simplex into a polytope approximating the Minkowski
/// difference of the shapes until the face closest to the origin gives the penetration.
#[derive(Clone, Debug, Default)]
pub struct ExpandingPolytopeAlgorithm {
    /// The tuning parameters of the expansion.
    pub options: EpaOptions,
    gjk: GjkCollisionDetector,
    workspace: EpaWorkspace,
}

impl ExpandingPolytopeAlgorithm {
    /// Creates a detector with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detector with the given expansion options, and the given GJK detector.
    pub fn with_gjk(gjk: GjkCollisionDetector, options: EpaOptions) -> Self {
        Self {
            options,
            gjk,
            workspace: EpaWorkspace::new(),
        }
    }

    /// The GJK detector run before each expansion.
    pub fn gjk(&self) -> &GjkCollisionDetector {
        &self.gjk
    }

    /// The GJK detector run before each expansion.
    pub fn gjk_mut(&mut self) -> &mut GjkCollisionDetector {
        &mut self.gjk
    }

    /// The polytope expanded by the last query, in the local frame of its first shape.
    pub fn polytope(&self) -> &ConvexPolytope {
        self.workspace.polytope()
    }

    /// The face of [`Self::polytope`] giving the penetration of the last query.
    pub fn closest_face(&self) -> Option<FaceId> {
        self.workspace.closest_face()
    }
}

impl CollisionDetector for ExpandingPolytopeAlgorithm {
    fn evaluate_collision_into(
        &mut self,
        pos_a: &Isometry<Real>,
        shape_a: &dyn Shape,
        pos_b: &Isometry<Real>,
        shape_b: &dyn Shape,
        result: &mut CollisionResult,
    ) -> bool {
        self.workspace.clear();

        match self.gjk.run(pos_a, shape_a, pos_b, shape_b, result) {
            Some(true) => {}
            _ => return false,
        }

        let pos12 = pos_a.inv_mul(pos_b);

        match epa::closest_points(
            &pos12,
            shape_a.as_support_map(),
            shape_b.as_support_map(),
            self.gjk.simplex(),
            &self.options,
            &mut self.workspace,
        ) {
            Some(pen) => {
                result.set_penetrating(
                    pos_a * pen.point1,
                    pos_a * pen.point2,
                    &(pos_a * pen.normal.into_inner()),
                    pen.depth,
                );
                true
            }
            None => {
                // Touching contact: the shapes share boundary points only.
                let (p1, p2) = self.gjk.simplex().witness_points();
                let fallback = pos_a * *self.gjk.support_direction();
                let fallback = fallback
                    .try_normalize(0.0)
                    .unwrap_or_else(Vector::x);
                result.set_separated(pos_a * p1, pos_a * p2, &fallback);
                result.signed_distance = 0.0;
                false
            }
        }
    }

    fn set_initial_support_direction(&mut self, dir: Vector<Real>) {
        self.gjk.set_initial_support_direction(dir);
    }

    fn number_of_iterations(&self) -> usize {
        self.gjk.number_of_iterations() + self.workspace.number_of_iterations()
    }
}
