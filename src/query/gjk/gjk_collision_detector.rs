use crate::math::{Isometry, Real, Vector};
use crate::query::gjk::{self, GJKResult, GjkOptions, GjkSimplex, GjkWorkspace};
use crate::query::{CollisionDetector, CollisionResult};
use crate::shape::Shape;

/// Intersection test and distance computation between two shapes with GJK.
///
/// Penetrating shapes are reported as colliding, without any penetration depth: their
/// distance, points and normals are NaN. Use
/// [`ExpandingPolytopeAlgorithm`](crate::query::epa::ExpandingPolytopeAlgorithm) when the
/// depth is needed.
#[derive(Clone, Debug, Default)]
pub struct GjkCollisionDetector {
    /// The tuning parameters of the algorithm.
    pub options: GjkOptions,
    workspace: GjkWorkspace,
    initial_direction: Option<Vector<Real>>,
}

impl GjkCollisionDetector {
    /// Creates a detector with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detector with the given options.
    pub fn with_options(options: GjkOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The simplex of the last query, in the local frame of its first shape.
    pub fn simplex(&self) -> &GjkSimplex {
        self.workspace.simplex()
    }

    /// The last search direction of the last query, in the local frame of its first shape.
    pub fn support_direction(&self) -> &Vector<Real> {
        self.workspace.support_direction()
    }

    /// The state left by the last query.
    pub fn workspace(&self) -> &GjkWorkspace {
        &self.workspace
    }

    /// Runs GJK and fills `result`.
    ///
    /// Returns `None` if one of the shapes is empty, and whether the shapes intersect
    /// otherwise. On intersection, only the `colliding` flag and the shape types of
    /// `result` are meaningful.
    pub(crate) fn run(
        &mut self,
        pos_a: &Isometry<Real>,
        shape_a: &dyn Shape,
        pos_b: &Isometry<Real>,
        shape_b: &dyn Shape,
        result: &mut CollisionResult,
    ) -> Option<bool> {
        result.shape_a = Some(shape_a.shape_type());
        result.shape_b = Some(shape_b.shape_type());
        result.frame = None;

        if shape_a.is_empty() || shape_b.is_empty() {
            self.workspace.simplex.clear();
            self.workspace.iterations = 0;
            self.initial_direction = None;
            result.set_to_empty_sentinel();
            return None;
        }

        let pos12 = pos_a.inv_mul(pos_b);

        if let Some(dir) = self.initial_direction.take() {
            self.workspace
                .set_initial_direction(pos_a.inverse_transform_vector(&dir));
        }

        // Guess the first direction from the relative placement of the shapes.
        let mut default_dir = pos12 * shape_b.local_centroid() - shape_a.local_centroid();
        if default_dir.norm_squared() <= crate::math::DEFAULT_EPSILON {
            default_dir = Vector::x();
        }

        match gjk::closest_points(
            &pos12,
            shape_a.as_support_map(),
            shape_b.as_support_map(),
            &default_dir,
            &self.options,
            &mut self.workspace,
        ) {
            GJKResult::Intersection => {
                result.set_to_nan();
                result.colliding = true;
                Some(true)
            }
            GJKResult::ClosestPoints(p1, p2, normal) => {
                result.set_separated(pos_a * p1, pos_a * p2, &(pos_a * normal.into_inner()));
                Some(false)
            }
        }
    }
}

impl CollisionDetector for GjkCollisionDetector {
    fn evaluate_collision_into(
        &mut self,
        pos_a: &Isometry<Real>,
        shape_a: &dyn Shape,
        pos_b: &Isometry<Real>,
        shape_b: &dyn Shape,
        result: &mut CollisionResult,
    ) -> bool {
        self.run(pos_a, shape_a, pos_b, shape_b, result)
            .unwrap_or(false)
    }

    fn set_initial_support_direction(&mut self, dir: Vector<Real>) {
        self.initial_direction = Some(dir);
    }

    fn number_of_iterations(&self) -> usize {
        self.workspace.number_of_iterations()
    }
}
