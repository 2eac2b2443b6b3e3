//! The Gilbert-Johnson-Keerthi distance algorithm.

use na::Unit;

use crate::math::{Isometry, Point, Real, Vector};
use crate::query::gjk::{CSOPoint, GjkSimplex};
use crate::shape::SupportMap;

/// Results of the GJK algorithm.
///
/// Points and normals are expressed in the local-space of the first shape.
#[derive(Clone, Debug, PartialEq)]
pub enum GJKResult {
    /// The origin is inside of the Minkowski difference: the shapes are intersecting.
    Intersection,
    /// The closest points on each shape, and the unit direction from the first to the
    /// second.
    ClosestPoints(Point<Real>, Point<Real>, Unit<Vector<Real>>),
}

/// Tuning parameters of the GJK algorithm.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GjkOptions {
    /// The maximum number of iterations before the current estimate is returned.
    pub max_iterations: usize,
    /// The relative tolerance of the convergence test, and of the test deciding that the
    /// origin lies on the simplex.
    pub terminal_epsilon: Real,
    /// Below this distance from a triangle simplex, its normal replaces the direction to
    /// the closest point as the next search direction.
    pub triangle_normal_switch_epsilon: Real,
    /// Stop as soon as a separating axis is found, without refining the distance.
    pub exit_on_separating_axis: bool,
}

impl Default for GjkOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            terminal_epsilon: 1.0e-12,
            triangle_normal_switch_epsilon: 1.0e-6,
            exit_on_separating_axis: false,
        }
    }
}

/// The state of a GJK query, reused from one query to the next.
///
/// A workspace must not be shared by concurrent queries.
#[derive(Clone, Debug, Default)]
pub struct GjkWorkspace {
    pub(crate) simplex: GjkSimplex,
    pub(crate) support_direction: Vector<Real>,
    pub(crate) iterations: usize,
    pub(crate) separated: bool,
    initial_direction: Option<Vector<Real>>,
}

impl GjkWorkspace {
    /// Creates an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// The simplex left by the last query.
    pub fn simplex(&self) -> &GjkSimplex {
        &self.simplex
    }

    /// The last search direction used by the last query.
    pub fn support_direction(&self) -> &Vector<Real> {
        &self.support_direction
    }

    /// The number of iterations performed by the last query.
    pub fn number_of_iterations(&self) -> usize {
        self.iterations
    }

    /// Did the last query find a direction proving the shapes are disjoint?
    pub fn found_separating_axis(&self) -> bool {
        self.separated
    }

    /// Sets the direction used by the next query only, instead of its default guess.
    ///
    /// The direction is expressed in the local frame of the first shape.
    pub fn set_initial_direction(&mut self, dir: Vector<Real>) {
        self.initial_direction = Some(dir);
    }

    /// Takes the pending initial direction, if any.
    pub fn take_initial_direction(&mut self) -> Option<Vector<Real>> {
        self.initial_direction.take()
    }
}

/// Computes the closest points between two support-mapped shapes.
///
/// `pos12` is the position of `g2` relative to `g1`; the results are expressed in the
/// local frame of `g1`. The first search direction is the pending initial direction of
/// `workspace` if any, and `default_dir` otherwise.
///
/// Reaching `options.max_iterations` is not an error: the current estimate is returned.
pub fn closest_points<G1, G2>(
    pos12: &Isometry<Real>,
    g1: &G1,
    g2: &G2,
    default_dir: &Vector<Real>,
    options: &GjkOptions,
    workspace: &mut GjkWorkspace,
) -> GJKResult
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    let eps = options.terminal_epsilon;
    let initial_dir = workspace
        .take_initial_direction()
        .filter(|d| d.norm_squared() > 0.0 && d.iter().all(|e| e.is_finite()))
        .unwrap_or(*default_dir);

    workspace.iterations = 0;
    workspace.separated = false;
    workspace.support_direction = initial_dir;
    workspace
        .simplex
        .reset(CSOPoint::from_shapes(pos12, g1, g2, &initial_dir));

    let mut proj = workspace.simplex.proj_point();
    let mut prev_dir: Option<Vector<Real>> = None;

    loop {
        if origin_on_simplex(&proj, &workspace.simplex, eps) {
            return GJKResult::Intersection;
        }

        if workspace.iterations >= options.max_iterations {
            log::debug!(
                "GJK stopped after {} iterations without converging.",
                workspace.iterations
            );
            return closest_points_result(workspace, &proj);
        }

        workspace.iterations += 1;

        let dir = match workspace.simplex.triangle_normal_toward_origin() {
            Some(n) if proj.coords.norm() < options.triangle_normal_switch_epsilon => {
                n.into_inner()
            }
            _ => -proj.coords,
        };

        if let Some(prev_dir) = prev_dir {
            // The search direction no longer changes: the shapes are touching.
            if (dir - prev_dir).norm_squared() <= eps * dir.norm_squared()
                && workspace.simplex.len() > 1
            {
                return closest_points_result(workspace, &proj);
            }
        }

        prev_dir = Some(dir);
        workspace.support_direction = dir;

        let cso_point = CSOPoint::from_shapes(pos12, g1, g2, &dir);
        let w = cso_point.point.coords;

        if w.dot(&dir) < 0.0 {
            workspace.separated = true;

            if options.exit_on_separating_axis {
                return closest_points_result(workspace, &proj);
            }
        }

        let v2 = proj.coords.norm_squared();
        if v2 + w.dot(&dir) <= eps * v2
            || workspace
                .simplex
                .contains_point(&cso_point.point, eps.sqrt() * v2.sqrt())
            || !workspace.simplex.add_point(cso_point)
        {
            return closest_points_result(workspace, &proj);
        }

        proj = workspace.simplex.project_origin_and_reduce();

        if workspace.simplex.len() == 4 {
            return GJKResult::Intersection;
        }
    }
}

fn origin_on_simplex(proj: &Point<Real>, simplex: &GjkSimplex, eps: Real) -> bool {
    proj.coords.norm_squared() <= eps * simplex.max_sq_len()
}

fn closest_points_result(workspace: &GjkWorkspace, proj: &Point<Real>) -> GJKResult {
    let (p1, p2) = workspace.simplex.witness_points();
    let normal = Unit::try_new(-proj.coords, 0.0)
        .or_else(|| Unit::try_new(workspace.support_direction, 0.0))
        .unwrap_or_else(Vector::x_axis);

    GJKResult::ClosestPoints(p1, p2, normal)
}
