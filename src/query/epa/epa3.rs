//! Penetration depth computation with the Expanding Polytope Algorithm.

use crate::math::{Isometry, Point, Real, UnitVector, Vector};
use crate::query::gjk::{CSOPoint, GjkSimplex};
use crate::shape::{ConvexPolytope, FaceId, SupportMap, VertexId};
use crate::utils::WBasis;
use na::{RealField, Unit};

/// Tuning parameters of the EPA algorithm.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EpaOptions {
    /// The maximum number of expansions before the current estimate is returned.
    pub max_iterations: usize,
    /// The expansion stops once a new support point improves the distance of the closest
    /// face by less than this. Also used as the construction epsilon of the polytope.
    pub terminal_epsilon: Real,
}

impl Default for EpaOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            terminal_epsilon: 1.0e-10,
        }
    }
}

/// The penetration of two shapes computed by EPA.
///
/// Expressed in the local frame of the first shape.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Penetration {
    /// The deepest point of the first shape inside of the second.
    pub point1: Point<Real>,
    /// The deepest point of the second shape inside of the first.
    pub point2: Point<Real>,
    /// The direction along which the second shape must move to separate the shapes.
    pub normal: UnitVector<Real>,
    /// The distance the second shape must move along `normal` to separate the shapes.
    pub depth: Real,
}

/// The state of an EPA query, reused from one query to the next.
#[derive(Clone, Debug, Default)]
pub struct EpaWorkspace {
    polytope: ConvexPolytope,
    cso_points: Vec<Option<CSOPoint>>,
    closest_face: Option<FaceId>,
    iterations: usize,
}

impl EpaWorkspace {
    /// Creates an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// The expanded polytope of the last query, approximating the Minkowski difference of
    /// the shapes.
    pub fn polytope(&self) -> &ConvexPolytope {
        &self.polytope
    }

    /// The face of [`Self::polytope`] closest to the origin at the end of the last query.
    pub fn closest_face(&self) -> Option<FaceId> {
        self.closest_face
    }

    /// The number of expansions performed by the last query.
    pub fn number_of_iterations(&self) -> usize {
        self.iterations
    }

    /// The CSO point a vertex of [`Self::polytope`] was built from.
    pub fn cso_point(&self, vertex: VertexId) -> Option<&CSOPoint> {
        self.cso_points.get(vertex.index())?.as_ref()
    }

    /// Forgets the state of the last query, keeping the allocated memory.
    pub fn clear(&mut self) {
        self.polytope.clear();
        self.cso_points.clear();
        self.closest_face = None;
        self.iterations = 0;
    }

    fn reset(&mut self, epsilon: Real) {
        self.clear();
        self.polytope.set_construction_epsilon(epsilon);
    }

    fn insert(&mut self, pt: CSOPoint) -> Option<VertexId> {
        let id = self.polytope.add_vertex(pt.point)?;

        if self.cso_points.len() <= id.index() {
            self.cso_points.resize(id.index() + 1, None);
        }

        self.cso_points[id.index()] = Some(pt);
        Some(id)
    }

    fn is_solid(&self) -> bool {
        self.polytope.num_faces() > 2 && self.polytope.volume() > 0.0
    }
}

/// Computes the penetration of two intersecting shapes from the simplex GJK stopped with.
///
/// `pos12` is the position of `g2` relative to `g1`. Returns `None` if no polytope with a
/// non-zero volume enclosing the origin can be built, which means the shapes are only
/// touching.
pub fn closest_points<G1, G2>(
    pos12: &Isometry<Real>,
    g1: &G1,
    g2: &G2,
    simplex: &GjkSimplex,
    options: &EpaOptions,
    workspace: &mut EpaWorkspace,
) -> Option<Penetration>
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    workspace.reset(options.terminal_epsilon);

    for pt in simplex.points() {
        let _ = workspace.insert(*pt);
    }

    pad_to_solid(pos12, g1, g2, simplex, workspace);

    if !workspace.is_solid() {
        log::debug!("EPA could not build a polytope with a non-zero volume.");
        return None;
    }

    if !workspace
        .polytope
        .is_point_inside(&Point::origin(), options.terminal_epsilon)
    {
        return None;
    }

    let (mut face, mut dist) = closest_face(&workspace.polytope)?;

    loop {
        if workspace.iterations >= options.max_iterations {
            log::debug!(
                "EPA stopped after {} iterations without converging.",
                workspace.iterations
            );
            break;
        }

        let normal = *workspace.polytope.face(face)?.normal();
        let cso_point = CSOPoint::from_shapes_toward(pos12, g1, g2, &normal);

        if cso_point.point.coords.dot(&normal) - dist <= options.terminal_epsilon {
            break;
        }

        if workspace.insert(cso_point).is_none() {
            // The new point lies within the construction epsilon of the polytope.
            log::debug!(
                "EPA stopped after {} iterations: the support point along the closest face \
                 normal doesn't extend the polytope.",
                workspace.iterations
            );
            break;
        }

        workspace.iterations += 1;
        (face, dist) = closest_face(&workspace.polytope)?;
    }

    workspace.closest_face = Some(face);
    let f = workspace.polytope.face(face)?;
    let normal = *f.normal();
    let (point1, point2) = witness_points(workspace, face, &(normal.into_inner() * dist))?;

    Some(Penetration {
        point1,
        point2,
        normal,
        depth: dist,
    })
}

// The face whose supporting plane is the closest to the origin, with that distance.
//
// Since the origin is inside of the polytope, the projection of the origin on that plane
// lies inside of the face.
fn closest_face(polytope: &ConvexPolytope) -> Option<(FaceId, Real)> {
    polytope
        .faces()
        .map(|(id, f)| (id, -f.signed_distance(&Point::origin())))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

fn pad_to_solid<G1, G2>(
    pos12: &Isometry<Real>,
    g1: &G1,
    g2: &G2,
    simplex: &GjkSimplex,
    workspace: &mut EpaWorkspace,
) where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    let push = |workspace: &mut EpaWorkspace, dir: Vector<Real>| {
        let _ = workspace.insert(CSOPoint::from_shapes(pos12, g1, g2, &dir));
    };

    let pts = simplex.points();
    match pts.len() {
        2 => {
            if let Some(axis) = Unit::try_new(pts[1] - pts[0], 0.0) {
                let [u, v] = axis.into_inner().orthonormal_basis();
                for k in [0.0, 1.0, 2.0] {
                    let (s, c) = (k * Real::two_pi() / 3.0).sin_cos();
                    push(workspace, u * c + v * s);
                }
            }
        }
        3 => {
            let n = (pts[1] - pts[0]).cross(&(pts[2] - pts[0]));
            if n.norm_squared() > 0.0 {
                push(workspace, n);
                push(workspace, -n);
            }
        }
        _ => {}
    }

    if !workspace.is_solid() {
        for dir in [
            Vector::x(),
            -Vector::x(),
            Vector::y(),
            -Vector::y(),
            Vector::z(),
            -Vector::z(),
        ] {
            push(workspace, dir);
        }
    }
}

// Applies to the original points of the shapes the barycentric coordinates of `proj` on the
// triangle of the fan of `face` containing it.
fn witness_points(
    workspace: &EpaWorkspace,
    face: FaceId,
    proj: &Vector<Real>,
) -> Option<(Point<Real>, Point<Real>)> {
    let polytope = &workspace.polytope;
    let normal = *polytope.face(face)?.normal();
    let vertices: Vec<VertexId> = polytope.face_vertices(face).collect();
    let first = *vertices.first()?;
    let p0 = polytope.vertex(first)?.point().coords;

    let mut best: Option<([VertexId; 3], [Real; 3])> = None;
    let mut best_min = -Real::MAX;

    for pair in vertices[1..].windows(2) {
        let p1 = polytope.vertex(pair[0])?.point().coords;
        let p2 = polytope.vertex(pair[1])?.point().coords;
        let area = (p1 - p0).cross(&(p2 - p0)).dot(&normal);

        if area <= 0.0 {
            continue;
        }

        let coords = [
            (p1 - proj).cross(&(p2 - proj)).dot(&normal) / area,
            (p2 - proj).cross(&(p0 - proj)).dot(&normal) / area,
            (p0 - proj).cross(&(p1 - proj)).dot(&normal) / area,
        ];
        let min = coords.iter().copied().fold(Real::MAX, Real::min);

        if min > best_min {
            best_min = min;
            best = Some(([first, pair[0], pair[1]], coords));
        }
    }

    let (ids, coords) = best?;

    // Clamp the projection inside of the triangle if it slipped out numerically.
    let clamped = coords.map(|c| c.max(0.0));
    let sum: Real = clamped.iter().sum();
    let weights = if sum > 0.0 {
        clamped.map(|c| c / sum)
    } else {
        [1.0 / 3.0; 3]
    };

    let pts = [
        workspace.cso_point(ids[0])?,
        workspace.cso_point(ids[1])?,
        workspace.cso_point(ids[2])?,
    ];

    Some(CSOPoint::weighted_sum(pts.into_iter().zip(weights)))
}
