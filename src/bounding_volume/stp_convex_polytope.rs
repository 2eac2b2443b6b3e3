use crate::bounding_volume::stp::{
    circumcircle, edge_patch_support, enclosing_radius, sphere_support, wedge_contains, FacePatch,
    SphereTorusPatches, StpMargins, StpRadii,
};
use crate::math::{Point, Real, UnitVector, DEFAULT_EPSILON};
use crate::shape::{ConvexPolytope, VertexId};
use crate::utils::WBasis;
use na::Unit;

// Relative tolerance of the tests placing a vertex on, or inside, a face sphere.
const SPHERE_EPSILON: Real = 1.0e-9;

// Each refinement grows the large radius until every face sphere bulges by at most the max
// margin. It usually settles after one or two.
const MAX_REFINEMENTS: usize = 8;

/// A face of the ball hull: a large sphere touching the vertex spheres of several vertices,
/// with every other vertex sphere inside of it.
#[derive(Clone, Debug)]
struct HullFace {
    patch: FacePatch,
    // Indices into `BallHull::points`, counter-clockwise around the patch normal.
    vertices: Vec<usize>,
    circumradius: Real,
}

/// An edge of the ball hull, rounded by a spindle torus.
#[derive(Copy, Clone, Debug)]
struct HullEdge {
    a: usize,
    b: usize,
    // The face containing `a -> b`, then the face containing `b -> a`. `None` when the hull
    // is the spindle of two points.
    faces: Option<[usize; 2]>,
}

/// The intersection of every ball of radius `R - r` containing the vertices of a polytope.
///
/// Dilated by the vertex spheres, this is the sphere-torus-patch bounding volume: faces are
/// spheres through three or more cocircular vertices containing all the others, and edges
/// separate two such faces.
#[derive(Clone, Debug)]
struct BallHull {
    points: Vec<Point<Real>>,
    faces: Vec<HullFace>,
    edges: Vec<HullEdge>,
}

impl BallHull {
    fn new(points: Vec<Point<Real>>, radii: &StpRadii) -> Self {
        let reach = radii.reach();
        let tolerance = SPHERE_EPSILON * (1.0 + reach);
        let mut faces: Vec<HullFace> = Vec::new();
        let n = points.len();

        for i in 0..n {
            for j in i + 1..n {
                for k in j + 1..n {
                    let (pi, pj, pk) = (&points[i], &points[j], &points[k]);
                    let (center, circumradius) = match circumcircle(pi, pj, pk) {
                        Some(circle) if circle.1 < reach => circle,
                        _ => continue,
                    };
                    let axis = match Unit::try_new((pj - pi).cross(&(pk - pi)), DEFAULT_EPSILON) {
                        Some(axis) => axis,
                        None => continue,
                    };
                    let offset = radii.sphere_offset(circumradius);

                    for normal in [axis, Unit::new_unchecked(-axis.into_inner())] {
                        let sphere_center = center - normal.into_inner() * offset;

                        let known = faces.iter().any(|face| {
                            na::distance(&face.patch.sphere_center, &sphere_center) <= tolerance
                        });
                        if known
                            || points
                                .iter()
                                .any(|pt| na::distance(pt, &sphere_center) > reach + tolerance)
                        {
                            continue;
                        }

                        let patch = FacePatch {
                            normal,
                            sphere_center,
                        };
                        let vertices = cocircular_vertices(&points, &patch, &center, reach, tolerance);
                        faces.push(HullFace {
                            patch,
                            vertices,
                            circumradius,
                        });
                    }
                }
            }
        }

        let edges = if n == 2 {
            vec![HullEdge {
                a: 0,
                b: 1,
                faces: None,
            }]
        } else {
            pair_face_edges(&faces)
        };

        Self {
            points,
            faces,
            edges,
        }
    }

    fn largest_circumradius(&self) -> Real {
        self.faces
            .iter()
            .map(|face| face.circumradius)
            .fold(0.0, Real::max)
    }

    fn face_edges<'a>(
        &'a self,
        face: &'a HullFace,
    ) -> impl Iterator<Item = (&'a Point<Real>, &'a Point<Real>)> + 'a {
        let ids = &face.vertices;
        (0..ids.len()).map(move |i| (&self.points[ids[i]], &self.points[ids[(i + 1) % ids.len()]]))
    }

    // Is `dir` outside of the patch of `face` across its edge `a -> b`?
    fn beyond_edge(&self, face: usize, a: &Point<Real>, b: &Point<Real>, dir: &UnitVector<Real>) -> bool {
        !wedge_contains(&self.faces[face].patch.sphere_center, a, b, dir)
    }
}

/// The vertices lying on the sphere of `patch`, sorted counter-clockwise around its normal.
fn cocircular_vertices(
    points: &[Point<Real>],
    patch: &FacePatch,
    circle_center: &Point<Real>,
    reach: Real,
    tolerance: Real,
) -> Vec<usize> {
    let [u, v] = patch.normal.into_inner().orthonormal_basis();
    let mut on_sphere: Vec<(usize, Real)> = points
        .iter()
        .enumerate()
        .filter(|(_, pt)| (na::distance(*pt, &patch.sphere_center) - reach).abs() <= tolerance)
        .map(|(id, pt)| {
            let dpt = pt - circle_center;
            (id, dpt.dot(&v).atan2(dpt.dot(&u)))
        })
        .collect();
    on_sphere.sort_by(|a, b| a.1.total_cmp(&b.1));
    on_sphere.into_iter().map(|(id, _)| id).collect()
}

/// Matches the boundary edges of the faces two by two.
fn pair_face_edges(faces: &[HullFace]) -> Vec<HullEdge> {
    let mut half_edges: Vec<(usize, usize, usize)> = faces
        .iter()
        .enumerate()
        .flat_map(|(f, face)| {
            let ids = &face.vertices;
            (0..ids.len()).map(move |i| (ids[i], ids[(i + 1) % ids.len()], f))
        })
        .collect();
    half_edges.sort_unstable_by_key(|(a, b, _)| ((*a).min(*b), (*a).max(*b)));

    let mut edges = Vec::with_capacity(half_edges.len() / 2);
    let mut i = 0;

    while i < half_edges.len() {
        let (a, b, left) = half_edges[i];

        match half_edges.get(i + 1) {
            Some(&(twin_a, twin_b, right)) if twin_a == b && twin_b == a => {
                edges.push(HullEdge {
                    a,
                    b,
                    faces: Some([left, right]),
                });
                i += 2;
            }
            _ => {
                log::debug!("Ball hull edge {} -> {} has no twin, it is left unrounded.", a, b);
                i += 1;
            }
        }
    }

    edges
}

/// A convex polytope rounded by sphere-torus patches.
///
/// The patches are those of the ball hull of the polytope vertices, which keeps the rounded
/// surface convex even where the polytope faces aren't cocircular. The support function scans
/// every face and edge patch.
#[derive(Clone, Debug)]
pub struct StpConvexPolytope {
    polytope: ConvexPolytope,
    radii: StpRadii,
    hull: BallHull,
}

impl StpConvexPolytope {
    /// Rounds `polytope` with the given margins.
    ///
    /// The patches are computed once: the polytope must not change afterward, which is why
    /// it is owned by the bounding volume.
    pub fn new(polytope: ConvexPolytope, margins: StpMargins) -> Self {
        let points: Vec<Point<Real>> = polytope.vertices().map(|(_, v)| *v.point()).collect();
        let extent = enclosing_radius(polytope.centroid(), &points);
        let largest_face = polytope
            .faces()
            .map(|(id, face)| enclosing_radius(face.centroid(), polytope.face_points(id)))
            .fold(0.0, Real::max);

        let mut length = 2.0 * largest_face;
        let mut refinements = 0;

        let (radii, hull) = loop {
            let mut radii = StpRadii::new(margins, length);

            // Every vertex must fit in a single face sphere.
            if radii.reach() <= extent {
                length = 2.0 * extent;
                radii = StpRadii::new(margins, length);
            }

            let hull = BallHull::new(points.clone(), &radii);
            let widest = 2.0 * hull.largest_circumradius();
            refinements += 1;

            if widest <= length * (1.0 + SPHERE_EPSILON) {
                break (radii, hull);
            }

            if refinements == MAX_REFINEMENTS {
                log::debug!(
                    "STP face spheres still exceed the max margin after {} refinements.",
                    refinements
                );
                break (radii, hull);
            }

            length = widest;
        };

        Self {
            polytope,
            radii,
            hull,
        }
    }

    /// The rounded polytope.
    #[inline]
    pub fn polytope(&self) -> &ConvexPolytope {
        &self.polytope
    }

    /// The radii of the patches.
    #[inline]
    pub fn radii(&self) -> &StpRadii {
        &self.radii
    }

    /// Gives back the rounded polytope.
    pub fn into_inner(self) -> ConvexPolytope {
        self.polytope
    }
}

impl SphereTorusPatches for StpConvexPolytope {
    type Anchor = Option<VertexId>;

    fn anchor(&self, dir: &UnitVector<Real>) -> Option<VertexId> {
        self.polytope.supporting_vertex(dir)
    }

    fn face_support(&self, _: &Option<VertexId>, dir: &UnitVector<Real>) -> Option<Point<Real>> {
        self.hull.faces.iter().find_map(|face| {
            face.patch
                .support(self.hull.face_edges(face), &self.radii, dir)
        })
    }

    fn edge_support(&self, _: &Option<VertexId>, dir: &UnitVector<Real>) -> Option<Point<Real>> {
        self.hull.edges.iter().find_map(|edge| {
            let a = &self.hull.points[edge.a];
            let b = &self.hull.points[edge.b];
            let beyond = edge.faces.map_or(true, |[left, right]| {
                self.hull.beyond_edge(left, a, b, dir) && self.hull.beyond_edge(right, b, a, dir)
            });

            if beyond {
                edge_patch_support(a, b, &self.radii, dir)
            } else {
                None
            }
        })
    }

    fn vertex_support(&self, vertex: &Option<VertexId>, dir: &UnitVector<Real>) -> Point<Real> {
        let center = vertex
            .and_then(|v| self.polytope.vertex(v))
            .map(|v| *v.point())
            .unwrap_or_else(Point::origin);
        sphere_support(&center, self.radii.min_margin(), dir)
    }
}
