use crate::math::{Point, Real, UnitVector, Vector};
use crate::query::gjk::CSOPoint;
use arrayvec::ArrayVec;
use na::Unit;

/// A simplex of up to four CSO points, reduced by signed volumes.
///
/// After each call to [`GjkSimplex::project_origin_and_reduce`] only the vertices of the
/// smallest sub-simplex containing the projection of the origin are kept, together with
/// the barycentric coordinates of that projection.
#[derive(Clone, Debug, Default)]
pub struct GjkSimplex {
    points: ArrayVec<CSOPoint, 4>,
    proj: ArrayVec<Real, 4>,
}

// Barycentric coordinates indexed like the simplex points, with the sub-simplex they
// were computed on.
#[derive(Copy, Clone, Debug)]
struct Projection {
    coords: [Real; 4],
    mask: u8,
    dist2: Real,
}

impl Projection {
    fn closest(self, other: Self) -> Self {
        if other.dist2 < self.dist2 {
            other
        } else {
            self
        }
    }
}

impl GjkSimplex {
    /// Creates an empty simplex.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every point and sets `pt` as the only vertex.
    pub fn reset(&mut self, pt: CSOPoint) {
        self.points.clear();
        self.proj.clear();
        self.points.push(pt);
        self.proj.push(1.0);
    }

    /// Removes every point from this simplex.
    pub fn clear(&mut self) {
        self.points.clear();
        self.proj.clear();
    }

    /// The number of vertices minus one: 0 for a point, 3 for a tetrahedron.
    ///
    /// An empty simplex has dimension 0 too.
    pub fn dimension(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// The number of vertices of this simplex.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Does this simplex have no vertex?
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The vertices of this simplex.
    pub fn points(&self) -> &[CSOPoint] {
        &self.points
    }

    /// The barycentric coordinates of the projection of the origin, one per vertex.
    pub fn proj_coords(&self) -> &[Real] {
        &self.proj
    }

    /// Does this simplex already have a vertex within `eps` of `pt`?
    pub fn contains_point(&self, pt: &Point<Real>, eps: Real) -> bool {
        self.points
            .iter()
            .any(|p| (p.point - pt).norm_squared() <= eps * eps)
    }

    /// The largest squared norm among the vertices of this simplex.
    pub fn max_sq_len(&self) -> Real {
        self.points
            .iter()
            .map(|p| p.point.coords.norm_squared())
            .fold(0.0, Real::max)
    }

    /// Adds a vertex to this simplex.
    ///
    /// Returns `false` if the simplex is already a tetrahedron.
    pub fn add_point(&mut self, pt: CSOPoint) -> bool {
        if self.points.try_push(pt).is_err() {
            return false;
        }

        self.proj.push(0.0);
        true
    }

    /// The point of this simplex closest to the origin, from the last projection.
    pub fn proj_point(&self) -> Point<Real> {
        self.points
            .iter()
            .zip(self.proj.iter())
            .fold(Point::origin(), |acc, (p, w)| acc + p.point.coords * *w)
    }

    /// The witness points on both shapes matching the last projection of the origin.
    pub fn witness_points(&self) -> (Point<Real>, Point<Real>) {
        CSOPoint::weighted_sum(self.points.iter().zip(self.proj.iter().copied()))
    }

    /// The normal of the triangle formed by this simplex, oriented toward the origin.
    ///
    /// Returns `None` if the simplex isn't a non-degenerate triangle.
    pub fn triangle_normal_toward_origin(&self) -> Option<UnitVector<Real>> {
        if self.points.len() != 3 {
            return None;
        }

        let a = self.points[0].point;
        let n = (self.points[1].point - a).cross(&(self.points[2].point - a));
        let n = Unit::try_new(n, 0.0)?;

        if n.dot(&a.coords) > 0.0 {
            Some(-n)
        } else {
            Some(n)
        }
    }

    /// Projects the origin on this simplex and discards every vertex not needed to express
    /// that projection.
    ///
    /// Returns the projected point.
    pub fn project_origin_and_reduce(&mut self) -> Point<Real> {
        let proj = match self.points.len() {
            0 => return Point::origin(),
            1 => self.project_vertex(0),
            2 => self.project_segment(0, 1),
            3 => self.project_triangle(0, 1, 2),
            _ => self.project_tetrahedron(),
        };

        let mut kept_points = ArrayVec::<CSOPoint, 4>::new();
        let mut kept_coords = ArrayVec::<Real, 4>::new();

        for (i, pt) in self.points.iter().enumerate() {
            if proj.mask & (1 << i) != 0 {
                kept_points.push(*pt);
                kept_coords.push(proj.coords[i]);
            }
        }

        self.points = kept_points;
        self.proj = kept_coords;
        self.proj_point()
    }

    fn pt(&self, i: usize) -> &Vector<Real> {
        &self.points[i].point.coords
    }

    fn project_vertex(&self, i: usize) -> Projection {
        let mut coords = [0.0; 4];
        coords[i] = 1.0;

        Projection {
            coords,
            mask: 1 << i,
            dist2: self.pt(i).norm_squared(),
        }
    }

    fn project_segment(&self, i: usize, j: usize) -> Projection {
        let a = self.pt(i);
        let ab = self.pt(j) - a;
        let ab_len2 = ab.norm_squared();

        if ab_len2 == 0.0 {
            return self.project_vertex(i);
        }

        let t = -a.dot(&ab) / ab_len2;

        if t <= 0.0 {
            self.project_vertex(i)
        } else if t >= 1.0 {
            self.project_vertex(j)
        } else {
            let mut coords = [0.0; 4];
            coords[i] = 1.0 - t;
            coords[j] = t;

            Projection {
                coords,
                mask: (1 << i) | (1 << j),
                dist2: (a + ab * t).norm_squared(),
            }
        }
    }

    fn project_triangle(&self, i: usize, j: usize, k: usize) -> Projection {
        let (a, b, c) = (self.pt(i), self.pt(j), self.pt(k));
        let n = (b - a).cross(&(c - a));
        let n_len2 = n.norm_squared();

        let edges = || {
            self.project_segment(i, j)
                .closest(self.project_segment(j, k))
                .closest(self.project_segment(k, i))
        };

        if n_len2 <= crate::math::DEFAULT_EPSILON * (b - a).norm_squared() * (c - a).norm_squared()
        {
            // Degenerate triangle.
            return edges();
        }

        // Signed areas of the sub-triangles formed with the projection of the origin.
        let p = n * (n.dot(a) / n_len2);
        let u = (b - p).cross(&(c - p)).dot(&n) / n_len2;
        let v = (c - p).cross(&(a - p)).dot(&n) / n_len2;
        let w = 1.0 - u - v;

        if u >= 0.0 && v >= 0.0 && w >= 0.0 {
            let mut coords = [0.0; 4];
            coords[i] = u;
            coords[j] = v;
            coords[k] = w;

            return Projection {
                coords,
                mask: (1 << i) | (1 << j) | (1 << k),
                dist2: p.norm_squared(),
            };
        }

        // The closest point lies on an edge facing a negative coordinate.
        let mut best: Option<Projection> = None;
        for (coord, (e1, e2)) in [(u, (j, k)), (v, (k, i)), (w, (i, j))] {
            if coord < 0.0 {
                let proj = self.project_segment(e1, e2);
                best = Some(best.map_or(proj, |b| b.closest(proj)));
            }
        }

        best.unwrap_or_else(edges)
    }

    fn project_tetrahedron(&self) -> Projection {
        let (a, b, c, d) = (self.pt(0), self.pt(1), self.pt(2), self.pt(3));
        let det = (b - a).dot(&(c - a).cross(&(d - a)));

        let faces = [(1, 2, 3), (0, 3, 2), (0, 1, 3), (0, 2, 1)];

        if det.abs() <= crate::math::DEFAULT_EPSILON * self.max_sq_len().powf(1.5) {
            // Flat tetrahedron: the closest point is on one of its faces.
            return faces
                .iter()
                .map(|(i, j, k)| self.project_triangle(*i, *j, *k))
                .reduce(Projection::closest)
                .unwrap_or_else(|| self.project_vertex(0));
        }

        // Signed volumes of the sub-tetrahedra formed by replacing each vertex with the origin.
        let coords = [
            b.dot(&c.cross(d)) / det,
            -a.dot(&c.cross(d)) / det,
            a.dot(&b.cross(d)) / det,
            -a.dot(&b.cross(c)) / det,
        ];

        if coords.iter().all(|c| *c >= 0.0) {
            return Projection {
                coords,
                mask: 0b1111,
                dist2: 0.0,
            };
        }

        let mut best: Option<Projection> = None;
        for (opposite, (i, j, k)) in faces.iter().enumerate() {
            if coords[opposite] < 0.0 {
                let proj = self.project_triangle(*i, *j, *k);
                best = Some(best.map_or(proj, |b| b.closest(proj)));
            }
        }

        best.unwrap_or_else(|| self.project_vertex(0))
    }
}
