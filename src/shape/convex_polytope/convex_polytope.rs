use super::construction::InsertionScratch;
use super::{Face, FaceId, HalfEdge, HalfEdgeId, PolytopeError, Vertex, VertexId};
use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Real, Vector};
use crate::shape::{Cuboid, Ramp, SupportMap};
use crate::utils;
use slab::Slab;

/// The default tolerance used to merge coincident points and coplanar faces.
pub const DEFAULT_CONSTRUCTION_EPSILON: Real = 1.0e-10;

/// A convex polytope stored as a doubly-connected edge list.
///
/// Vertices, half-edges and faces live in arenas and refer to each other through
/// [`VertexId`], [`HalfEdgeId`] and [`FaceId`]. The polytope is grown one point at a time
/// with [`ConvexPolytope::add_vertex`], which keeps it convex and merges coplanar
/// neighbor faces into a single polygon.
///
/// Until three non-collinear points are inserted the polytope has no face. Until a fourth
/// non-coplanar point is inserted it is flat and bounded by two back-to-back faces.
#[derive(Clone, Debug)]
pub struct ConvexPolytope {
    pub(crate) vertices: Slab<Vertex>,
    pub(crate) half_edges: Slab<HalfEdge>,
    pub(crate) faces: Slab<Face>,
    pub(crate) construction_epsilon: Real,
    pub(crate) centroid: Point<Real>,
    pub(crate) volume: Real,
    pub(crate) aabb: Aabb,
    pub(crate) scratch: InsertionScratch,
}

impl Default for ConvexPolytope {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvexPolytope {
    /// Creates an empty polytope with the default construction epsilon.
    pub fn new() -> Self {
        Self::with_construction_epsilon(DEFAULT_CONSTRUCTION_EPSILON)
    }

    /// Creates an empty polytope.
    ///
    /// Points closer than `construction_epsilon` to an existing vertex, or to the plane of a
    /// face, are considered to lie on it.
    pub fn with_construction_epsilon(construction_epsilon: Real) -> Self {
        assert!(
            construction_epsilon >= 0.0,
            "The construction epsilon must be positive."
        );
        Self {
            vertices: Slab::new(),
            half_edges: Slab::new(),
            faces: Slab::new(),
            construction_epsilon,
            centroid: Point::origin(),
            volume: 0.0,
            aabb: Aabb::new_invalid(),
            scratch: InsertionScratch::default(),
        }
    }

    /// Builds the convex hull of `points` by inserting them one after the other.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point<Real>>) -> Self {
        let mut result = Self::new();
        for pt in points {
            let _ = result.add_vertex(*pt);
        }
        result
    }

    /// Builds the polytope with the same vertices as `cuboid`.
    pub fn from_cuboid(cuboid: &Cuboid) -> Self {
        Self::from_points(&cuboid.vertices())
    }

    /// Builds the polytope with the same vertices as `ramp`.
    pub fn from_ramp(ramp: &Ramp) -> Self {
        Self::from_points(&ramp.vertices())
    }

    /// Removes every vertex, edge and face, keeping the allocated memory.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.half_edges.clear();
        self.faces.clear();
        self.centroid = Point::origin();
        self.volume = 0.0;
        self.aabb = Aabb::new_invalid();
    }

    /// The tolerance used to merge coincident points and coplanar faces.
    #[inline]
    pub fn construction_epsilon(&self) -> Real {
        self.construction_epsilon
    }

    /// Sets the tolerance used by subsequent insertions.
    pub fn set_construction_epsilon(&mut self, epsilon: Real) {
        assert!(epsilon >= 0.0, "The construction epsilon must be positive.");
        self.construction_epsilon = epsilon;
    }

    /// Does this polytope have no vertex at all?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Is this polytope reduced to a planar polygon?
    #[inline]
    pub fn is_flat(&self) -> bool {
        self.faces.len() == 2
    }

    /// The number of vertices of this polytope.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// The number of half-edges of this polytope (twice its number of edges).
    #[inline]
    pub fn num_half_edges(&self) -> usize {
        self.half_edges.len()
    }

    /// The number of faces of this polytope.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Iterates through the vertices of this polytope.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices.iter().map(|(i, v)| (VertexId(i), v))
    }

    /// Iterates through the half-edges of this polytope.
    pub fn half_edges(&self) -> impl ExactSizeIterator<Item = (HalfEdgeId, &HalfEdge)> + '_ {
        self.half_edges.iter().map(|(i, e)| (HalfEdgeId(i), e))
    }

    /// Iterates through the faces of this polytope.
    pub fn faces(&self) -> impl ExactSizeIterator<Item = (FaceId, &Face)> + '_ {
        self.faces.iter().map(|(i, f)| (FaceId(i), f))
    }

    /// The vertex with the given id, if it exists.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0)
    }

    /// The half-edge with the given id, if it exists.
    #[inline]
    pub fn half_edge(&self, id: HalfEdgeId) -> Option<&HalfEdge> {
        self.half_edges.get(id.0)
    }

    /// The face with the given id, if it exists.
    #[inline]
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.0)
    }

    #[inline]
    pub(crate) fn point(&self, id: VertexId) -> &Point<Real> {
        &self.vertices[id.0].point
    }

    #[inline]
    pub(crate) fn edge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[id.0]
    }

    /// Iterates through the half-edges bounding `face`, starting from its first edge.
    ///
    /// The walk follows `next` links until it comes back to the first edge.
    pub fn face_edges(&self, face: FaceId) -> FaceEdges<'_> {
        let first = self.faces[face.0].first_edge;
        FaceEdges {
            polytope: self,
            first,
            curr: Some(first),
            // Bounds the walk if the cycle is broken.
            remaining: self.half_edges.len(),
        }
    }

    /// Iterates through the vertices of `face`, in counter-clockwise order seen from outside.
    pub fn face_vertices(&self, face: FaceId) -> impl Iterator<Item = VertexId> + '_ {
        self.face_edges(face).map(move |e| self.edge(e).origin)
    }

    /// Iterates through the positions of the vertices of `face`.
    pub fn face_points(&self, face: FaceId) -> impl Iterator<Item = &Point<Real>> + '_ {
        self.face_vertices(face).map(move |v| self.point(v))
    }

    /// The centroid of the volume of this polytope, or the average of its vertices when it
    /// is flat.
    #[inline]
    pub fn centroid(&self) -> &Point<Real> {
        &self.centroid
    }

    /// The volume of this polytope.
    #[inline]
    pub fn volume(&self) -> Real {
        self.volume
    }

    /// The axis-aligned bounding box of this polytope.
    #[inline]
    pub fn local_aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// The vertex maximizing its dot product with `dir`.
    ///
    /// Starts from an arbitrary vertex and walks to neighbors with a strictly larger dot
    /// product until no neighbor improves. On a convex polytope the local maximum is global.
    pub fn supporting_vertex(&self, dir: &Vector<Real>) -> Option<VertexId> {
        let (start, _) = self.vertices.iter().next()?;

        if self.half_edges.is_empty() {
            let mut best = start;
            let mut best_dot = -Real::MAX;
            for (i, v) in self.vertices.iter() {
                let dot = v.point.coords.dot(dir);
                if dot > best_dot {
                    best_dot = dot;
                    best = i;
                }
            }
            return Some(VertexId(best));
        }

        let mut best = VertexId(start);
        let mut best_dot = self.point(best).coords.dot(dir);

        loop {
            let mut improved = false;

            for e in &self.vertices[best.0].outgoing {
                let candidate = self.edge(*e).destination;
                let dot = self.point(candidate).coords.dot(dir);

                if dot > best_dot {
                    best_dot = dot;
                    best = candidate;
                    improved = true;
                }
            }

            if !improved {
                return Some(best);
            }
        }
    }

    /// The face whose polygon is the closest to `point`, with the squared distance.
    pub fn closest_face(&self, point: &Point<Real>) -> Option<(FaceId, Real)> {
        let mut result: Option<(FaceId, Real)> = None;

        for (i, _) in self.faces.iter() {
            let dist = self.face_distance_squared(FaceId(i), point);
            if result.map(|r| dist < r.1).unwrap_or(true) {
                result = Some((FaceId(i), dist));
            }
        }

        result
    }

    /// The squared distance from `point` to the polygon of `face`.
    pub fn face_distance_squared(&self, face: FaceId, point: &Point<Real>) -> Real {
        let f = &self.faces[face.0];
        let height = f.signed_distance(point);
        let projected = point - *f.normal * height;
        let mut inside = true;
        let mut best_edge_dist = Real::MAX;

        for e in self.face_edges(face) {
            let edge = self.edge(e);
            let a = self.point(edge.origin);
            let b = self.point(edge.destination);
            let ab = b - a;

            if f.normal.dot(&ab.cross(&(projected - a))) < 0.0 {
                inside = false;
            }

            let t = if ab.norm_squared() > 0.0 {
                ((point - a).dot(&ab) / ab.norm_squared()).clamp(0.0, 1.0)
            } else {
                0.0
            };
            best_edge_dist = best_edge_dist.min((point - (a + ab * t)).norm_squared());
        }

        if inside {
            height * height
        } else {
            best_edge_dist
        }
    }

    /// Signed distance from `point` to the surface of this polytope, negative inside.
    ///
    /// Returns `None` if the polytope has no face.
    pub fn signed_distance(&self, point: &Point<Real>) -> Option<Real> {
        let max_height = self
            .faces
            .iter()
            .map(|(_, f)| f.signed_distance(point))
            .fold(None, |acc: Option<Real>, h| Some(acc.map_or(h, |a| a.max(h))))?;

        if max_height <= 0.0 && !self.is_flat() {
            Some(max_height)
        } else {
            self.closest_face(point).map(|(_, d2)| d2.sqrt())
        }
    }

    /// Is `point` inside this polytope or within `epsilon` of its surface?
    pub fn is_point_inside(&self, point: &Point<Real>, epsilon: Real) -> bool {
        !self.faces.is_empty()
            && self
                .faces
                .iter()
                .all(|(_, f)| f.signed_distance(point) <= epsilon)
    }

    /// Applies `m` to every vertex of this polytope.
    pub fn transform_mut(&mut self, m: &Isometry<Real>) {
        for (_, v) in self.vertices.iter_mut() {
            v.point = m * v.point;
        }

        let ids: Vec<_> = self.faces.iter().map(|(i, _)| FaceId(i)).collect();
        for face in ids {
            self.update_face_geometry(face);
        }

        self.update_global_properties();
    }

    /// A copy of this polytope with every vertex transformed by `m`.
    pub fn transformed(&self, m: &Isometry<Real>) -> Self {
        let mut result = self.clone();
        result.transform_mut(m);
        result
    }

    /// Overwrites `self` with a copy of `other` transformed by `m`, reusing the memory of
    /// `self`.
    pub fn set_transformed(&mut self, other: &ConvexPolytope, m: &Isometry<Real>) {
        self.clone_from(other);
        self.transform_mut(m);
    }

    /// Checks every structural invariant of the half-edge graph.
    pub fn validate(&self) -> Result<(), PolytopeError> {
        for (i, _) in self.half_edges.iter() {
            self.validate_edge(HalfEdgeId(i))?;
        }

        for (i, _) in self.faces.iter() {
            self.validate_face(FaceId(i))?;
        }

        for (i, v) in self.vertices.iter() {
            for e in &v.outgoing {
                match self.half_edges.get(e.0) {
                    Some(edge) if edge.origin.0 == i => {}
                    _ => return Err(PolytopeError::VertexEdgeMismatch(VertexId(i))),
                }
            }
        }

        Ok(())
    }

    pub(crate) fn validate_edge(&self, id: HalfEdgeId) -> Result<(), PolytopeError> {
        let edge = self
            .half_edges
            .get(id.0)
            .ok_or(PolytopeError::DanglingReference(id))?;
        let dangling = PolytopeError::DanglingReference(id);

        let twin = self.half_edges.get(edge.twin.0).ok_or(dangling)?;
        let next = self.half_edges.get(edge.next.0).ok_or(dangling)?;
        let prev = self.half_edges.get(edge.prev.0).ok_or(dangling)?;

        if !self.vertices.contains(edge.origin.0)
            || !self.vertices.contains(edge.destination.0)
            || !self.faces.contains(edge.face.0)
        {
            return Err(dangling);
        }

        if twin.origin != edge.destination || twin.destination != edge.origin || twin.twin != id
        {
            return Err(PolytopeError::TwinMismatch(id));
        }

        if next.origin != edge.destination
            || prev.destination != edge.origin
            || next.prev != id
            || prev.next != id
            || next.face != edge.face
            || prev.face != edge.face
        {
            return Err(PolytopeError::BrokenEdgeCycle(id));
        }

        Ok(())
    }

    pub(crate) fn validate_face(&self, id: FaceId) -> Result<(), PolytopeError> {
        let face = &self.faces[id.0];
        let mut curr = face.first_edge;
        let mut found = 0;

        loop {
            let edge = self
                .half_edges
                .get(curr.0)
                .ok_or(PolytopeError::DanglingReference(curr))?;

            if edge.face != id {
                return Err(PolytopeError::BrokenEdgeCycle(curr));
            }

            found += 1;
            curr = edge.next;

            if curr == face.first_edge || found > face.num_edges {
                break;
            }
        }

        if found != face.num_edges || curr != face.first_edge {
            return Err(PolytopeError::FaceCycleLength {
                face: id,
                expected: face.num_edges,
                found,
            });
        }

        Ok(())
    }

    pub(crate) fn update_face_geometry(&mut self, face: FaceId) {
        let mut aabb = Aabb::new_invalid();
        let mut sum = Vector::zeros();
        let mut count = 0;

        for pt in self.face_points(face) {
            aabb.take_point(*pt);
            sum += pt.coords;
            count += 1;
        }

        let normal = utils::polygon_normal(self.face_points(face));
        let f = &mut self.faces[face.0];
        if let Some(normal) = normal {
            f.normal = normal;
        }
        f.centroid = Point::from(sum / count.max(1) as Real);
        f.aabb = aabb;
        f.num_edges = count;
    }

    pub(crate) fn update_global_properties(&mut self) {
        self.aabb = Aabb::from_points(self.vertices.iter().map(|(_, v)| &v.point));

        let n = self.vertices.len().max(1) as Real;
        let average = Point::from(
            self.vertices
                .iter()
                .fold(Vector::zeros(), |acc, (_, v)| acc + v.point.coords)
                / n,
        );

        // Sum of the signed volumes of the tetrahedra joining `average` to a triangle fan of
        // each face.
        let mut volume = 0.0;
        let mut weighted_centroid = Vector::zeros();

        if !self.is_flat() {
            for (i, _) in self.faces.iter() {
                let mut pts = self.face_points(FaceId(i));
                let Some(first) = pts.next() else {
                    continue;
                };
                let mut prev: Option<&Point<Real>> = None;

                for pt in pts {
                    if let Some(prev) = prev {
                        let a = first - average;
                        let b = prev - average;
                        let c = pt - average;
                        let tet_volume = a.dot(&b.cross(&c)) / 6.0;
                        volume += tet_volume;
                        weighted_centroid +=
                            (first.coords + prev.coords + pt.coords + average.coords)
                                * (tet_volume / 4.0);
                    }
                    prev = Some(pt);
                }
            }
        }

        self.volume = volume;
        self.centroid = if volume > 0.0 {
            Point::from(weighted_centroid / volume)
        } else {
            average
        };
    }
}

/// Iterator through the half-edges bounding a face.
pub struct FaceEdges<'a> {
    polytope: &'a ConvexPolytope,
    first: HalfEdgeId,
    curr: Option<HalfEdgeId>,
    remaining: usize,
}

impl Iterator for FaceEdges<'_> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<HalfEdgeId> {
        let curr = self.curr?;

        if self.remaining == 0 {
            self.curr = None;
            return None;
        }

        self.remaining -= 1;
        let next = self.polytope.half_edges.get(curr.0).map(|e| e.next);
        self.curr = next.filter(|n| *n != self.first);
        Some(curr)
    }
}

impl SupportMap for ConvexPolytope {
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        self.supporting_vertex(dir)
            .map(|v| *self.point(v))
            .unwrap_or_else(Point::origin)
    }
}
