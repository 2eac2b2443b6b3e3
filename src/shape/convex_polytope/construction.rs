//! Incremental, convexity-preserving insertion of points into a [`ConvexPolytope`].

use super::{ConvexPolytope, Face, FaceId, HalfEdge, HalfEdgeId, Vertex, VertexId};
use crate::math::{Point, Real, UnitVector};
use crate::utils::WBasis;
use na::Unit;

/// Buffers reused from one insertion to the next.
#[derive(Clone, Debug, Default)]
pub(crate) struct InsertionScratch {
    face_marks: Vec<bool>,
    vertex_marks: Vec<bool>,
    edge_marks: Vec<bool>,
    removed_faces: Vec<FaceId>,
    stack: Vec<FaceId>,
    silhouette: Vec<HalfEdgeId>,
    fan_normals: Vec<UnitVector<Real>>,
    doomed_edges: Vec<HalfEdgeId>,
    doomed_vertices: Vec<VertexId>,
    group_starts: Vec<usize>,
    new_faces: Vec<FaceId>,
    cycle: Vec<HalfEdgeId>,
}

impl InsertionScratch {
    fn reset(&mut self, polytope: &ConvexPolytope) {
        self.face_marks.clear();
        self.face_marks.resize(polytope.faces.capacity(), false);
        self.vertex_marks.clear();
        self.vertex_marks.resize(polytope.vertices.capacity(), false);
        self.edge_marks.clear();
        self.edge_marks.resize(polytope.half_edges.capacity(), false);
        self.removed_faces.clear();
        self.stack.clear();
        self.silhouette.clear();
        self.fan_normals.clear();
        self.doomed_edges.clear();
        self.doomed_vertices.clear();
        self.group_starts.clear();
        self.new_faces.clear();
        self.cycle.clear();
    }
}

impl ConvexPolytope {
    /// Inserts `point`, growing this polytope into the convex hull of its previous vertices
    /// and `point`.
    ///
    /// Returns `None` and leaves the polytope untouched if `point` is inside the polytope,
    /// within the construction epsilon of its surface or of an existing vertex, or isn't
    /// finite. Faces that become coplanar with the new faces are merged with them.
    ///
    /// # Panics
    ///
    /// Panics if the rebuilt half-edge graph breaks a structural invariant. This cannot
    /// happen unless the polytope was already corrupted.
    pub fn add_vertex(&mut self, point: Point<Real>) -> Option<VertexId> {
        if !point.coords.iter().all(|c| c.is_finite()) {
            log::debug!("Ignoring the insertion of a non-finite point: {:?}", point);
            return None;
        }

        let eps = self.construction_epsilon;
        if self
            .vertices
            .iter()
            .any(|(_, v)| (v.point - point).norm_squared() <= eps * eps)
        {
            return None;
        }

        let result = match self.faces.len() {
            0 => self.add_vertex_without_face(point),
            2 => self.add_vertex_to_flat_polytope(point),
            _ => self.add_vertex_to_solid_polytope(point),
        };

        if result.is_some() {
            self.update_global_properties();
        }

        result
    }

    fn add_vertex_without_face(&mut self, point: Point<Real>) -> Option<VertexId> {
        let eps = self.construction_epsilon;
        let mut ids = self.vertices.iter().map(|(i, _)| VertexId(i));

        match (ids.next(), ids.next()) {
            (Some(a), Some(b)) => {
                let pa = *self.point(a);
                let ab = self.point(b) - pa;
                let ap = point - pa;
                let cross = ab.cross(&ap);

                if cross.norm() <= eps * ab.norm() {
                    // Collinear: only keep the two extreme points.
                    let t = ap.dot(&ab) / ab.norm_squared();
                    let replaced = if t < 0.0 {
                        a
                    } else if t > 1.0 {
                        b
                    } else {
                        return None;
                    };
                    let _ = self.vertices.remove(replaced.0);
                    Some(VertexId(self.vertices.insert(Vertex::new(point))))
                } else {
                    let c = VertexId(self.vertices.insert(Vertex::new(point)));
                    self.build_flat_faces(&[a, b, c]);
                    Some(c)
                }
            }
            _ => Some(VertexId(self.vertices.insert(Vertex::new(point)))),
        }
    }

    fn add_vertex_to_flat_polytope(&mut self, point: Point<Real>) -> Option<VertexId> {
        let eps = self.construction_epsilon;
        let (front_id, front) = self
            .faces
            .iter()
            .next()
            .map(|(i, f)| (FaceId(i), *f))?;

        if front.signed_distance(&point).abs() > eps {
            return self.add_vertex_to_solid_polytope(point);
        }

        // The point is in the plane of the polygon: recompute its 2D convex hull.
        let [u, v] = front.normal.into_inner().orthonormal_basis();
        let to_2d = |p: &Point<Real>| {
            let d = p - front.centroid;
            (d.dot(&u), d.dot(&v))
        };

        let mut candidates: Vec<(Option<VertexId>, (Real, Real))> = self
            .face_vertices(front_id)
            .map(|id| (Some(id), to_2d(self.point(id))))
            .collect();
        candidates.push((None, to_2d(&point)));

        let hull = planar_convex_hull(&mut candidates, eps);

        if hull.len() < 3 || !hull.iter().any(|(id, _)| id.is_none()) {
            return None;
        }

        // Keep the ids of the surviving vertices stable.
        self.half_edges.clear();
        self.faces.clear();
        let kept: Vec<VertexId> = hull.iter().filter_map(|(id, _)| *id).collect();
        let dropped: Vec<usize> = self
            .vertices
            .iter()
            .map(|(i, _)| i)
            .filter(|i| !kept.contains(&VertexId(*i)))
            .collect();
        for i in dropped {
            let _ = self.vertices.remove(i);
        }
        for (_, v) in self.vertices.iter_mut() {
            v.outgoing.clear();
        }

        let new_id = VertexId(self.vertices.insert(Vertex::new(point)));
        let ring: Vec<VertexId> = hull.iter().map(|(id, _)| id.unwrap_or(new_id)).collect();
        self.build_flat_faces(&ring);

        Some(new_id)
    }

    /// Builds two back-to-back faces bounded by `ring`, given counter-clockwise with respect
    /// to the normal of the first face.
    fn build_flat_faces(&mut self, ring: &[VertexId]) {
        let n = ring.len();
        let front = FaceId(self.faces.insert(Face::placeholder()));
        let back = FaceId(self.faces.insert(Face::placeholder()));
        let mut front_edges = Vec::with_capacity(n);
        let mut back_edges = Vec::with_capacity(n);

        for i in 0..n {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            let ab = HalfEdgeId(self.half_edges.insert(HalfEdge::new(a, b)));
            let ba = HalfEdgeId(self.half_edges.insert(HalfEdge::new(b, a)));
            self.half_edges[ab.0].twin = ba;
            self.half_edges[ba.0].twin = ab;
            self.vertices[a.0].outgoing.push(ab);
            self.vertices[b.0].outgoing.push(ba);
            front_edges.push(ab);
            back_edges.push(ba);
        }

        back_edges.reverse();
        self.link_face_cycle(&front_edges, front);
        self.link_face_cycle(&back_edges, back);
    }

    /// Makes `edges` the boundary cycle of `face`, in order.
    fn link_face_cycle(&mut self, edges: &[HalfEdgeId], face: FaceId) {
        let n = edges.len();

        for (i, e) in edges.iter().enumerate() {
            let he = &mut self.half_edges[e.0];
            he.next = edges[(i + 1) % n];
            he.prev = edges[(i + n - 1) % n];
            he.face = face;
        }

        let f = &mut self.faces[face.0];
        f.first_edge = edges[0];
        f.num_edges = n;
        self.update_face_geometry(face);
    }

    fn add_vertex_to_solid_polytope(&mut self, point: Point<Real>) -> Option<VertexId> {
        let mut scratch = core::mem::take(&mut self.scratch);
        scratch.reset(self);
        let result = self.insert_outside_point(point, &mut scratch);
        self.scratch = scratch;
        result
    }

    fn insert_outside_point(
        &mut self,
        point: Point<Real>,
        scratch: &mut InsertionScratch,
    ) -> Option<VertexId> {
        let eps = self.construction_epsilon;

        /*
         * Faces seen from the point.
         */
        for (i, face) in self.faces.iter() {
            if face.can_see_point(&point, eps) {
                scratch.face_marks[i] = true;
                scratch.removed_faces.push(FaceId(i));
            }
        }

        if scratch.removed_faces.is_empty() {
            return None;
        }

        // Neighbors the point lies on are rebuilt too, so they merge with the new faces.
        scratch.stack.extend_from_slice(&scratch.removed_faces);
        while let Some(face) = scratch.stack.pop() {
            for e in self.face_edges(face) {
                let neighbor = self.edge(self.edge(e).twin).face;

                if !scratch.face_marks[neighbor.0]
                    && self.faces[neighbor.0].signed_distance(&point).abs() <= eps
                {
                    scratch.face_marks[neighbor.0] = true;
                    scratch.removed_faces.push(neighbor);
                    scratch.stack.push(neighbor);
                }
            }
        }

        if scratch.removed_faces.len() == self.faces.len() {
            log::debug!("Every face is visible from the inserted point, skipping it.");
            return None;
        }

        /*
         * Silhouette.
         */
        let mut num_silhouette_edges = 0;
        let mut start = None;
        for face in &scratch.removed_faces {
            for e in self.face_edges(*face) {
                let twin_face = self.edge(self.edge(e).twin).face;
                if !scratch.face_marks[twin_face.0] {
                    num_silhouette_edges += 1;
                    start = start.or(Some(e));
                }
            }
        }

        let start = start?;
        if !self.compute_silhouette(start, num_silhouette_edges, scratch) {
            log::debug!(
                "The faces visible from {:?} don't have a single silhouette, skipping it.",
                point
            );
            return None;
        }

        /*
         * Fan of new triangles, grouped by plane.
         */
        for e in &scratch.silhouette {
            let edge = self.edge(*e);
            let a = self.point(edge.origin);
            let b = self.point(edge.destination);
            let ab = b - a;
            let cross = ab.cross(&(point - a));

            if cross.norm() <= eps * ab.norm() {
                log::debug!("Degenerate fan triangle while inserting {:?}.", point);
                return None;
            }

            scratch.fan_normals.push(Unit::new_normalize(cross));
        }

        let m = scratch.silhouette.len();
        for k in 0..m {
            let prev_normal = scratch.fan_normals[(k + m - 1) % m];
            let b = self.point(self.edge(scratch.silhouette[k]).destination);
            let coplanar = prev_normal.dot(&(b - point)).abs() <= eps
                && prev_normal.dot(&scratch.fan_normals[k]) > 0.0;

            if !coplanar {
                scratch.group_starts.push(k);
            }
        }

        if scratch.group_starts.len() < 3 {
            log::debug!("Fewer than three new faces around {:?}, skipping it.", point);
            return None;
        }

        /*
         * Remove what is now inside.
         */
        for e in &scratch.silhouette {
            scratch.edge_marks[e.0] = true;
            scratch.vertex_marks[self.edge(*e).origin.0] = true;
        }

        for face in &scratch.removed_faces {
            for e in self.face_edges(*face) {
                if !scratch.edge_marks[e.0] {
                    scratch.doomed_edges.push(e);
                    let origin = self.edge(e).origin;
                    if !scratch.vertex_marks[origin.0] {
                        scratch.vertex_marks[origin.0] = true;
                        scratch.doomed_vertices.push(origin);
                    }
                }
            }
        }

        for e in &scratch.doomed_edges {
            let _ = self.half_edges.remove(e.0);
        }
        for v in &scratch.doomed_vertices {
            let _ = self.vertices.remove(v.0);
        }
        for face in &scratch.removed_faces {
            let _ = self.faces.remove(face.0);
        }
        for e in &scratch.silhouette {
            let origin = self.half_edges[e.0].origin;
            let half_edges = &self.half_edges;
            self.vertices[origin.0]
                .outgoing
                .retain(|out| half_edges.contains(out.0) && half_edges[out.0].origin == origin);
        }

        /*
         * New faces.
         */
        let apex = VertexId(self.vertices.insert(Vertex::new(point)));
        let num_groups = scratch.group_starts.len();
        let mut first_spoke_out = HalfEdgeId::INVALID;
        let mut last_spoke_in = HalfEdgeId::INVALID;

        for g in 0..num_groups {
            let begin = scratch.group_starts[g];
            let end = scratch.group_starts[(g + 1) % num_groups];
            let len = (end + m - begin - 1) % m + 1;

            let first = scratch.silhouette[begin];
            let last = scratch.silhouette[(begin + len - 1) % m];
            let first_origin = self.half_edges[first.0].origin;
            let last_destination = self.half_edges[last.0].destination;

            let spoke_out = HalfEdgeId(
                self.half_edges
                    .insert(HalfEdge::new(apex, first_origin)),
            );
            let spoke_in = HalfEdgeId(
                self.half_edges
                    .insert(HalfEdge::new(last_destination, apex)),
            );
            self.vertices[apex.0].outgoing.push(spoke_out);
            self.vertices[last_destination.0].outgoing.push(spoke_in);

            if g == 0 {
                first_spoke_out = spoke_out;
            } else {
                self.half_edges[last_spoke_in.0].twin = spoke_out;
                self.half_edges[spoke_out.0].twin = last_spoke_in;
            }
            last_spoke_in = spoke_in;

            scratch.cycle.clear();
            scratch.cycle.push(spoke_out);
            for k in 0..len {
                scratch.cycle.push(scratch.silhouette[(begin + k) % m]);
            }
            scratch.cycle.push(spoke_in);

            let face = FaceId(self.faces.insert(Face::placeholder()));
            let cycle = core::mem::take(&mut scratch.cycle);
            self.link_face_cycle(&cycle, face);
            scratch.cycle = cycle;
            scratch.new_faces.push(face);
        }

        self.half_edges[last_spoke_in.0].twin = first_spoke_out;
        self.half_edges[first_spoke_out.0].twin = last_spoke_in;

        self.assert_faces_are_valid(&scratch.new_faces);

        Some(apex)
    }

    /// Orders the silhouette edges into a single cycle, starting from `start`.
    ///
    /// Returns `false` if the silhouette isn't one simple cycle made of
    /// `num_silhouette_edges` edges.
    fn compute_silhouette(
        &self,
        start: HalfEdgeId,
        num_silhouette_edges: usize,
        scratch: &mut InsertionScratch,
    ) -> bool {
        let is_removed = |e: HalfEdgeId, marks: &[bool]| marks[self.edge(e).face.0];
        let mut curr = start;

        loop {
            if scratch.vertex_marks[self.edge(curr).origin.0] {
                return false;
            }
            scratch.vertex_marks[self.edge(curr).origin.0] = true;
            scratch.silhouette.push(curr);

            // Turn around the destination vertex through the removed faces.
            let mut candidate = self.edge(curr).next;
            let mut steps = 0;
            while is_removed(self.edge(candidate).twin, &scratch.face_marks) {
                candidate = self.edge(self.edge(candidate).twin).next;
                steps += 1;
                if steps > self.half_edges.len() {
                    return false;
                }
            }

            if candidate == start {
                break;
            }

            if scratch.silhouette.len() >= num_silhouette_edges {
                return false;
            }

            curr = candidate;
        }

        for e in &scratch.silhouette {
            scratch.vertex_marks[self.edge(*e).origin.0] = false;
        }

        scratch.silhouette.len() == num_silhouette_edges
    }

    fn assert_faces_are_valid(&self, faces: &[FaceId]) {
        for face in faces {
            if let Err(err) = self.validate_face(*face) {
                panic!("Convex polytope corrupted by a vertex insertion: {}", err);
            }

            for e in self.face_edges(*face) {
                if let Err(err) = self.validate_edge(e) {
                    panic!("Convex polytope corrupted by a vertex insertion: {}", err);
                }
            }
        }
    }
}

/// Andrew's monotone chain on 2D points, dropping points within `eps` of a hull edge.
///
/// The result is counter-clockwise.
fn planar_convex_hull(
    points: &mut [(Option<VertexId>, (Real, Real))],
    eps: Real,
) -> Vec<(Option<VertexId>, (Real, Real))> {
    points.sort_by(|a, b| {
        let (pa, pb) = (a.1, b.1);
        pa.0.total_cmp(&pb.0).then(pa.1.total_cmp(&pb.1))
    });

    let turns_left = |o: (Real, Real), a: (Real, Real), b: (Real, Real)| {
        let cross = (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0);
        let len = (b.0 - o.0).hypot(b.1 - o.1);
        cross > eps * len
    };

    let mut hull: Vec<(Option<VertexId>, (Real, Real))> = Vec::with_capacity(points.len() + 1);

    let n = points.len();
    for pass in 0..2 {
        let floor = hull.len();

        for i in 0..n {
            let pt = if pass == 0 { points[i] } else { points[n - 1 - i] };

            while hull.len() >= floor + 2
                && !turns_left(hull[hull.len() - 2].1, hull[hull.len() - 1].1, pt.1)
            {
                let _ = hull.pop();
            }
            hull.push(pt);
        }

        let _ = hull.pop();
    }

    hull
}
