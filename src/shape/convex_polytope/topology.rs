//! Elements of the half-edge graph of a [`ConvexPolytope`](super::ConvexPolytope).

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, UnitVector, Vector};
use smallvec::SmallVec;

macro_rules! arena_id {
    ($(#[$doc: meta])* $name: ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) usize);

        impl $name {
            /// The index of this element in its polytope arena.
            ///
            /// Indices of removed elements are recycled by later insertions.
            #[inline]
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

arena_id!(
    /// Identifier of a vertex of a convex polytope.
    VertexId
);
arena_id!(
    /// Identifier of a half-edge of a convex polytope.
    HalfEdgeId
);
arena_id!(
    /// Identifier of a face of a convex polytope.
    FaceId
);

impl HalfEdgeId {
    pub(crate) const INVALID: HalfEdgeId = HalfEdgeId(usize::MAX);
}

impl FaceId {
    pub(crate) const INVALID: FaceId = FaceId(usize::MAX);
}

/// A vertex of a convex polytope.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub(crate) point: Point<Real>,
    pub(crate) outgoing: SmallVec<[HalfEdgeId; 6]>,
}

impl Vertex {
    pub(crate) fn new(point: Point<Real>) -> Self {
        Self {
            point,
            outgoing: SmallVec::new(),
        }
    }

    /// The position of this vertex.
    #[inline]
    pub fn point(&self) -> &Point<Real> {
        &self.point
    }

    /// The half-edges starting at this vertex.
    #[inline]
    pub fn outgoing_edges(&self) -> &[HalfEdgeId] {
        &self.outgoing
    }
}

/// An oriented edge of a face boundary.
///
/// Every half-edge has a twin running in the opposite direction along the boundary of the
/// adjacent face.
#[derive(Copy, Clone, Debug)]
pub struct HalfEdge {
    pub(crate) origin: VertexId,
    pub(crate) destination: VertexId,
    pub(crate) twin: HalfEdgeId,
    pub(crate) next: HalfEdgeId,
    pub(crate) prev: HalfEdgeId,
    pub(crate) face: FaceId,
}

impl HalfEdge {
    pub(crate) fn new(origin: VertexId, destination: VertexId) -> Self {
        Self {
            origin,
            destination,
            twin: HalfEdgeId::INVALID,
            next: HalfEdgeId::INVALID,
            prev: HalfEdgeId::INVALID,
            face: FaceId::INVALID,
        }
    }

    /// The vertex this half-edge starts from.
    #[inline]
    pub fn origin(&self) -> VertexId {
        self.origin
    }

    /// The vertex this half-edge ends at.
    #[inline]
    pub fn destination(&self) -> VertexId {
        self.destination
    }

    /// The half-edge with reversed endpoints, on the neighbor face.
    #[inline]
    pub fn twin(&self) -> HalfEdgeId {
        self.twin
    }

    /// The following half-edge on the boundary of the same face.
    #[inline]
    pub fn next(&self) -> HalfEdgeId {
        self.next
    }

    /// The preceding half-edge on the boundary of the same face.
    #[inline]
    pub fn prev(&self) -> HalfEdgeId {
        self.prev
    }

    /// The face this half-edge bounds.
    #[inline]
    pub fn face(&self) -> FaceId {
        self.face
    }
}

/// A planar convex face of a polytope, bounded by a counter-clockwise cycle of half-edges
/// when seen from outside.
#[derive(Copy, Clone, Debug)]
pub struct Face {
    pub(crate) first_edge: HalfEdgeId,
    pub(crate) num_edges: usize,
    pub(crate) normal: UnitVector<Real>,
    pub(crate) centroid: Point<Real>,
    pub(crate) aabb: Aabb,
}

impl Face {
    pub(crate) fn placeholder() -> Self {
        Self {
            first_edge: HalfEdgeId::INVALID,
            num_edges: 0,
            normal: Vector::z_axis(),
            centroid: Point::origin(),
            aabb: Aabb::new_invalid(),
        }
    }

    /// One half-edge of the boundary of this face.
    #[inline]
    pub fn first_edge(&self) -> HalfEdgeId {
        self.first_edge
    }

    /// The number of edges (and vertices) of this face.
    #[inline]
    pub fn number_of_edges(&self) -> usize {
        self.num_edges
    }

    /// The outward unit normal of this face.
    #[inline]
    pub fn normal(&self) -> &UnitVector<Real> {
        &self.normal
    }

    /// The average of the vertices of this face.
    #[inline]
    pub fn centroid(&self) -> &Point<Real> {
        &self.centroid
    }

    /// The bounding box of this face.
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// Signed distance from the plane of this face to `point`, positive on the outer side.
    #[inline]
    pub fn signed_distance(&self, point: &Point<Real>) -> Real {
        self.normal.dot(&(point - self.centroid))
    }

    /// Can this face be seen from `point`, i.e., is `point` more than `epsilon` above it?
    #[inline]
    pub fn can_see_point(&self, point: &Point<Real>, epsilon: Real) -> bool {
        self.signed_distance(point) > epsilon
    }

    /// The support value of this face plane along `dir`.
    #[inline]
    pub(crate) fn normal_dot(&self, dir: &Vector<Real>) -> Real {
        self.normal.dot(dir)
    }
}
