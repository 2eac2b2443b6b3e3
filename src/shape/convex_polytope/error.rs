use super::{FaceId, HalfEdgeId, VertexId};

/// Structural defects detected by [`ConvexPolytope::validate`](super::ConvexPolytope::validate).
///
/// A polytope built exclusively through [`ConvexPolytope::add_vertex`](super::ConvexPolytope::add_vertex)
/// never reports any of these. They indicate the half-edge graph was corrupted, after which
/// every geometric query on the polytope is meaningless.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Copy, Clone)]
pub enum PolytopeError {
    /// A half-edge, vertex or face refers to an element that doesn't exist.
    #[error("Half-edge {0:?} refers to a removed or unknown element")]
    DanglingReference(HalfEdgeId),

    /// A half-edge and its twin don't have reversed endpoints.
    #[error("Half-edge {0:?} and its twin don't have reversed endpoints")]
    TwinMismatch(HalfEdgeId),

    /// The `next`/`prev` links of a half-edge aren't consistent with its endpoints or face.
    #[error("Half-edge {0:?} has inconsistent next/previous links")]
    BrokenEdgeCycle(HalfEdgeId),

    /// Walking the boundary of a face doesn't return to its first edge after
    /// `number_of_edges` steps.
    #[error("Face {face:?} is expected to have {expected} edges but its cycle has {found}")]
    FaceCycleLength {
        /// The faulty face.
        face: FaceId,
        /// The number of edges recorded on the face.
        expected: usize,
        /// The number of steps before the cycle closed (or gave up).
        found: usize,
    },

    /// A vertex lists an outgoing half-edge that doesn't start at it.
    #[error("Vertex {0:?} lists an outgoing half-edge that doesn't originate from it")]
    VertexEdgeMismatch(VertexId),
}
