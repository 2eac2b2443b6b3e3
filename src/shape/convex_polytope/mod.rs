//! Convex polytope stored as a doubly-connected edge list.

pub use self::convex_polytope::{ConvexPolytope, FaceEdges, DEFAULT_CONSTRUCTION_EPSILON};
pub use self::error::PolytopeError;
pub use self::topology::{Face, FaceId, HalfEdge, HalfEdgeId, Vertex, VertexId};

mod construction;
mod convex_polytope;
mod error;
mod topology;
