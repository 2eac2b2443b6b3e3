//! Shapes supported by this crate.

pub use self::ball::Ball;
pub use self::capsule::Capsule;
pub use self::convex_polytope::{
    ConvexPolytope, Face, FaceEdges, FaceId, HalfEdge, HalfEdgeId, PolytopeError, Vertex,
    VertexId, DEFAULT_CONSTRUCTION_EPSILON,
};
pub use self::cuboid::Cuboid;
pub use self::cylinder::Cylinder;
pub use self::ellipsoid::Ellipsoid;
pub use self::ramp::Ramp;
pub use self::segment::Segment;
#[doc(inline)]
pub use self::shape::{Shape, ShapeType, TypedShape};
#[doc(inline)]
pub use self::support_map::SupportMap;

pub(crate) use self::support_map::unit_or_x;

mod ball;
mod capsule;
pub mod convex_polytope;
mod cuboid;
mod cylinder;
mod ellipsoid;
mod ramp;
mod segment;
mod shape;
mod support_map;
