//! Collision queries between convex shapes.
//!
//! * [`gjk::GjkCollisionDetector`] tells whether two shapes intersect and computes their
//!   distance and closest points when they don't.
//! * [`epa::ExpandingPolytopeAlgorithm`] also computes the penetration depth of intersecting
//!   shapes.
//!
//! Both implement [`CollisionDetector`] and fill a [`CollisionResult`] in place.

pub use self::collision_detector::CollisionDetector;
pub use self::collision_result::CollisionResult;

mod collision_detector;
mod collision_result;
pub mod epa;
pub mod gjk;
