//! The GJK algorithm for distance computation and intersection tests.

pub use self::cso_point::CSOPoint;
pub use self::gjk::{closest_points, GJKResult, GjkOptions, GjkWorkspace};
pub use self::gjk_collision_detector::GjkCollisionDetector;
pub use self::simplex::GjkSimplex;
pub use self::special_support_maps::*;

mod cso_point;
mod gjk;
mod gjk_collision_detector;
mod simplex;
mod special_support_maps;
