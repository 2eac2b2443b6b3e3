//! Bounding volumes.
//!
//! Besides the [`Aabb`], this module provides sphere-torus-patch (STP) bounding volumes:
//! rounded versions of sharp convex shapes whose surface stays between a minimum and a
//! maximum margin away from the wrapped shape. Their smooth support functions make GJK and
//! EPA better conditioned near edges and vertices.

#[doc(inline)]
pub use crate::bounding_volume::aabb::Aabb;
pub use crate::bounding_volume::stp::{StpMargins, StpRadii};
pub use crate::bounding_volume::stp_capsule::StpCapsule;
pub use crate::bounding_volume::stp_convex_polytope::StpConvexPolytope;
pub use crate::bounding_volume::stp_cuboid::StpCuboid;
pub use crate::bounding_volume::stp_cylinder::StpCylinder;
pub use crate::bounding_volume::stp_ramp::StpRamp;

#[doc(hidden)]
pub mod aabb;
pub(crate) mod aabb_utils;
mod stp;
mod stp_capsule;
mod stp_convex_polytope;
mod stp_cuboid;
mod stp_cylinder;
mod stp_ramp;
