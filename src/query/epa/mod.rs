//! The EPA algorithm for penetration depth computation.

pub use self::epa3::{closest_points, EpaOptions, EpaWorkspace, Penetration};
pub use self::expanding_polytope_algorithm::ExpandingPolytopeAlgorithm;

mod epa3;
mod expanding_polytope_algorithm;
