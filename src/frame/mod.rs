//! Shapes expressed in distinct coordinate frames.
//!
//! A [`FrameTransforms`] implementation, such as [`FrameTree`], provides the rigid
//! transforms between frames. [`FrameCollisionDetector`] uses them to bring two
//! [`FrameShape`]s into a common frame before running a [`CollisionDetector`] on them.
//!
//! [`CollisionDetector`]: crate::query::CollisionDetector

pub use self::error::FrameError;
pub use self::frame_collision_detector::{
    FrameCollisionDetector, FrameEpa, FrameGjk, FrameShape,
};
pub use self::frame_tree::{FrameId, FrameTransforms, FrameTree};

mod error;
mod frame_collision_detector;
mod frame_tree;
