use crate::frame::{FrameError, FrameId, FrameTransforms};
use crate::math::{Isometry, Real, Vector};
use crate::query::epa::ExpandingPolytopeAlgorithm;
use crate::query::gjk::GjkCollisionDetector;
use crate::query::{CollisionDetector, CollisionResult};
use crate::shape::{ConvexPolytope, Shape};

/// A shape placed by `pose` in the coordinate frame `frame`.
#[derive(Copy, Clone)]
pub struct FrameShape<'a> {
    /// The frame `pose` is expressed in.
    pub frame: FrameId,
    /// The position of the shape in `frame`.
    pub pose: Isometry<Real>,
    /// The shape, in its local frame.
    pub shape: &'a dyn Shape,
}

impl<'a> FrameShape<'a> {
    /// Places `shape` by `pose` in `frame`.
    pub fn new(frame: FrameId, pose: Isometry<Real>, shape: &'a dyn Shape) -> Self {
        Self { frame, pose, shape }
    }
}

/// Runs a frame-aware query with GJK.
pub type FrameGjk = FrameCollisionDetector<GjkCollisionDetector>;
/// Runs a frame-aware query with GJK and EPA.
pub type FrameEpa = FrameCollisionDetector<ExpandingPolytopeAlgorithm>;

/// Collision detection between shapes expressed in distinct frames.
///
/// Before delegating to the wrapped detector, both shapes are brought into a common
/// frame:
/// * shapes sharing a frame are given to the detector as they are;
/// * a primitive shape is moved by composing its pose with the transform between the
///   frames;
/// * a non-primitive shape is left untouched when the other one is primitive, which may
///   swap the operands internally;
/// * when both shapes are non-primitive, a transformed copy of the second one is built in
///   a buffer owned by this detector and reused by subsequent queries.
///
/// The result is then expressed in the reporting frame, which is the frame of the first
/// shape unless set with [`Self::set_reporting_frame`], and tagged with it.
#[derive(Clone, Debug, Default)]
pub struct FrameCollisionDetector<D> {
    detector: D,
    reporting_frame: Option<FrameId>,
    initial_direction: Option<Vector<Real>>,
    polytope_buffer: ConvexPolytope,
    swapped: bool,
}

impl<D: CollisionDetector> FrameCollisionDetector<D> {
    /// Wraps `detector`.
    pub fn new(detector: D) -> Self {
        Self {
            detector,
            reporting_frame: None,
            initial_direction: None,
            polytope_buffer: ConvexPolytope::new(),
            swapped: false,
        }
    }

    /// The wrapped detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// The wrapped detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Expresses the results of subsequent queries in `frame` instead of the frame of their
    /// first shape.
    pub fn set_reporting_frame(&mut self, frame: Option<FrameId>) {
        self.reporting_frame = frame;
    }

    /// Sets the first search direction of the next query only.
    ///
    /// The direction points from the first shape toward the second and is expressed in
    /// the frame of the first shape.
    pub fn set_initial_support_direction(&mut self, dir: Vector<Real>) {
        self.initial_direction = Some(dir);
    }

    /// Were the operands of the last query exchanged before delegating?
    pub fn swapped_last_query(&self) -> bool {
        self.swapped
    }

    /// The number of iterations performed by the last query.
    pub fn number_of_iterations(&self) -> usize {
        self.detector.number_of_iterations()
    }

    /// Computes the collision between `a` and `b` into a new result.
    pub fn evaluate_collision(
        &mut self,
        frames: &dyn FrameTransforms,
        a: &FrameShape,
        b: &FrameShape,
    ) -> Result<CollisionResult, FrameError> {
        let mut result = CollisionResult::new();
        let _ = self.evaluate_collision_into(frames, a, b, &mut result)?;
        Ok(result)
    }

    /// Computes the collision between `a` and `b`, overwriting `result`.
    ///
    /// Returns whether the shapes are colliding, or an error if a frame is unknown to
    /// `frames`. `result` is left untouched on error.
    pub fn evaluate_collision_into(
        &mut self,
        frames: &dyn FrameTransforms,
        a: &FrameShape,
        b: &FrameShape,
        result: &mut CollisionResult,
    ) -> Result<bool, FrameError> {
        let reporting_frame = self.reporting_frame.unwrap_or(a.frame);
        let hint = self.initial_direction.take();
        self.swapped = false;

        // The frame the detector works in.
        let query_frame;

        if a.frame == b.frame {
            query_frame = a.frame;
            let to_reporting = frames.try_transform_between(query_frame, reporting_frame)?;
            if let Some(dir) = hint {
                self.detector.set_initial_support_direction(dir);
            }
            let _ = self.detector.evaluate_collision_into(
                &a.pose, a.shape, &b.pose, b.shape, result,
            );
            result.transform_by(&to_reporting);
        } else if b.shape.is_primitive() || !a.shape.is_primitive() {
            query_frame = a.frame;
            let b_to_a = frames.try_transform_between(b.frame, a.frame)?;
            let to_reporting = frames.try_transform_between(query_frame, reporting_frame)?;
            if let Some(dir) = hint {
                self.detector.set_initial_support_direction(dir);
            }

            match b.shape.as_convex_polytope() {
                Some(polytope) if !a.shape.is_primitive() => {
                    // Neither shape is cheap to move: bring a copy of the second one into
                    // the frame of the first.
                    self.polytope_buffer
                        .set_transformed(polytope, &(b_to_a * b.pose));
                    let _ = self.detector.evaluate_collision_into(
                        &a.pose,
                        a.shape,
                        &Isometry::identity(),
                        &self.polytope_buffer,
                        result,
                    );
                }
                _ => {
                    let _ = self.detector.evaluate_collision_into(
                        &a.pose,
                        a.shape,
                        &(b_to_a * b.pose),
                        b.shape,
                        result,
                    );
                }
            }

            result.transform_by(&to_reporting);
        } else {
            // `a` is primitive and `b` isn't: leave `b` in its frame.
            query_frame = b.frame;
            let a_to_b = frames.try_transform_between(a.frame, b.frame)?;
            let to_reporting = frames.try_transform_between(query_frame, reporting_frame)?;
            if let Some(dir) = hint {
                self.detector.set_initial_support_direction(-(a_to_b * dir));
            }
            self.swapped = true;
            let _ = self.detector.evaluate_collision_into(
                &b.pose,
                b.shape,
                &(a_to_b * a.pose),
                a.shape,
                result,
            );
            result.swap_shapes();
            result.transform_by(&to_reporting);
        }

        result.frame = Some(reporting_frame);
        Ok(result.colliding)
    }
}
