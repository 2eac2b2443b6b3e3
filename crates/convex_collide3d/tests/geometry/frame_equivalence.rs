use super::random_shapes;
use convex_collide3d::frame::{FrameEpa, FrameId, FrameShape, FrameTree};
use convex_collide3d::math::{Isometry, Real};
use convex_collide3d::query::epa::ExpandingPolytopeAlgorithm;
use convex_collide3d::query::{CollisionDetector, CollisionResult};
use convex_collide3d::shape::{Ball, Shape};
use oorandom::Rand64;

const NUM_CASES: usize = 100;

// Frame conversions reorder floating point operations: results near a contact may flip.
const TOUCHING_THRESHOLD: Real = 1.0e-3;

struct Frames {
    tree: FrameTree,
    parent: FrameId,
    child: FrameId,
}

fn random_frames(rng: &mut Rand64) -> Frames {
    let mut tree = FrameTree::new();
    let parent = tree
        .add_frame(FrameId::WORLD, random_shapes::isometry(rng, 5.0))
        .unwrap();
    let child = tree
        .add_frame(parent, random_shapes::isometry(rng, 5.0))
        .unwrap();

    Frames {
        tree,
        parent,
        child,
    }
}

fn random_ball(rng: &mut Rand64) -> Box<dyn Shape> {
    Box::new(Ball::new(random_shapes::uniform(rng, 0.2, 1.0)))
}

fn random_polytope(rng: &mut Rand64) -> Box<dyn Shape> {
    Box::new(random_shapes::polytope(rng))
}

fn assert_equivalent(expected: &CollisionResult, actual: &CollisionResult) {
    if expected.signed_distance.abs() < TOUCHING_THRESHOLD {
        return;
    }

    assert_eq!(expected.colliding, actual.colliding);
    assert_eq!(expected.shape_a, actual.shape_a);
    assert_eq!(expected.shape_b, actual.shape_b);
    assert_eq!(actual.frame, Some(FrameId::WORLD));

    if expected.colliding {
        assert!(
            (expected.signed_distance - actual.signed_distance).abs() < 1.0e-2,
            "{:?} != {:?}",
            expected,
            actual
        );
    } else {
        assert!(
            (expected.signed_distance - actual.signed_distance).abs() < 1.0e-6,
            "{:?} != {:?}",
            expected,
            actual
        );
        assert!((expected.normal_on_a - actual.normal_on_a).norm() < 1.0e-3);
        assert!((actual.normal_on_a + actual.normal_on_b).norm() < 1.0e-9);

        let gap = actual.point_on_b - actual.point_on_a;
        assert!((gap.norm() - actual.signed_distance).abs() < 1.0e-6);
    }
}

/// Places `shape_a` in `frame_a` and `shape_b` in `frame_b`, then checks the frame-aware
/// query against the same query with both shapes posed in the world frame.
fn check_frames(
    rng: &mut Rand64,
    make_a: fn(&mut Rand64) -> Box<dyn Shape>,
    make_b: fn(&mut Rand64) -> Box<dyn Shape>,
    pick_frames: fn(&Frames) -> (FrameId, FrameId),
) {
    let mut direct = ExpandingPolytopeAlgorithm::new();
    let mut detector = FrameEpa::default();
    detector.set_reporting_frame(Some(FrameId::WORLD));

    for _ in 0..NUM_CASES {
        let frames = random_frames(rng);
        let (frame_a, frame_b) = pick_frames(&frames);
        let shape_a = make_a(rng);
        let shape_b = make_b(rng);

        // Keep both shapes close to each other in world space.
        let world_a = random_shapes::isometry(rng, 1.0);
        let world_b = random_shapes::isometry(rng, 1.0);
        let to_world_a = frames.tree.transform_to_world(frame_a).unwrap();
        let to_world_b = frames.tree.transform_to_world(frame_b).unwrap();
        let pose_a: Isometry<Real> = to_world_a.inv_mul(&world_a);
        let pose_b: Isometry<Real> = to_world_b.inv_mul(&world_b);

        let expected = direct.evaluate_collision(&world_a, &*shape_a, &world_b, &*shape_b);
        let actual = detector
            .evaluate_collision(
                &frames.tree,
                &FrameShape::new(frame_a, pose_a, &*shape_a),
                &FrameShape::new(frame_b, pose_b, &*shape_b),
            )
            .unwrap();

        assert_equivalent(&expected, &actual);
    }
}

fn world_frames(_: &Frames) -> (FrameId, FrameId) {
    (FrameId::WORLD, FrameId::WORLD)
}

fn shared_frame(frames: &Frames) -> (FrameId, FrameId) {
    (frames.child, frames.child)
}

fn distinct_frames(frames: &Frames) -> (FrameId, FrameId) {
    (frames.child, frames.parent)
}

#[test]
fn both_shapes_in_the_world_frame() {
    let mut rng = Rand64::new(20);
    check_frames(&mut rng, random_shapes::shape, random_shapes::shape, world_frames);
}

#[test]
fn both_shapes_in_a_shared_frame() {
    let mut rng = Rand64::new(21);
    check_frames(&mut rng, random_shapes::shape, random_shapes::shape, shared_frame);
}

#[test]
fn primitives_in_distinct_frames() {
    let mut rng = Rand64::new(22);
    check_frames(&mut rng, random_ball, random_ball, distinct_frames);
}

#[test]
fn primitive_and_polytope_in_distinct_frames() {
    let mut rng = Rand64::new(23);
    check_frames(&mut rng, random_ball, random_polytope, distinct_frames);
    check_frames(&mut rng, random_polytope, random_ball, distinct_frames);
}

#[test]
fn polytopes_in_distinct_frames() {
    let mut rng = Rand64::new(24);
    check_frames(&mut rng, random_polytope, random_polytope, distinct_frames);
}

#[test]
fn mixed_shapes_in_distinct_frames() {
    let mut rng = Rand64::new(25);
    check_frames(&mut rng, random_shapes::shape, random_shapes::shape, distinct_frames);
}

#[test]
fn swapped_queries_are_tracked() {
    let mut rng = Rand64::new(26);
    let frames = random_frames(&mut rng);
    let ball = Ball::new(0.5);
    let polytope = random_shapes::polytope(&mut rng);
    let mut detector = FrameEpa::default();

    let a = FrameShape::new(frames.child, Isometry::identity(), &ball);
    let b = FrameShape::new(frames.parent, Isometry::identity(), &polytope);

    let result = detector.evaluate_collision(&frames.tree, &a, &b).unwrap();
    assert!(detector.swapped_last_query());
    assert_eq!(result.frame, Some(frames.child));
    assert_eq!(result.shape_a, Some(ball.shape_type()));

    let _ = detector.evaluate_collision(&frames.tree, &b, &a).unwrap();
    assert!(!detector.swapped_last_query());
}
