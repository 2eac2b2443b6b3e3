use approx::assert_relative_eq;
use convex_collide3d::math::{Isometry, Point, Vector};
use convex_collide3d::query::epa::ExpandingPolytopeAlgorithm;
use convex_collide3d::query::gjk::{
    self, ConstantPoint, GJKResult, GjkCollisionDetector, GjkOptions, GjkWorkspace,
};
use convex_collide3d::query::{CollisionDetector, CollisionResult};
use convex_collide3d::shape::{Ball, ConvexPolytope, Cuboid, ShapeType};

#[test]
fn disjoint_balls() {
    let ball = Ball::new(1.0);
    let mut detector = ExpandingPolytopeAlgorithm::new();
    let result = detector.evaluate_collision(
        &Isometry::identity(),
        &ball,
        &Isometry::translation(3.0, 0.0, 0.0),
        &ball,
    );

    assert!(!result.colliding);
    assert_relative_eq!(result.signed_distance, 1.0, epsilon = 1.0e-9);
    assert_relative_eq!(result.point_on_a, Point::new(1.0, 0.0, 0.0), epsilon = 1.0e-6);
    assert_relative_eq!(result.point_on_b, Point::new(2.0, 0.0, 0.0), epsilon = 1.0e-6);
    assert_relative_eq!(result.normal_on_a, Vector::x(), epsilon = 1.0e-6);
    assert_relative_eq!(result.normal_on_b, -Vector::x(), epsilon = 1.0e-6);
    assert_eq!(result.shape_a, Some(ShapeType::Ball));
    assert_eq!(result.shape_b, Some(ShapeType::Ball));
}

#[test]
fn cuboid_and_ball_above() {
    let cuboid = Cuboid::new(Vector::repeat(1.0));
    let ball = Ball::new(1.0);
    let mut detector = ExpandingPolytopeAlgorithm::new();
    let result = detector.evaluate_collision(
        &Isometry::identity(),
        &cuboid,
        &Isometry::translation(0.0, 0.0, 3.0),
        &ball,
    );

    assert!(!result.colliding);
    assert_relative_eq!(result.distance(), 1.0, epsilon = 1.0e-9);
    assert_relative_eq!(result.point_on_a.z, 1.0, epsilon = 1.0e-9);
    assert_relative_eq!(result.point_on_b, Point::new(0.0, 0.0, 2.0), epsilon = 1.0e-6);
}

#[test]
fn overlapping_balls() {
    let ball = Ball::new(1.0);
    let mut detector = ExpandingPolytopeAlgorithm::new();
    let result = detector.evaluate_collision(
        &Isometry::identity(),
        &ball,
        &Isometry::translation(1.0, 0.0, 0.0),
        &ball,
    );

    assert!(result.colliding);
    assert_relative_eq!(result.depth(), 1.0, epsilon = 1.0e-3);
    assert_relative_eq!(result.signed_distance, -result.depth());
    assert_relative_eq!(result.normal_on_a, Vector::x(), epsilon = 1.0e-2);
    assert_relative_eq!(result.normal_on_b, -result.normal_on_a);
}

#[test]
fn gjk_reports_intersection_without_depth() {
    let cuboid = Cuboid::new(Vector::repeat(1.0));
    let mut detector = GjkCollisionDetector::new();
    let result = detector.evaluate_collision(
        &Isometry::identity(),
        &cuboid,
        &Isometry::translation(0.5, 0.5, 0.0),
        &cuboid,
    );

    assert!(result.colliding);
    assert!(result.signed_distance.is_nan());
    assert!(result.depth().is_nan());
    assert!(detector.workspace().number_of_iterations() > 0);
}

#[test]
fn penetrating_cuboids() {
    let cuboid = Cuboid::new(Vector::new(2.0, 1.0, 1.0));
    let mut detector = ExpandingPolytopeAlgorithm::new();
    let result = detector.evaluate_collision(
        &Isometry::translation(3.5, 0.0, 0.0),
        &cuboid,
        &Isometry::identity(),
        &cuboid,
    );

    assert!(result.colliding);
    assert_relative_eq!(result.signed_distance, -0.5, epsilon = 1.0e-9);
    assert_relative_eq!(result.normal_on_a, -Vector::x(), epsilon = 1.0e-9);
    assert_relative_eq!(result.point_on_a.x, 1.5, epsilon = 1.0e-9);
    assert_relative_eq!(result.point_on_b.x, 2.0, epsilon = 1.0e-9);
}

#[test]
fn touching_polytopes_are_not_colliding() {
    let polytope = ConvexPolytope::from_cuboid(&Cuboid::new(Vector::repeat(1.0)));
    let mut detector = ExpandingPolytopeAlgorithm::new();
    let result = detector.evaluate_collision(
        &Isometry::identity(),
        &polytope,
        &Isometry::translation(2.0, 0.5, 0.0),
        &polytope,
    );

    assert!(result.distance().abs() <= 1.0e-9);
    assert!(result.depth() <= 1.0e-9);
}

#[test]
fn empty_polytope_yields_sentinel() {
    let empty = ConvexPolytope::new();
    let ball = Ball::new(1.0);
    let mut detector = ExpandingPolytopeAlgorithm::new();
    let mut result = CollisionResult::new();

    let colliding = detector.evaluate_collision_into(
        &Isometry::identity(),
        &empty,
        &Isometry::identity(),
        &ball,
        &mut result,
    );

    assert!(!colliding);
    assert!(result.contains_nan());
    assert_eq!(result.shape_a, Some(ShapeType::ConvexPolytope));
    assert_eq!(detector.number_of_iterations(), 0);
}

#[test]
fn initial_direction_hint_does_not_change_the_result() {
    let cuboid = Cuboid::new(Vector::new(1.0, 0.5, 0.25));
    let pos_b = Isometry::new(Vector::new(1.0, 2.5, -0.5), Vector::new(0.3, 0.2, 0.1));
    let mut detector = ExpandingPolytopeAlgorithm::new();

    let reference = detector.evaluate_collision(&Isometry::identity(), &cuboid, &pos_b, &cuboid);
    detector.set_initial_support_direction(Vector::new(0.0, 1.0, 0.0));
    let hinted = detector.evaluate_collision(&Isometry::identity(), &cuboid, &pos_b, &cuboid);

    assert!(!reference.colliding);
    assert_relative_eq!(
        reference.signed_distance,
        hinted.signed_distance,
        epsilon = 1.0e-9
    );
    assert_relative_eq!(reference.normal_on_a, hinted.normal_on_a, epsilon = 1.0e-6);
}

#[test]
fn ball_against_point() {
    let ball = Ball::new(1.5);
    let point = ConstantPoint(Point::new(0.0, 4.0, 0.0));
    let mut workspace = GjkWorkspace::new();

    let res = gjk::closest_points(
        &Isometry::identity(),
        &ball,
        &point,
        &Vector::y(),
        &GjkOptions::default(),
        &mut workspace,
    );

    match res {
        GJKResult::ClosestPoints(p1, p2, normal) => {
            assert_relative_eq!(p1.y, 1.5, epsilon = 1.0e-9);
            assert_relative_eq!(p2, Point::new(0.0, 4.0, 0.0), epsilon = 1.0e-9);
            assert_relative_eq!(*normal, Vector::y(), epsilon = 1.0e-9);
        }
        GJKResult::Intersection => panic!("The point is outside of the ball."),
    }
}
