use super::random_shapes;
use approx::assert_relative_eq;
use convex_collide3d::bounding_volume::{
    StpCapsule, StpConvexPolytope, StpCuboid, StpCylinder, StpMargins, StpRadii, StpRamp,
};
use convex_collide3d::math::{Isometry, Point, Real, Vector};
use convex_collide3d::query::epa::ExpandingPolytopeAlgorithm;
use convex_collide3d::query::CollisionDetector;
use convex_collide3d::shape::{Capsule, ConvexPolytope, Cuboid, Cylinder, Ramp, SupportMap};
use oorandom::Rand64;

const MARGINS: StpMargins = StpMargins {
    min_margin: 0.01,
    max_margin: 0.05,
};

/// Checks that `stp` lies between the min and max margins away from `shape`, along many
/// random directions.
fn assert_within_margins(
    rng: &mut Rand64,
    shape: &dyn SupportMap,
    stp: &dyn SupportMap,
    radii: &StpRadii,
) {
    for _ in 0..500 {
        let dir = random_shapes::vector(rng, 1.0);
        if dir.norm() < 1.0e-3 {
            continue;
        }
        let dir = dir.normalize();

        let gap = stp.local_support_point(&dir).coords.dot(&dir)
            - shape.local_support_point(&dir).coords.dot(&dir);

        assert!(
            gap >= radii.min_margin() - 1.0e-9 && gap <= radii.max_margin() + 1.0e-9,
            "margin {} outside of [{}, {}] along {:?}",
            gap,
            radii.min_margin(),
            radii.max_margin(),
            dir
        );
    }
}

/// Checks that `stp` is the support map of a convex set: along any direction, its support
/// point is at least as far as the support point along any other direction.
fn assert_convex_support(rng: &mut Rand64, stp: &dyn SupportMap) {
    for i in 0..1000 {
        let dir1 = random_shapes::vector(rng, 1.0);
        // Half of the pairs are close to each other, where patches meet.
        let dir2 = if i % 2 == 0 {
            dir1 + random_shapes::vector(rng, 0.05)
        } else {
            random_shapes::vector(rng, 1.0)
        };
        if dir1.norm() < 1.0e-3 || dir2.norm() < 1.0e-3 {
            continue;
        }
        let (dir1, dir2) = (dir1.normalize(), dir2.normalize());

        let pt1 = stp.local_support_point(&dir1);
        let pt2 = stp.local_support_point(&dir2);

        assert!(
            pt1.coords.dot(&dir1) >= pt2.coords.dot(&dir1) - 1.0e-9,
            "support along {:?} is beaten by the support along {:?}",
            dir1,
            dir2
        );
        assert!(
            pt2.coords.dot(&dir2) >= pt1.coords.dot(&dir2) - 1.0e-9,
            "support along {:?} is beaten by the support along {:?}",
            dir2,
            dir1
        );
    }
}

fn cut_corner_cube(cut: Real) -> ConvexPolytope {
    let mut points: Vec<Point<Real>> = Cuboid::new(Vector::repeat(1.0))
        .vertices()
        .into_iter()
        .filter(|pt| *pt != Point::new(1.0, 1.0, 1.0))
        .collect();
    points.extend([
        Point::new(1.0 - cut, 1.0, 1.0),
        Point::new(1.0, 1.0 - cut, 1.0),
        Point::new(1.0, 1.0, 1.0 - cut),
    ]);
    ConvexPolytope::from_points(&points)
}

#[test]
fn stp_cuboid_margins() {
    let mut rng = Rand64::new(30);
    for _ in 0..10 {
        let cuboid = Cuboid::new(Vector::new(
            random_shapes::uniform(&mut rng, 0.2, 1.0),
            random_shapes::uniform(&mut rng, 0.2, 1.0),
            random_shapes::uniform(&mut rng, 0.2, 1.0),
        ));
        let stp = StpCuboid::new(cuboid, MARGINS);
        assert_within_margins(&mut rng, &cuboid, &stp, stp.radii());
    }
}

#[test]
fn stp_cylinder_margins() {
    let mut rng = Rand64::new(31);
    for _ in 0..10 {
        let cylinder = Cylinder::new(
            random_shapes::uniform(&mut rng, 0.2, 1.0),
            random_shapes::uniform(&mut rng, 0.2, 1.0),
        );
        let stp = StpCylinder::new(cylinder, MARGINS);
        assert_within_margins(&mut rng, &cylinder, &stp, stp.radii());
    }
}

#[test]
fn stp_capsule_margins() {
    let mut rng = Rand64::new(32);
    for _ in 0..10 {
        let capsule = Capsule::new(
            Point::from(random_shapes::vector(&mut rng, 1.0)),
            Point::from(random_shapes::vector(&mut rng, 1.0)),
            random_shapes::uniform(&mut rng, 0.1, 0.5),
        );
        let stp = StpCapsule::new(capsule, MARGINS);
        assert_within_margins(&mut rng, &capsule, &stp, stp.radii());
    }
}

#[test]
fn stp_ramp_margins() {
    let mut rng = Rand64::new(33);
    for _ in 0..10 {
        let ramp = Ramp::new(Vector::new(
            random_shapes::uniform(&mut rng, 0.5, 1.5),
            random_shapes::uniform(&mut rng, 0.5, 1.5),
            random_shapes::uniform(&mut rng, 0.5, 1.5),
        ));
        let stp = StpRamp::new(ramp, MARGINS);
        assert_within_margins(&mut rng, &ramp, &stp, stp.radii());
    }
}

#[test]
fn stp_convex_polytope_margins() {
    let mut rng = Rand64::new(34);
    for _ in 0..10 {
        let polytope = random_shapes::polytope(&mut rng);
        let stp = StpConvexPolytope::new(polytope.clone(), MARGINS);
        assert_within_margins(&mut rng, &polytope, &stp, stp.radii());
    }
}

#[test]
fn small_features_clamp_the_max_margin() {
    let mut rng = Rand64::new(35);
    let cuboid = Cuboid::new(Vector::repeat(0.01));
    let stp = StpCuboid::new(cuboid, MARGINS);

    assert_relative_eq!(stp.radii().min_margin(), MARGINS.min_margin);
    assert!(stp.radii().max_margin() < MARGINS.max_margin);
    assert!(stp.radii().max_margin() > stp.radii().min_margin());
    assert_within_margins(&mut rng, &cuboid, &stp, stp.radii());
}

#[test]
fn stp_bounding_volumes_in_collision_queries() {
    let cuboid = Cuboid::new(Vector::repeat(1.0));
    let stp = StpCuboid::new(cuboid, MARGINS);
    let stp_polytope = StpConvexPolytope::new(ConvexPolytope::from_cuboid(&cuboid), MARGINS);
    let bulge: Real = stp.radii().max_margin();
    let mut detector = ExpandingPolytopeAlgorithm::new();

    // The face spheres bulge the most at the center of the faces.
    let result = detector.evaluate_collision(
        &Isometry::identity(),
        &stp,
        &Isometry::translation(3.0, 0.0, 0.0),
        &stp_polytope,
    );
    assert!(!result.colliding);
    assert_relative_eq!(result.signed_distance, 1.0 - 2.0 * bulge, epsilon = 1.0e-6);
    assert_relative_eq!(result.normal_on_a, Vector::x(), epsilon = 1.0e-3);

    let result = detector.evaluate_collision(
        &Isometry::identity(),
        &stp,
        &Isometry::translation(2.0, 0.0, 0.0),
        &cuboid,
    );
    assert!(result.colliding);
    assert_relative_eq!(result.depth(), bulge, epsilon = 1.0e-3);
}

#[test]
fn stp_analytic_shapes_are_convex() {
    let mut rng = Rand64::new(36);
    for _ in 0..5 {
        let half_extents = random_shapes::vector(&mut rng, 1.0).abs() + Vector::repeat(0.2);
        assert_convex_support(&mut rng, &StpCuboid::new(Cuboid::new(half_extents), MARGINS));

        let cylinder = Cylinder::new(
            random_shapes::uniform(&mut rng, 0.2, 1.0),
            random_shapes::uniform(&mut rng, 0.2, 1.0),
        );
        assert_convex_support(&mut rng, &StpCylinder::new(cylinder, MARGINS));

        let capsule = Capsule::new(
            Point::from(random_shapes::vector(&mut rng, 1.0)),
            Point::from(random_shapes::vector(&mut rng, 1.0)),
            random_shapes::uniform(&mut rng, 0.1, 0.5),
        );
        assert_convex_support(&mut rng, &StpCapsule::new(capsule, MARGINS));

        let ramp = Ramp::new(random_shapes::vector(&mut rng, 1.0).abs() + Vector::repeat(0.5));
        assert_convex_support(&mut rng, &StpRamp::new(ramp, MARGINS));
    }
}

#[test]
fn stp_convex_polytopes_are_convex() {
    let mut rng = Rand64::new(37);

    // Random clouds give triangular faces, which are rarely acute.
    for _ in 0..10 {
        let polytope = random_shapes::polytope(&mut rng);
        let stp = StpConvexPolytope::new(polytope.clone(), MARGINS);
        assert_convex_support(&mut rng, &stp);
        assert_within_margins(&mut rng, &polytope, &stp, stp.radii());
    }

    // Pentagonal faces, which aren't cocircular.
    for cut in [0.1, 0.5, 1.2] {
        let polytope = cut_corner_cube(cut);
        let stp = StpConvexPolytope::new(polytope.clone(), MARGINS);
        assert_convex_support(&mut rng, &stp);
        assert_within_margins(&mut rng, &polytope, &stp, stp.radii());
    }

    // Right triangles.
    let ramp = ConvexPolytope::from_ramp(&Ramp::new(Vector::new(2.0, 1.0, 0.5)));
    let stp = StpConvexPolytope::new(ramp.clone(), MARGINS);
    assert_convex_support(&mut rng, &stp);
    assert_within_margins(&mut rng, &ramp, &stp, stp.radii());
}
