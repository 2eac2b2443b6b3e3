use super::random_shapes;
use convex_collide3d::math::{Isometry, Real, Translation};
use convex_collide3d::query::epa::ExpandingPolytopeAlgorithm;
use convex_collide3d::query::{CollisionDetector, CollisionResult};
use convex_collide3d::shape::Shape;
use oorandom::Rand64;

const NUM_PAIRS: usize = 300;

// Results closer than this to a contact may legitimately disagree on the colliding flag.
const TOUCHING_THRESHOLD: Real = 1.0e-3;

struct Pair {
    shape_a: Box<dyn Shape>,
    pos_a: Isometry<Real>,
    shape_b: Box<dyn Shape>,
    pos_b: Isometry<Real>,
}

fn random_pair(rng: &mut Rand64, polyhedral: bool) -> Pair {
    let (shape_a, shape_b) = if polyhedral {
        (
            random_shapes::polyhedral_shape(rng),
            random_shapes::polyhedral_shape(rng),
        )
    } else {
        (random_shapes::shape(rng), random_shapes::shape(rng))
    };

    Pair {
        shape_a,
        pos_a: random_shapes::isometry(rng, 1.0),
        shape_b,
        pos_b: random_shapes::isometry(rng, 1.0),
    }
}

fn evaluate(detector: &mut ExpandingPolytopeAlgorithm, pair: &Pair) -> CollisionResult {
    detector.evaluate_collision(
        &pair.pos_a,
        &*pair.shape_a,
        &pair.pos_b,
        &*pair.shape_b,
    )
}

#[test]
fn symmetry() {
    let mut rng = Rand64::new(1);
    let mut detector = ExpandingPolytopeAlgorithm::new();

    for _ in 0..NUM_PAIRS {
        let pair = random_pair(&mut rng, false);
        let ab = evaluate(&mut detector, &pair);
        let ba = detector.evaluate_collision(
            &pair.pos_b,
            &*pair.shape_b,
            &pair.pos_a,
            &*pair.shape_a,
        );

        if ab.signed_distance.abs() < TOUCHING_THRESHOLD {
            continue;
        }

        assert_eq!(ab.colliding, ba.colliding);
        assert_eq!(ab.shape_a, ba.shape_b);

        if ab.colliding {
            assert!((ab.signed_distance - ba.signed_distance).abs() < 1.0e-2);
        } else {
            assert!((ab.signed_distance - ba.signed_distance).abs() < 1.0e-6);
            assert!((ab.normal_on_a - ba.normal_on_b).norm() < 1.0e-3);
        }
    }
}

#[test]
fn separation_consistency() {
    let mut rng = Rand64::new(2);
    let mut detector = ExpandingPolytopeAlgorithm::new();

    for _ in 0..NUM_PAIRS {
        let pair = random_pair(&mut rng, false);
        let result = evaluate(&mut detector, &pair);

        if result.colliding || result.signed_distance < TOUCHING_THRESHOLD {
            continue;
        }

        let diff = result.point_on_b - result.point_on_a;
        assert!((result.signed_distance - diff.norm()).abs() < 1.0e-9);
        assert!((result.normal_on_a.norm() - 1.0).abs() < 1.0e-9);
        assert!((result.normal_on_a + result.normal_on_b).norm() < 1.0e-9);
        assert!((diff.normalize() - result.normal_on_a).norm() < 1.0e-6);
    }
}

#[test]
fn penetration_consistency() {
    let mut rng = Rand64::new(3);
    let mut detector = ExpandingPolytopeAlgorithm::new();
    let mut num_tested = 0;

    for _ in 0..NUM_PAIRS {
        let pair = random_pair(&mut rng, true);
        let result = evaluate(&mut detector, &pair);

        if !result.colliding || result.depth() < TOUCHING_THRESHOLD {
            continue;
        }

        num_tested += 1;

        // Moving `b` by the penetration vector leaves the shapes exactly touching.
        let shift = Translation::from(result.normal_on_a * result.depth());
        let separated = Pair {
            pos_b: shift * pair.pos_b,
            ..pair
        };
        let touching = evaluate(&mut detector, &separated);

        assert!(touching.distance().abs() < 1.0e-6, "{:?}", touching);
        assert!(touching.depth() < 1.0e-6, "{:?}", touching);
    }

    assert!(num_tested > 0);
}

#[test]
fn idempotence() {
    let mut rng = Rand64::new(4);
    let mut detector = ExpandingPolytopeAlgorithm::new();
    let mut result = CollisionResult::new();

    for _ in 0..NUM_PAIRS {
        let pair = random_pair(&mut rng, false);
        let first = evaluate(&mut detector, &pair);

        // Leave some unrelated state in the detector and the result.
        let other = random_pair(&mut rng, false);
        let _ = detector.evaluate_collision_into(
            &other.pos_a,
            &*other.shape_a,
            &other.pos_b,
            &*other.shape_b,
            &mut result,
        );

        result.set_to_nan();
        let _ = detector.evaluate_collision_into(
            &pair.pos_a,
            &*pair.shape_a,
            &pair.pos_b,
            &*pair.shape_b,
            &mut result,
        );

        assert!(first.geometrically_equals(&result, 0.0, 0.0, 0.0));
        assert_eq!(first.colliding, result.colliding);
    }
}
