use super::random_shapes;
use approx::assert_relative_eq;
use convex_collide3d::math::{Point, Real, Vector};
use convex_collide3d::shape::{ConvexPolytope, Cuboid, Ramp, SupportMap};
use oorandom::Rand64;

fn assert_twins_and_cycles(polytope: &ConvexPolytope) {
    for (id, edge) in polytope.half_edges() {
        let twin = polytope.half_edge(edge.twin()).unwrap();
        assert_eq!(twin.twin(), id);
        assert_eq!(twin.origin(), edge.destination());
        assert_eq!(twin.destination(), edge.origin());
        assert_ne!(twin.face(), edge.face());

        let next = polytope.half_edge(edge.next()).unwrap();
        assert_eq!(next.prev(), id);
        assert_eq!(next.origin(), edge.destination());
    }

    for (id, face) in polytope.faces() {
        let cycle: Vec<_> = polytope.face_edges(id).collect();
        assert_eq!(cycle.len(), face.number_of_edges());
        assert!(cycle.len() >= 3);
        assert!(cycle
            .iter()
            .all(|e| polytope.half_edge(*e).unwrap().face() == id));
    }
}

#[test]
fn every_insertion_keeps_a_valid_graph() {
    let mut rng = Rand64::new(7);

    for _ in 0..20 {
        let mut polytope = ConvexPolytope::new();

        for pt in random_shapes::point_cloud(&mut rng, 40, 1.0) {
            let _ = polytope.add_vertex(pt);
            polytope.validate().unwrap();
            assert_twins_and_cycles(&polytope);
        }

        assert!(!polytope.is_flat());
        assert!(polytope.volume() > 0.0);
    }
}

#[test]
fn growth_from_a_point_to_a_solid() {
    let mut polytope = ConvexPolytope::new();
    assert!(polytope.is_empty());

    let _ = polytope.add_vertex(Point::new(0.0, 0.0, 0.0)).unwrap();
    assert_eq!((polytope.num_vertices(), polytope.num_faces()), (1, 0));

    let _ = polytope.add_vertex(Point::new(1.0, 0.0, 0.0)).unwrap();
    assert_eq!((polytope.num_vertices(), polytope.num_faces()), (2, 0));

    // A third point on the segment's line is only kept if it extends it.
    assert!(polytope.add_vertex(Point::new(0.25, 0.0, 0.0)).is_none());

    let _ = polytope.add_vertex(Point::new(0.0, 1.0, 0.0)).unwrap();
    assert!(polytope.is_flat());
    assert_eq!(polytope.num_faces(), 2);
    assert_twins_and_cycles(&polytope);

    let _ = polytope.add_vertex(Point::new(0.0, 0.0, 1.0)).unwrap();
    assert!(!polytope.is_flat());
    assert_eq!(polytope.num_faces(), 4);
    assert_eq!(polytope.num_half_edges(), 12);
    assert_relative_eq!(polytope.volume(), 1.0 / 6.0, epsilon = 1.0e-12);
    assert_twins_and_cycles(&polytope);
}

#[test]
fn rejected_points_leave_the_polytope_untouched() {
    let mut polytope = ConvexPolytope::from_cuboid(&Cuboid::new(Vector::repeat(1.0)));
    let before = polytope.clone();
    let eps = polytope.construction_epsilon();

    assert!(polytope.add_vertex(Point::origin()).is_none());
    assert!(polytope.add_vertex(Point::new(1.0, 1.0, 1.0)).is_none());
    assert!(polytope
        .add_vertex(Point::new(0.3, 0.2, 1.0 + eps * 0.5))
        .is_none());
    assert!(polytope
        .add_vertex(Point::new(Real::NAN, 0.0, 0.0))
        .is_none());

    assert_eq!(polytope.num_vertices(), before.num_vertices());
    assert_eq!(polytope.num_faces(), before.num_faces());
    assert_eq!(polytope.num_half_edges(), before.num_half_edges());
    assert_relative_eq!(polytope.volume(), before.volume());
}

#[test]
fn hull_contains_inserted_points_and_matches_their_support() {
    let mut rng = Rand64::new(8);
    let points = random_shapes::point_cloud(&mut rng, 100, 2.0);
    let polytope = ConvexPolytope::from_points(&points);

    assert!(points.iter().all(|pt| polytope.is_point_inside(pt, 1.0e-8)));

    for _ in 0..100 {
        let dir = random_shapes::vector(&mut rng, 1.0);
        let expected = points
            .iter()
            .map(|pt| pt.coords.dot(&dir))
            .fold(-Real::MAX, Real::max);
        let support = polytope.local_support_point(&dir);
        assert_relative_eq!(support.coords.dot(&dir), expected, epsilon = 1.0e-9);
    }
}

#[test]
fn ramp_polytope_has_five_faces() {
    let ramp = Ramp::new(Vector::new(2.0, 1.0, 3.0));
    let polytope = ConvexPolytope::from_ramp(&ramp);

    assert_eq!(polytope.num_vertices(), 6);
    assert_eq!(polytope.num_faces(), 5);
    assert_relative_eq!(polytope.volume(), 3.0, epsilon = 1.0e-12);
    assert_twins_and_cycles(&polytope);

    let mut rng = Rand64::new(9);
    for _ in 0..50 {
        let dir = random_shapes::vector(&mut rng, 1.0);
        assert_relative_eq!(
            polytope.local_support_point(&dir).coords.dot(&dir),
            ramp.local_support_point(&dir).coords.dot(&dir),
            epsilon = 1.0e-9
        );
    }
}

#[test]
fn clearing_allows_reuse() {
    let mut rng = Rand64::new(10);
    let mut polytope = random_shapes::polytope(&mut rng);

    polytope.clear();
    assert!(polytope.is_empty());
    assert_eq!(polytope.num_faces(), 0);
    assert_eq!(polytope.num_half_edges(), 0);
    polytope.validate().unwrap();

    for pt in random_shapes::point_cloud(&mut rng, 20, 1.0) {
        let _ = polytope.add_vertex(pt);
    }
    polytope.validate().unwrap();
    assert_twins_and_cycles(&polytope);
}
