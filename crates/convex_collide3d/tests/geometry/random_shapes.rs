// Seeded generators shared by the randomized tests.

use convex_collide3d::bounding_volume::{StpConvexPolytope, StpCuboid, StpCylinder, StpMargins};
use convex_collide3d::math::{Isometry, Point, Real, Vector};
use convex_collide3d::shape::{
    Ball, Capsule, ConvexPolytope, Cuboid, Cylinder, Ramp, Shape,
};
use oorandom::Rand64;

pub fn uniform(rng: &mut Rand64, min: Real, max: Real) -> Real {
    min + (max - min) * rng.rand_float()
}

pub fn vector(rng: &mut Rand64, scale: Real) -> Vector<Real> {
    Vector::new(
        uniform(rng, -scale, scale),
        uniform(rng, -scale, scale),
        uniform(rng, -scale, scale),
    )
}

pub fn isometry(rng: &mut Rand64, translation: Real) -> Isometry<Real> {
    Isometry::new(vector(rng, translation), vector(rng, core::f64::consts::PI))
}

pub fn point_cloud(rng: &mut Rand64, len: usize, scale: Real) -> Vec<Point<Real>> {
    (0..len).map(|_| Point::from(vector(rng, scale))).collect()
}

pub fn polytope(rng: &mut Rand64) -> ConvexPolytope {
    loop {
        let polytope = ConvexPolytope::from_points(&point_cloud(rng, 12, 1.0));
        if polytope.volume() > 0.05 {
            return polytope;
        }
    }
}

/// Shapes made of flat faces only, whose penetration depth EPA computes exactly.
pub fn polyhedral_shape(rng: &mut Rand64) -> Box<dyn Shape> {
    match rng.rand_range(0..3) {
        0 => Box::new(Cuboid::new(Vector::new(
            uniform(rng, 0.2, 1.0),
            uniform(rng, 0.2, 1.0),
            uniform(rng, 0.2, 1.0),
        ))),
        1 => Box::new(Ramp::new(Vector::new(
            uniform(rng, 0.5, 1.5),
            uniform(rng, 0.5, 1.5),
            uniform(rng, 0.5, 1.5),
        ))),
        _ => Box::new(polytope(rng)),
    }
}

pub fn shape(rng: &mut Rand64) -> Box<dyn Shape> {
    let margins = StpMargins::new(0.01, 0.05);

    match rng.rand_range(0..8) {
        0 => Box::new(Ball::new(uniform(rng, 0.2, 1.0))),
        1 => Box::new(Capsule::new_y(uniform(rng, 0.2, 1.0), uniform(rng, 0.2, 0.6))),
        2 => Box::new(Cylinder::new(uniform(rng, 0.2, 1.0), uniform(rng, 0.2, 1.0))),
        3 => Box::new(StpCuboid::new(
            Cuboid::new(Vector::new(
                uniform(rng, 0.2, 1.0),
                uniform(rng, 0.2, 1.0),
                uniform(rng, 0.2, 1.0),
            )),
            margins,
        )),
        4 => Box::new(StpCylinder::new(
            Cylinder::new(uniform(rng, 0.2, 1.0), uniform(rng, 0.2, 1.0)),
            margins,
        )),
        5 => Box::new(StpConvexPolytope::new(polytope(rng), margins)),
        _ => polyhedral_shape(rng),
    }
}
