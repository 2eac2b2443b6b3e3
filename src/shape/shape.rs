use crate::bounding_volume::aabb_utils::local_support_map_aabb;
use crate::bounding_volume::{
    Aabb, StpCapsule, StpConvexPolytope, StpCuboid, StpCylinder, StpRamp,
};
use crate::math::{Isometry, Point, Real};
use crate::shape::{
    Ball, Capsule, ConvexPolytope, Cuboid, Cylinder, Ellipsoid, Ramp, Segment, SupportMap,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Enum representing the type of a shape.
pub enum ShapeType {
    /// A ball shape.
    Ball,
    /// A cuboid shape.
    Cuboid,
    /// A capsule shape.
    Capsule,
    /// A segment shape.
    Segment,
    /// A cylindrical shape.
    Cylinder,
    /// An ellipsoid shape.
    Ellipsoid,
    /// A ramp (triangular prism) shape.
    Ramp,
    /// A convex polytope stored as a half-edge mesh.
    ConvexPolytope,
    /// A cuboid rounded by sphere-torus patches.
    StpCuboid,
    /// A capsule rounded by sphere-torus patches.
    StpCapsule,
    /// A cylinder rounded by sphere-torus patches.
    StpCylinder,
    /// A ramp rounded by sphere-torus patches.
    StpRamp,
    /// A convex polytope rounded by sphere-torus patches.
    StpConvexPolytope,
}

#[derive(Copy, Clone, Debug)]
/// Enum representing the shape with its actual type
pub enum TypedShape<'a> {
    /// A ball shape.
    Ball(&'a Ball),
    /// A cuboid shape.
    Cuboid(&'a Cuboid),
    /// A capsule shape.
    Capsule(&'a Capsule),
    /// A segment shape.
    Segment(&'a Segment),
    /// A cylindrical shape.
    Cylinder(&'a Cylinder),
    /// An ellipsoid shape.
    Ellipsoid(&'a Ellipsoid),
    /// A ramp shape.
    Ramp(&'a Ramp),
    /// A convex polytope.
    ConvexPolytope(&'a ConvexPolytope),
    /// A cuboid rounded by sphere-torus patches.
    StpCuboid(&'a StpCuboid),
    /// A capsule rounded by sphere-torus patches.
    StpCapsule(&'a StpCapsule),
    /// A cylinder rounded by sphere-torus patches.
    StpCylinder(&'a StpCylinder),
    /// A ramp rounded by sphere-torus patches.
    StpRamp(&'a StpRamp),
    /// A convex polytope rounded by sphere-torus patches.
    StpConvexPolytope(&'a StpConvexPolytope),
}

/// Trait implemented by shapes usable by the collision detectors of this crate.
pub trait Shape: SupportMap + Send + Sync {
    /// Computes the AABB of this shape.
    fn compute_local_aabb(&self) -> Aabb;

    /// Computes the AABB of this shape with the given position.
    fn compute_aabb(&self, position: &Isometry<Real>) -> Aabb {
        self.compute_local_aabb().transform_by(position)
    }

    /// The point used as the default guess of this shape's location.
    fn local_centroid(&self) -> Point<Real>;

    /// Gets the type tag of this shape.
    fn shape_type(&self) -> ShapeType;

    /// Gets the underlying shape as an enum.
    fn as_typed_shape(&self) -> TypedShape<'_>;

    /// This shape seen as a support map.
    fn as_support_map(&self) -> &dyn SupportMap;

    /// Is this shape a fixed local geometry whose placement is cheap to compose with a
    /// rigid transform?
    ///
    /// Non-primitive shapes are meshes that frame-aware queries prefer to leave untouched.
    fn is_primitive(&self) -> bool {
        true
    }

    /// Does this shape have no geometry at all?
    fn is_empty(&self) -> bool {
        false
    }
}

impl<'a> dyn Shape + 'a {
    /// Converts this abstract shape to a ball, if it is one.
    pub fn as_ball(&self) -> Option<&Ball> {
        match self.as_typed_shape() {
            TypedShape::Ball(b) => Some(b),
            _ => None,
        }
    }

    /// Converts this abstract shape to a cuboid, if it is one.
    pub fn as_cuboid(&self) -> Option<&Cuboid> {
        match self.as_typed_shape() {
            TypedShape::Cuboid(c) => Some(c),
            _ => None,
        }
    }

    /// Converts this abstract shape to a capsule, if it is one.
    pub fn as_capsule(&self) -> Option<&Capsule> {
        match self.as_typed_shape() {
            TypedShape::Capsule(c) => Some(c),
            _ => None,
        }
    }

    /// Converts this abstract shape to a cylinder, if it is one.
    pub fn as_cylinder(&self) -> Option<&Cylinder> {
        match self.as_typed_shape() {
            TypedShape::Cylinder(c) => Some(c),
            _ => None,
        }
    }

    /// Converts this abstract shape to a ramp, if it is one.
    pub fn as_ramp(&self) -> Option<&Ramp> {
        match self.as_typed_shape() {
            TypedShape::Ramp(r) => Some(r),
            _ => None,
        }
    }

    /// Converts this abstract shape to a convex polytope, if it is one.
    pub fn as_convex_polytope(&self) -> Option<&ConvexPolytope> {
        match self.as_typed_shape() {
            TypedShape::ConvexPolytope(p) => Some(p),
            _ => None,
        }
    }
}

macro_rules! impl_primitive_shape(
    ($($t: ident => $centroid: expr;)*) => {$(
        impl Shape for $t {
            fn compute_local_aabb(&self) -> Aabb {
                local_support_map_aabb(self)
            }

            fn local_centroid(&self) -> Point<Real> {
                let centroid: fn(&$t) -> Point<Real> = $centroid;
                centroid(self)
            }

            fn shape_type(&self) -> ShapeType {
                ShapeType::$t
            }

            fn as_typed_shape(&self) -> TypedShape<'_> {
                TypedShape::$t(self)
            }

            fn as_support_map(&self) -> &dyn SupportMap {
                self
            }
        }
    )*}
);

impl_primitive_shape!(
    Ball => |_| Point::origin();
    Cuboid => |_| Point::origin();
    Capsule => |c| c.center();
    Segment => |s| s.center();
    Cylinder => |_| Point::origin();
    Ellipsoid => |_| Point::origin();
    Ramp => |r| r.centroid();
    StpCuboid => |s| s.cuboid().local_centroid();
    StpCapsule => |s| s.capsule().local_centroid();
    StpCylinder => |s| s.cylinder().local_centroid();
    StpRamp => |s| s.ramp().local_centroid();
);

impl Shape for ConvexPolytope {
    fn compute_local_aabb(&self) -> Aabb {
        *self.local_aabb()
    }

    fn local_centroid(&self) -> Point<Real> {
        *self.centroid()
    }

    fn shape_type(&self) -> ShapeType {
        ShapeType::ConvexPolytope
    }

    fn as_typed_shape(&self) -> TypedShape<'_> {
        TypedShape::ConvexPolytope(self)
    }

    fn as_support_map(&self) -> &dyn SupportMap {
        self
    }

    fn is_primitive(&self) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        ConvexPolytope::is_empty(self)
    }
}

impl Shape for StpConvexPolytope {
    fn compute_local_aabb(&self) -> Aabb {
        local_support_map_aabb(self)
    }

    fn local_centroid(&self) -> Point<Real> {
        *self.polytope().centroid()
    }

    fn shape_type(&self) -> ShapeType {
        ShapeType::StpConvexPolytope
    }

    fn as_typed_shape(&self) -> TypedShape<'_> {
        TypedShape::StpConvexPolytope(self)
    }

    fn as_support_map(&self) -> &dyn SupportMap {
        self
    }

    fn is_primitive(&self) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.polytope().is_empty()
    }
}
