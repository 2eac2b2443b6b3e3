//! Various unsorted geometrical operators.

pub use self::ccw_face_normal::{ccw_face_normal, polygon_normal};
pub use self::point_cloud_support_point::{
    point_cloud_support_point, point_cloud_support_point_id,
};
pub(crate) use self::wops::{WBasis, WSign};

mod ccw_face_normal;
mod point_cloud_support_point;
mod wops;
