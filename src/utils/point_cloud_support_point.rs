use crate::math::{Point, Real, Vector};

/// Computes the index of the support point of a cloud of points.
///
/// Returns `None` if the cloud is empty.
#[inline]
pub fn point_cloud_support_point_id(dir: &Vector<Real>, points: &[Point<Real>]) -> Option<usize> {
    let mut best = None;
    let mut best_dot = -Real::MAX;

    for (i, p) in points.iter().enumerate() {
        let dot = p.coords.dot(dir);

        if best.is_none() || dot > best_dot {
            best_dot = dot;
            best = Some(i);
        }
    }

    best
}

/// Computes the support point of a non-empty cloud of points.
#[inline]
pub fn point_cloud_support_point(dir: &Vector<Real>, points: &[Point<Real>]) -> Point<Real> {
    point_cloud_support_point_id(dir, points)
        .map(|i| points[i])
        .unwrap_or_else(Point::origin)
}
