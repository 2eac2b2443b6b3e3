use crate::math::*;

/// Computes the normal of a counter-clock-wise triangle.
///
/// Returns `None` if the triangle is degenerate.
#[inline]
pub fn ccw_face_normal(pts: [&Point<Real>; 3]) -> Option<UnitVector<Real>> {
    let ab = *pts[1] - *pts[0];
    let ac = *pts[2] - *pts[0];
    let res = ab.cross(&ac);

    UnitVector::try_new(res, DEFAULT_EPSILON)
}

/// Computes the normal of a counter-clock-wise planar polygon using Newell's method.
///
/// Every vertex contributes, so slightly non-planar or partially collinear polygons still
/// get a sensible normal. Returns `None` if the polygon has no area.
pub fn polygon_normal<'a>(
    pts: impl IntoIterator<Item = &'a Point<Real>>,
) -> Option<UnitVector<Real>> {
    let mut normal = Vector::zeros();
    let mut prev: Option<&Point<Real>> = None;
    let mut first: Option<&Point<Real>> = None;

    for pt in pts {
        if let Some(prev) = prev {
            normal += prev.coords.cross(&pt.coords);
        } else {
            first = Some(pt);
        }
        prev = Some(pt);
    }

    if let (Some(last), Some(first)) = (prev, first) {
        normal += last.coords.cross(&first.coords);
    }

    UnitVector::try_new(normal, DEFAULT_EPSILON)
}
