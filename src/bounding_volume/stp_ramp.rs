use crate::bounding_volume::stp::{
    circumcircle, edge_patch_support, sphere_support, wedge_contains, FacePatch,
    SphereTorusPatches, StpMargins, StpRadii,
};
use crate::math::{Point, Real, UnitVector};
use crate::shape::Ramp;
use crate::utils;
use arrayvec::ArrayVec;

// Faces of the ramp, as indices into `Ramp::vertices`, counter-clockwise seen from outside.
const FACES: [&[usize]; 5] = [
    &[0, 3, 4, 1], // bottom, z = 0
    &[1, 4, 5, 2], // back, x = size.x
    &[0, 2, 5, 3], // slope
    &[0, 1, 2],    // side, y = -size.y / 2
    &[3, 5, 4],    // side, y = size.y / 2
];

/// The face containing the edge `a -> b`.
fn face_with_edge(a: usize, b: usize) -> Option<usize> {
    FACES.iter().position(|face| {
        (0..face.len()).any(|i| face[i] == a && face[(i + 1) % face.len()] == b)
    })
}

/// A ramp rounded by sphere-torus patches.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StpRamp {
    ramp: Ramp,
    radii: StpRadii,
    vertices: [Point<Real>; 6],
    // `None` for the faces a flat ramp collapses.
    faces: [Option<FacePatch>; 5],
}

impl StpRamp {
    /// Rounds `ramp` with the given margins.
    pub fn new(ramp: Ramp, margins: StpMargins) -> Self {
        let vertices = ramp.vertices();
        let circles = FACES.map(|face| {
            let [a, b, c] = [0, 1, 2].map(|i| &vertices[face[i]]);
            circumcircle(a, b, c)
        });

        // Every face of a ramp is cocircular: its rectangles and its right triangles.
        let largest = circles
            .iter()
            .flatten()
            .map(|(_, radius)| *radius)
            .fold(0.0, Real::max);
        let radii = StpRadii::new(margins, 2.0 * largest);
        let faces = FACES.map(|face| {
            let [a, b, c] = [0, 1, 2].map(|i| &vertices[face[i]]);
            FacePatch::through(a, b, c, &radii)
        });

        Self {
            ramp,
            radii,
            vertices,
            faces,
        }
    }

    /// The rounded ramp.
    #[inline]
    pub fn ramp(&self) -> &Ramp {
        &self.ramp
    }

    /// The radii of the patches.
    #[inline]
    pub fn radii(&self) -> &StpRadii {
        &self.radii
    }

    fn face_edges(&self, face: usize) -> impl Iterator<Item = (&Point<Real>, &Point<Real>)> {
        let ids = FACES[face];
        (0..ids.len()).map(move |i| {
            (
                &self.vertices[ids[i]],
                &self.vertices[ids[(i + 1) % ids.len()]],
            )
        })
    }

    // Is `dir` outside of the patch of `face` across its edge `a -> b`?
    fn beyond_edge(&self, face: Option<usize>, a: usize, b: usize, dir: &UnitVector<Real>) -> bool {
        match face.and_then(|f| self.faces[f].as_ref()) {
            Some(patch) => !wedge_contains(
                &patch.sphere_center,
                &self.vertices[a],
                &self.vertices[b],
                dir,
            ),
            None => true,
        }
    }
}

impl SphereTorusPatches for StpRamp {
    type Anchor = usize;

    fn anchor(&self, dir: &UnitVector<Real>) -> usize {
        utils::point_cloud_support_point_id(dir, &self.vertices).unwrap_or(0)
    }

    fn face_support(&self, vertex: &usize, dir: &UnitVector<Real>) -> Option<Point<Real>> {
        let mut candidates: ArrayVec<(usize, Real), 5> = (0..FACES.len())
            .filter(|f| FACES[*f].contains(vertex))
            .filter_map(|f| Some((f, self.faces[f]?.normal.dot(&**dir))))
            .collect();
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

        candidates.iter().find_map(|(f, _)| {
            self.faces[*f]
                .as_ref()?
                .support(self.face_edges(*f), &self.radii, dir)
        })
    }

    fn edge_support(&self, vertex: &usize, dir: &UnitVector<Real>) -> Option<Point<Real>> {
        let a = *vertex;

        FACES.iter().enumerate().find_map(|(f, ids)| {
            let i = ids.iter().position(|v| *v == a)?;
            let b = ids[(i + 1) % ids.len()];

            if self.beyond_edge(Some(f), a, b, dir)
                && self.beyond_edge(face_with_edge(b, a), b, a, dir)
            {
                edge_patch_support(&self.vertices[a], &self.vertices[b], &self.radii, dir)
            } else {
                None
            }
        })
    }

    fn vertex_support(&self, vertex: &usize, dir: &UnitVector<Real>) -> Point<Real> {
        sphere_support(&self.vertices[*vertex], self.radii.min_margin(), dir)
    }
}
