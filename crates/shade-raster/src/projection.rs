//! Mapping of 3D stroke points into the mesh's UV space.
//!
//! A point is assigned to the face whose vertex centroid is nearest, then its
//! barycentric weights against that face interpolate the corner UVs. The
//! centroid test is an approximation of closest-point-on-triangle that holds
//! for strokes drawn directly on the surface; it is kept as is because stroke
//! placement is tuned against it.

use shade_kernel::geometry::intersection::barycentric;
use shade_kernel::geometry::point::{Point2d, Point3d};
use shade_kernel::geometry::transform::LinearTransform;
use shade_kernel::mesh::{Face, Mesh, Stroke};

use tracing::warn;

use crate::error::ShadeError;

/// Precomputed world-space faces and their centroids.
#[derive(Debug, Clone)]
pub struct UvProjector {
    faces: Vec<Face>,
    centroids: Vec<Point3d>,
    zero_area: Vec<usize>,
}

impl UvProjector {
    pub fn new(mesh: &Mesh) -> Result<Self, ShadeError> {
        if mesh.is_empty() {
            return Err(ShadeError::EmptyMesh);
        }
        let faces = mesh.world_faces();
        let centroids = faces.iter().map(Face::centroid).collect();
        let zero_area: Vec<usize> = faces
            .iter()
            .enumerate()
            .filter(|(_, face)| face.area() == 0.0)
            .map(|(i, _)| i)
            .collect();
        if !zero_area.is_empty() {
            // Only fatal if a stroke point lands on one of them.
            warn!(count = zero_area.len(), first = zero_area[0], "mesh has zero-area faces");
        }
        Ok(Self {
            faces,
            centroids,
            zero_area,
        })
    }

    /// Indices of faces that cannot be used for projection.
    pub fn zero_area_faces(&self) -> &[usize] {
        &self.zero_area
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Index of the face whose vertex centroid is closest to `p`.
    /// Ties keep the earliest face.
    pub fn nearest_face(&self, p: &Point3d) -> usize {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (i, centroid) in self.centroids.iter().enumerate() {
            let d = centroid.distance_squared_to(p);
            if d < best_distance {
                best = i;
                best_distance = d;
            }
        }
        best
    }

    /// Project a world-space point to UV.
    pub fn project_point(&self, p: &Point3d) -> Result<Point2d, ShadeError> {
        let face_index = self.nearest_face(p);
        let face = &self.faces[face_index];
        let [a, b, c] = &face.positions;
        let weights = barycentric(p, a, b, c).map_err(|source| ShadeError::DegenerateFace {
            face: face_index,
            source,
        })?;
        let [uv_a, uv_b, uv_c] = face.uvs;
        Ok(weights.interpolate(uv_a, uv_b, uv_c))
    }

    /// Project every point of a stroke drawn in a frame given by `transform`.
    /// Output order matches input order.
    pub fn project_stroke(
        &self,
        stroke: &Stroke,
        transform: &LinearTransform,
    ) -> Result<Vec<Point2d>, ShadeError> {
        stroke
            .points
            .iter()
            .map(|p| self.project_point(&transform.transform_point(p)))
            .collect()
    }
}
