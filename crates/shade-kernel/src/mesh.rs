use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::geometry::point::{Point2d, Point3d};
use crate::geometry::transform::LinearTransform;

/// One triangle of a UV-mapped mesh.
///
/// Corner `i` of `positions` owns the texture coordinate `uvs[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub positions: [Point3d; 3],
    pub uvs: [Point2d; 3],
}

impl Face {
    pub fn new(positions: [Point3d; 3], uvs: [Point2d; 3]) -> Self {
        Self { positions, uvs }
    }

    /// Mean of the three vertex positions.
    pub fn centroid(&self) -> Point3d {
        let [a, b, c] = self.positions;
        Point3d::new(
            (a.x + b.x + c.x) / 3.0,
            (a.y + b.y + c.y) / 3.0,
            (a.z + b.z + c.z) / 3.0,
        )
    }

    /// Triangle area; zero for collinear or coincident corners.
    pub fn area(&self) -> f64 {
        let [a, b, c] = self.positions;
        (b - a).cross(&(c - a)).length() * 0.5
    }

    /// The same face with its positions mapped through `transform`. UVs are kept.
    pub fn transformed(&self, transform: &LinearTransform) -> Face {
        Face {
            positions: self.positions.map(|p| transform.transform_point(&p)),
            uvs: self.uvs,
        }
    }
}

/// A triangulated surface with per-corner UVs and its object transform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub faces: Vec<Face>,
    #[serde(default)]
    pub transform: LinearTransform,
}

impl Mesh {
    pub fn from_faces(faces: Vec<Face>, transform: LinearTransform) -> Self {
        Self { faces, transform }
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    /// Add a convex polygon given as `(position, uv)` corners, fan-triangulated
    /// around the first corner. Returns the number of triangles added.
    pub fn add_polygon(&mut self, corners: &[(Point3d, Point2d)]) -> usize {
        if corners.len() < 3 {
            return 0;
        }
        let (p0, uv0) = corners[0];
        for pair in corners[1..].windows(2) {
            let (p1, uv1) = pair[0];
            let (p2, uv2) = pair[1];
            self.faces.push(Face::new([p0, p1, p2], [uv0, uv1, uv2]));
        }
        corners.len() - 2
    }

    /// Faces with their positions mapped through the mesh transform.
    pub fn world_faces(&self) -> Vec<Face> {
        if self.transform.is_identity() {
            return self.faces.clone();
        }
        self.faces
            .iter()
            .map(|f| f.transformed(&self.transform))
            .collect()
    }

    /// A flat `width` x `height` sheet in the XY plane (z = 0) with its lower
    /// left corner at the origin, sampled on a regular grid. UVs map the sheet
    /// onto the unit square.
    #[instrument]
    pub fn uv_grid(width: f64, height: f64, u_divisions: usize, v_divisions: usize) -> Mesh {
        let mut mesh = Mesh::default();
        let u_divisions = u_divisions.max(1);
        let v_divisions = v_divisions.max(1);

        let corner = |i: usize, j: usize| {
            let u = i as f64 / u_divisions as f64;
            let v = j as f64 / v_divisions as f64;
            (Point3d::new(u * width, v * height, 0.0), Point2d::new(u, v))
        };

        for i in 0..u_divisions {
            for j in 0..v_divisions {
                let c00 = corner(i, j);
                let c10 = corner(i + 1, j);
                let c11 = corner(i + 1, j + 1);
                let c01 = corner(i, j + 1);
                mesh.add_polygon(&[c00, c10, c11, c01]);
            }
        }

        debug!(faces = mesh.face_count(), "built grid mesh");
        mesh
    }
}

/// A hand-drawn polyline in its object's local frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point3d>,
}

impl Stroke {
    pub fn new(points: Vec<Point3d>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Strokes drawn on one host object; they share its transform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeSet {
    #[serde(default)]
    pub transform: LinearTransform,
    pub strokes: Vec<Stroke>,
}

impl StrokeSet {
    pub fn new(transform: LinearTransform, strokes: Vec<Stroke>) -> Self {
        Self { transform, strokes }
    }

    /// A set holding a single stroke.
    pub fn single(transform: LinearTransform, stroke: Stroke) -> Self {
        Self {
            transform,
            strokes: vec![stroke],
        }
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}
