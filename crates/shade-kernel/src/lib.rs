//! Geometry primitives and the mesh/stroke data model for UV-space shading.

pub mod geometry;
pub mod mesh;

// Re-export key types at crate root for convenience.
pub use geometry::intersection::{barycentric, segment_intersection, Barycentric, SegmentHit};
pub use geometry::point::{Point2d, Point3d};
pub use geometry::transform::LinearTransform;
pub use geometry::vector::{Vec2, Vec3};
pub use geometry::GeometryError;
pub use mesh::{Face, Mesh, Stroke, StrokeSet};
