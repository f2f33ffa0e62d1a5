pub mod point;
pub mod vector;
pub mod transform;
pub mod intersection;

use thiserror::Error;

/// Numerical failures in the geometric primitives.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("Degenerate triangle: barycentric denominator is {denominator}")]
    DegenerateTriangle { denominator: f64 },
}
