use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use super::point::Point3d;

/// A 3x3 rotation/scale transform.
///
/// Object-to-world matrices arrive from the host with their translation
/// column already stripped, so only the linear part is modelled. Serialized
/// as three rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[f64; 3]; 3]", into = "[[f64; 3]; 3]")]
pub struct LinearTransform {
    m: Matrix3<f64>,
}

impl LinearTransform {
    pub fn identity() -> Self {
        Self {
            m: Matrix3::identity(),
        }
    }

    /// Build from row-major entries.
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        #[rustfmt::skip]
        let m = Matrix3::new(
            rows[0][0], rows[0][1], rows[0][2],
            rows[1][0], rows[1][1], rows[1][2],
            rows[2][0], rows[2][1], rows[2][2],
        );
        Self { m }
    }

    pub fn rows(&self) -> [[f64; 3]; 3] {
        let mut rows = [[0.0; 3]; 3];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = self.m[(r, c)];
            }
        }
        rows
    }

    pub fn scaling(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            m: Matrix3::from_diagonal(&Vector3::new(sx, sy, sz)),
        }
    }

    pub fn uniform_scaling(s: f64) -> Self {
        Self::scaling(s, s, s)
    }

    /// Rotation around the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        Self {
            m: Rotation3::from_axis_angle(&Vector3::x_axis(), angle).into_inner(),
        }
    }

    /// Rotation around the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        Self {
            m: Rotation3::from_axis_angle(&Vector3::z_axis(), angle).into_inner(),
        }
    }

    /// Compose two transforms: `self * other` (apply `other` first).
    pub fn then(&self, other: &LinearTransform) -> LinearTransform {
        LinearTransform { m: self.m * other.m }
    }

    /// Transform a point. There is no translation part to apply.
    pub fn transform_point(&self, p: &Point3d) -> Point3d {
        let v = self.m * Vector3::new(p.x, p.y, p.z);
        Point3d::new(v.x, v.y, v.z)
    }

    pub fn is_identity(&self) -> bool {
        self.m == Matrix3::identity()
    }
}

impl Default for LinearTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[[f64; 3]; 3]> for LinearTransform {
    fn from(rows: [[f64; 3]; 3]) -> Self {
        Self::from_rows(rows)
    }
}

impl From<LinearTransform> for [[f64; 3]; 3] {
    fn from(t: LinearTransform) -> Self {
        t.rows()
    }
}
