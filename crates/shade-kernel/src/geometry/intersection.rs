use super::point::{Point2d, Point3d};
use super::GeometryError;

/// Barycentric weights `(u, v, w)` of a point against a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barycentric {
    pub u: f64,
    pub v: f64,
    pub w: f64,
}

impl Barycentric {
    /// Weighted combination of three per-corner 2D values.
    pub fn interpolate(&self, a: Point2d, b: Point2d, c: Point2d) -> Point2d {
        Point2d::new(
            self.u * a.x + self.v * b.x + self.w * c.x,
            self.u * a.y + self.v * b.y + self.w * c.y,
        )
    }

    /// Weighted combination of three per-corner 3D values.
    pub fn interpolate_3d(&self, a: Point3d, b: Point3d, c: Point3d) -> Point3d {
        Point3d::new(
            self.u * a.x + self.v * b.x + self.w * c.x,
            self.u * a.y + self.v * b.y + self.w * c.y,
            self.u * a.z + self.v * b.z + self.w * c.z,
        )
    }

    pub fn is_inside(&self) -> bool {
        self.u >= 0.0 && self.v >= 0.0 && self.w >= 0.0
    }
}

/// Solve `p = u*a + v*b + w*c` for a triangle in 3D.
///
/// Uses the Gram form of the 2x2 system over the edges `b-a` and `c-a`, so a
/// point off the triangle's plane resolves to its orthogonal projection.
/// Weights are not clamped: a point outside the triangle yields values outside
/// `[0, 1]` and interpolation extrapolates.
pub fn barycentric(
    p: &Point3d,
    a: &Point3d,
    b: &Point3d,
    c: &Point3d,
) -> Result<Barycentric, GeometryError> {
    let v0 = *b - *a;
    let v1 = *c - *a;
    let v2 = *p - *a;

    let d00 = v0.dot(&v0);
    let d01 = v0.dot(&v1);
    let d11 = v1.dot(&v1);
    let d20 = v2.dot(&v0);
    let d21 = v2.dot(&v1);

    let denom = d00 * d11 - d01 * d01;
    if denom == 0.0 || !denom.is_finite() {
        return Err(GeometryError::DegenerateTriangle { denominator: denom });
    }

    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    Ok(Barycentric {
        u: 1.0 - v - w,
        v,
        w,
    })
}

/// Result of a 2D segment-segment intersection.
///
/// `t1` and `t2` parametrize the first and second segment respectively, with
/// `0` at the start and `1` at the end. Values outside `[0, 1]` mean the
/// supporting lines cross beyond that segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    pub t1: f64,
    pub t2: f64,
    pub point: Point2d,
}

impl SegmentHit {
    /// Both parameters lie on their segments (endpoints included).
    pub fn is_within_both(&self) -> bool {
        (0.0..=1.0).contains(&self.t1) && (0.0..=1.0).contains(&self.t2)
    }
}

/// Intersect the lines through `a0→a1` and `b0→b1`.
/// Returns None if the lines are parallel (zero determinant).
pub fn segment_intersection(
    a0: &Point2d,
    a1: &Point2d,
    b0: &Point2d,
    b1: &Point2d,
) -> Option<SegmentHit> {
    let m1 = *a1 - *a0;
    let m2 = *b1 - *b0;

    let denom = m2.perp_dot(&m1);
    if denom == 0.0 {
        return None;
    }

    let offset = *b0 - *a0;
    let t1 = m2.perp_dot(&offset) / denom;
    let t2 = m1.perp_dot(&offset) / denom;

    Some(SegmentHit {
        t1,
        t2,
        point: *a0 + m1 * t1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_barycentric_corners() {
        let a = Point3d::new(0.0, 0.0, 0.0);
        let b = Point3d::new(1.0, 0.0, 0.0);
        let c = Point3d::new(0.0, 1.0, 0.0);

        let at_b = barycentric(&b, &a, &b, &c).unwrap();
        assert_relative_eq!(at_b.u, 0.0, epsilon = 1e-12);
        assert_relative_eq!(at_b.v, 1.0, epsilon = 1e-12);
        assert_relative_eq!(at_b.w, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_barycentric_reconstructs_point() {
        let a = Point3d::new(1.0, 2.0, 0.5);
        let b = Point3d::new(4.0, 1.0, -1.0);
        let c = Point3d::new(2.0, 5.0, 2.0);
        let p = Point3d::new(2.2, 2.6, 0.5);
        // Put p on the triangle's plane first.
        let bc = barycentric(&p, &a, &b, &c).unwrap();
        let on_plane = bc.interpolate_3d(a, b, c);

        let again = barycentric(&on_plane, &a, &b, &c).unwrap();
        assert_relative_eq!(again.u + again.v + again.w, 1.0, epsilon = 1e-12);
        let rebuilt = again.interpolate_3d(a, b, c);
        assert!(rebuilt.distance_to(&on_plane) < 1e-9);
    }

    #[test]
    fn test_barycentric_outside_not_clamped() {
        let a = Point3d::new(0.0, 0.0, 0.0);
        let b = Point3d::new(1.0, 0.0, 0.0);
        let c = Point3d::new(0.0, 1.0, 0.0);
        let bc = barycentric(&Point3d::new(2.0, 0.0, 0.0), &a, &b, &c).unwrap();
        assert!(!bc.is_inside());
        assert_relative_eq!(bc.v, 2.0, epsilon = 1e-12);
        assert_relative_eq!(bc.u, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_barycentric_degenerate_triangle() {
        let a = Point3d::new(0.0, 0.0, 0.0);
        let b = Point3d::new(1.0, 1.0, 1.0);
        let c = Point3d::new(2.0, 2.0, 2.0);
        let err = barycentric(&a, &a, &b, &c).unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateTriangle { .. }));
    }

    #[test]
    fn test_segment_intersection_cross() {
        let hit = segment_intersection(
            &Point2d::new(0.0, 0.0),
            &Point2d::new(2.0, 2.0),
            &Point2d::new(0.0, 2.0),
            &Point2d::new(2.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(hit.t1, 0.5, epsilon = 1e-12);
        assert_relative_eq!(hit.t2, 0.5, epsilon = 1e-12);
        assert_relative_eq!(hit.point.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(hit.point.y, 1.0, epsilon = 1e-12);
        assert!(hit.is_within_both());
    }

    #[test]
    fn test_segment_intersection_beyond_segment() {
        let hit = segment_intersection(
            &Point2d::new(0.0, 0.0),
            &Point2d::new(1.0, 0.0),
            &Point2d::new(3.0, -1.0),
            &Point2d::new(3.0, 1.0),
        )
        .unwrap();
        assert_relative_eq!(hit.t1, 3.0, epsilon = 1e-12);
        assert_relative_eq!(hit.t2, 0.5, epsilon = 1e-12);
        assert!(!hit.is_within_both());
    }

    #[test]
    fn test_segment_intersection_parallel() {
        let hit = segment_intersection(
            &Point2d::new(0.0, 0.0),
            &Point2d::new(1.0, 1.0),
            &Point2d::new(0.0, 1.0),
            &Point2d::new(1.0, 2.0),
        );
        assert!(hit.is_none());
    }
}
