//! Closing hand-drawn outlines and measuring how deep a point sits inside them.

use shade_kernel::geometry::intersection::segment_intersection;
use shade_kernel::geometry::point::Point2d;
use tracing::{debug, warn};

/// A loop of 2D points whose last point repeats the first.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedPolygon {
    pub points: Vec<Point2d>,
    /// Where the outline was cut, if it crossed itself.
    pub crossing: Option<Point2d>,
}

impl ClosedPolygon {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True if no two non-adjacent boundary segments cross.
    pub fn is_simple(&self) -> bool {
        let segments: Vec<(Point2d, Point2d)> =
            self.points.windows(2).map(|w| (w[0], w[1])).collect();
        let n = segments.len();
        for i in 0..n {
            for j in (i + 2)..n {
                // The first and last segment meet at the loop's seam.
                if i == 0 && j == n - 1 {
                    continue;
                }
                let (a0, a1) = segments[i];
                let (b0, b1) = segments[j];
                let crosses = segment_intersection(&a0, &a1, &b0, &b1)
                    .is_some_and(|hit| hit.is_within_both());
                if crosses {
                    return false;
                }
            }
        }
        true
    }
}

/// Turn an open, roughly loop-shaped outline into a closed polygon.
///
/// Each segment is tested against every earlier segment that does not share
/// an endpoint with it. On the first proper crossing the two touching
/// endpoints snap to the crossing and everything outside the loop is dropped:
/// the stroke overshot and the crossing is where the loop was meant to close.
/// If nothing crosses, the outline is closed by repeating its first point.
/// The implicit closing edge is never tested.
pub fn close_shape(points: &[Point2d]) -> ClosedPolygon {
    for i in 1..points.len() {
        for j in 1..i.saturating_sub(1) {
            let Some(hit) =
                segment_intersection(&points[i - 1], &points[i], &points[j - 1], &points[j])
            else {
                continue;
            };
            if !hit.is_within_both() {
                continue;
            }

            let mut loop_points = points[j - 1..=i].to_vec();
            loop_points[0] = hit.point;
            let last = loop_points.len() - 1;
            loop_points[last] = hit.point;
            debug!(
                start = j - 1,
                end = i,
                kept = loop_points.len(),
                "outline closed at self-crossing"
            );
            return ClosedPolygon {
                points: loop_points,
                crossing: Some(hit.point),
            };
        }
    }

    warn!(
        points = points.len(),
        "outline never crosses itself, closing it with a straight edge"
    );
    let mut loop_points = points.to_vec();
    if let Some(first) = points.first() {
        loop_points.push(*first);
    }
    ClosedPolygon {
        points: loop_points,
        crossing: None,
    }
}

/// A closed polygon with its centroid and bounding radius, ready for
/// per-pixel queries.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDescriptor {
    pub polygon: ClosedPolygon,
    pub centroid: Point2d,
    pub max_radius_squared: f64,
}

impl ShapeDescriptor {
    /// The centroid is the mean of every stored point, including the repeated
    /// closing point. Returns None for an empty polygon.
    pub fn new(polygon: ClosedPolygon) -> Option<Self> {
        let centroid = Point2d::centroid(&polygon.points)?;
        let max_radius_squared = polygon
            .points
            .iter()
            .map(|p| p.distance_squared_to(&centroid))
            .fold(0.0, f64::max);
        Some(Self {
            polygon,
            centroid,
            max_radius_squared,
        })
    }

    /// Where `position` sits between the centroid and the boundary.
    ///
    /// A ray from the centroid through `position` is extended to the first
    /// boundary segment it reaches beyond `position`. The result is
    /// `|position - centroid| / |boundary - centroid|`: close to 0 near the
    /// centroid, approaching 1 at the boundary. Returns None outside the
    /// shape, and for the centroid itself where the ray has no direction.
    pub fn falloff(&self, position: Point2d) -> Option<f64> {
        if position.distance_squared_to(&self.centroid) > self.max_radius_squared {
            return None;
        }

        for segment in self.polygon.points.windows(2) {
            let Some(hit) = segment_intersection(&self.centroid, &position, &segment[0], &segment[1])
            else {
                continue;
            };
            // The boundary must lie past the query point, within the segment.
            if hit.t1 > 1.0 && (0.0..=1.0).contains(&hit.t2) {
                return Some(1.0 / hit.t1);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2d {
        Point2d::new(x, y)
    }

    fn unit_square() -> Vec<Point2d> {
        vec![p(-0.5, -0.5), p(0.5, -0.5), p(0.5, 0.5), p(-0.5, 0.5)]
    }

    #[test]
    fn test_convex_outline_closes_with_first_point() {
        let outline = unit_square();
        let closed = close_shape(&outline);
        assert!(closed.crossing.is_none());
        assert_eq!(closed.points.len(), 5);
        assert_eq!(closed.points[..4], outline[..]);
        assert_eq!(closed.points[4], outline[0]);
        assert!(closed.is_simple());
    }

    #[test]
    fn test_closing_a_closed_loop_is_idempotent() {
        let once = close_shape(&unit_square());
        let twice = close_shape(&once.points);
        assert_eq!(twice.points, once.points);
    }

    #[test]
    fn test_overshooting_outline_is_cut_at_crossing() {
        let outline = vec![
            p(0.0, 0.0),
            p(0.1, 0.2),
            p(0.9, 0.2),
            p(0.9, 0.8),
            p(0.3, 0.8),
            p(0.3, 0.0),
            p(0.35, -0.1),
        ];
        let closed = close_shape(&outline);
        let crossing = closed.crossing.expect("outline crosses itself");
        assert_relative_eq!(crossing.x, 0.3, epsilon = 1e-12);
        assert_relative_eq!(crossing.y, 0.2, epsilon = 1e-12);

        assert_eq!(closed.points.len(), 5);
        assert_eq!(closed.points[0], crossing);
        assert_eq!(closed.points[4], crossing);
        assert_eq!(closed.points[1], p(0.9, 0.2));
        assert_eq!(closed.points[3], p(0.3, 0.8));
        assert!(closed.is_simple());
    }

    #[test]
    fn test_adjacent_segments_are_not_tested() {
        // Three points: the only pair of segments shares an endpoint.
        let closed = close_shape(&[p(0.0, 0.0), p(1.0, 0.0), p(0.0, 0.0)]);
        assert!(closed.crossing.is_none());
        assert_eq!(closed.points.len(), 4);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(close_shape(&[]).is_empty());
        let single = close_shape(&[p(0.2, 0.2)]);
        assert_eq!(single.points, vec![p(0.2, 0.2), p(0.2, 0.2)]);
        assert!(ShapeDescriptor::new(close_shape(&[])).is_none());
    }

    #[test]
    fn test_figure_eight_is_not_simple() {
        let bowtie = ClosedPolygon {
            points: vec![p(0.0, 0.0), p(1.0, 1.0), p(1.0, 0.0), p(0.0, 1.0), p(0.0, 0.0)],
            crossing: None,
        };
        assert!(!bowtie.is_simple());
    }

    #[test]
    fn test_descriptor_bounds() {
        let shape = ShapeDescriptor::new(close_shape(&unit_square())).unwrap();
        // The repeated corner pulls the centroid toward (-0.5, -0.5).
        assert_relative_eq!(shape.centroid.x, -0.1, epsilon = 1e-12);
        assert_relative_eq!(shape.centroid.y, -0.1, epsilon = 1e-12);
        assert_relative_eq!(shape.max_radius_squared, 0.72, epsilon = 1e-12);
    }

    #[test]
    fn test_falloff_outside_is_none() {
        let shape = ShapeDescriptor::new(close_shape(&unit_square())).unwrap();
        assert!(shape.falloff(p(0.51, 0.0)).is_none());
        assert!(shape.falloff(p(0.0, -0.51)).is_none());
        assert!(shape.falloff(p(3.0, 3.0)).is_none());
    }

    #[test]
    fn test_falloff_grows_toward_boundary() {
        let shape = ShapeDescriptor::new(close_shape(&unit_square())).unwrap();
        let c = shape.centroid;
        // Right edge is at x = 0.5, 0.6 away from the centroid along +x.
        let mut previous = 0.0;
        for step in 1..10 {
            let d = 0.6 * step as f64 / 10.0;
            let ratio = shape.falloff(p(c.x + d, c.y)).unwrap();
            assert_relative_eq!(ratio, d / 0.6, epsilon = 1e-9);
            assert!(ratio > previous);
            previous = ratio;
        }
        let near_center = shape.falloff(p(c.x + 1e-6, c.y)).unwrap();
        assert!(near_center < 1e-4);
        assert!(shape.falloff(c).is_none());
    }
}
