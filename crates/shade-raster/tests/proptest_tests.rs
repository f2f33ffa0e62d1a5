//! Property-based tests for outline closing, falloff and the gradient.

use proptest::prelude::*;

use shade_kernel::geometry::point::Point2d;
use shade_raster::composite::box_blur;
use shade_raster::gradient::{row_intercepts, GradientField};
use shade_raster::pixel::PixelBuffer;
use shade_raster::polygon::{close_shape, ShapeDescriptor};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_outline() -> impl Strategy<Value = Vec<Point2d>> {
    prop::collection::vec((0.0f64..1.0, 0.0f64..1.0), 1..24)
        .prop_map(|pts| pts.into_iter().map(|(x, y)| Point2d::new(x, y)).collect())
}

/// Axis-aligned rectangle corners inside the unit square.
fn arb_rect() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (0.0f64..0.4, 0.0f64..0.4, 0.2f64..0.6, 0.2f64..0.6)
        .prop_map(|(x, y, w, h)| (x, y, x + w, y + h))
}

// ---------------------------------------------------------------------------
// 1. Closed outlines start and end on the same point
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn closed_outline_is_a_loop(outline in arb_outline()) {
        let closed = close_shape(&outline);
        prop_assert!(closed.len() >= 2);
        prop_assert_eq!(closed.points.first(), closed.points.last());
        match closed.crossing {
            Some(_) => prop_assert!(closed.len() <= outline.len()),
            None => prop_assert_eq!(closed.len(), outline.len() + 1),
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Falloff inside a rectangle stays in (0, 1]
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn falloff_inside_rect_is_a_ratio(
        (x0, y0, x1, y1) in arb_rect(),
        s in 0.05f64..0.95,
        t in 0.05f64..0.95,
    ) {
        let outline = [
            Point2d::new(x0, y0),
            Point2d::new(x1, y0),
            Point2d::new(x1, y1),
            Point2d::new(x0, y1),
        ];
        let shape = ShapeDescriptor::new(close_shape(&outline)).unwrap();
        let p = Point2d::new(x0 + s * (x1 - x0), y0 + t * (y1 - y0));
        prop_assume!(p.distance_to(&shape.centroid) > 1e-6);

        let ratio = shape.falloff(p);
        prop_assert!(ratio.is_some());
        let ratio = ratio.unwrap();
        prop_assert!(ratio > 0.0 && ratio <= 1.0 + 1e-9, "ratio {}", ratio);
    }
}

// ---------------------------------------------------------------------------
// 3. Falloff outside a rectangle is absent
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn falloff_outside_rect_is_none(
        (x0, y0, x1, y1) in arb_rect(),
        dx in 0.01f64..0.5,
        t in 0.0f64..1.0,
    ) {
        let outline = [
            Point2d::new(x0, y0),
            Point2d::new(x1, y0),
            Point2d::new(x1, y1),
            Point2d::new(x0, y1),
        ];
        let shape = ShapeDescriptor::new(close_shape(&outline)).unwrap();
        let p = Point2d::new(x1 + dx, y0 + t * (y1 - y0));
        prop_assert!(shape.falloff(p).is_none());
    }
}

// ---------------------------------------------------------------------------
// 4. Gradient rows stay in [0, 1) and never decrease
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn gradient_rows_are_monotonic(
        mut xs in prop::collection::vec(0.05f64..0.95, 1..5),
        width in 4usize..32,
    ) {
        xs.sort_by(|a, b| a.total_cmp(b));
        xs.dedup_by(|a, b| (*a - *b).abs() < 1e-3);
        let height = 3;
        let intercepts: Vec<Vec<f64>> = xs
            .iter()
            .map(|&x| row_intercepts(&[Point2d::new(x, 0.0), Point2d::new(x, 1.0)], height).unwrap())
            .collect();
        let field = GradientField::new(&intercepts, width, height);

        for row in 0..height {
            let values: Vec<f64> = (0..width)
                .map(|x| field.value_at(x as f64 / width as f64, row))
                .collect();
            prop_assert!(values.iter().all(|v| (0.0..1.0).contains(v)));
            prop_assert!(values.windows(2).all(|w| w[1] >= w[0]));
        }
    }
}

// ---------------------------------------------------------------------------
// 5. Blurring keeps the buffer shape and bounds
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn blur_keeps_shape_and_range(
        values in prop::collection::vec(0.0f64..1.0, 30),
        size in 1usize..12,
    ) {
        let mut buffer = PixelBuffer::from_values(6, 5, values).unwrap();
        box_blur(&mut buffer, size);
        prop_assert_eq!(buffer.len(), 30);
        prop_assert!(buffer.values().iter().all(|v| (-1e-12..=1.0 + 1e-12).contains(v)));
    }
}
