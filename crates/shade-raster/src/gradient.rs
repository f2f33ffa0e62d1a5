//! Banded left-to-right gradient built from an ordered family of guide lines.
//!
//! With `N` guide lines the image is split, row by row, into `N + 1` bands.
//! Inside a band the value ramps linearly from one intercept to the next (or
//! to the right image edge), so every row increases monotonically from 0 to 1.

use rayon::prelude::*;
use shade_kernel::geometry::point::Point2d;

/// Neighbours of `value` in an ascending slice: the last entry with key
/// `<= value` and the first with key `> value`.
pub fn surrounding<T>(
    value: f64,
    sorted: &[T],
    key: impl Fn(&T) -> f64,
) -> (Option<&T>, Option<&T>) {
    let split = sorted.partition_point(|item| key(item) <= value);
    let below = split.checked_sub(1).map(|i| &sorted[i]);
    (below, sorted.get(split))
}

fn x_at_y(y: f64, a: &Point2d, b: &Point2d) -> f64 {
    let d = (y - a.y) / (b.y - a.y);
    b.x * d + a.x * (1.0 - d)
}

/// X coordinate of a projected guide line at each of `height` rows.
///
/// Row `r` sits at `v = r / height`. Between two vertices the x coordinate is
/// interpolated linearly; above or below the line's extent the nearest
/// endpoint's x is used. Returns None for a line without points.
pub fn row_intercepts(line: &[Point2d], height: usize) -> Option<Vec<f64>> {
    if line.is_empty() {
        return None;
    }
    let mut sorted = line.to_vec();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y));

    let intercepts = (0..height)
        .map(|row| {
            let y = row as f64 / height as f64;
            match surrounding(y, &sorted, |p| p.y) {
                (Some(a), Some(b)) => x_at_y(y, a, b),
                (Some(only), None) | (None, Some(only)) => only.x,
                (None, None) => unreachable!("line has at least one point"),
            }
        })
        .collect();
    Some(intercepts)
}

/// One guide line's crossing of a row, tagged with the line's drawn order.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Intercept {
    line: usize,
    x: f64,
}

/// Per-row guide-line intercepts, sorted by x, ready for pixel queries.
#[derive(Debug, Clone)]
pub struct GradientField {
    width: usize,
    line_count: usize,
    rows: Vec<Vec<Intercept>>,
}

impl GradientField {
    /// Build from per-line intercepts (`intercepts[line][row]`), lines in the
    /// order they were drawn. Every inner vector must hold `height` rows.
    pub fn new(intercepts: &[Vec<f64>], width: usize, height: usize) -> Self {
        let rows = (0..height)
            .into_par_iter()
            .map(|row| {
                let mut options: Vec<Intercept> = intercepts
                    .iter()
                    .enumerate()
                    .map(|(line, xs)| Intercept { line, x: xs[row] })
                    .collect();
                options.sort_by(|a, b| a.x.total_cmp(&b.x));
                options
            })
            .collect();
        Self {
            width,
            line_count: intercepts.len(),
            rows,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Field value at normalized column `x` on `row`.
    ///
    /// Band offsets come from the left line's drawn index, not its rank
    /// along the row, so guide lines are expected in left-to-right order.
    pub fn value_at(&self, x: f64, row: usize) -> f64 {
        let bands = (self.line_count + 1) as f64;
        match surrounding(x, &self.rows[row], |i| i.x) {
            (Some(left), right) => {
                let offset = (left.line + 1) as f64 / bands;
                let edge = right.map_or(1.0, |r| r.x);
                offset + ((x - left.x) / (edge - left.x)) / bands
            }
            (None, Some(right)) => (x / right.x) / bands,
            (None, None) => 0.0,
        }
    }

    /// Field value for a linear pixel index.
    pub fn value_at_index(&self, index: usize) -> f64 {
        let x = index % self.width;
        let row = index / self.width;
        self.value_at(x as f64 / self.width as f64, row)
    }
}
