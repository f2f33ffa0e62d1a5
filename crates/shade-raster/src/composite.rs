//! Overlay compositing of shape falloff and the separable box blur.

use rayon::prelude::*;

use crate::pixel::PixelBuffer;

/// Overlay-style blend of a base value with a contribution.
///
/// A contribution of 0.5 leaves the base unchanged; lower values darken and
/// higher values lighten. A zero contribution also leaves the base unchanged.
pub fn blend_overlay(base: f64, contribution: f64) -> f64 {
    if contribution == 0.0 {
        base
    } else {
        2.0 * base * contribution
    }
}

/// What a closed shape does to the pixels it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Darkens toward the centroid; contributions stay in `[0, 0.5]`.
    Shadow,
    /// Lightens toward the centroid; contributions stay in `[0.5, 1]`.
    Highlight,
}

impl ShapeKind {
    /// Blend contribution for a falloff ratio in `(0, 1]`.
    pub fn contribution(&self, ratio: f64) -> f64 {
        let r2 = ratio * ratio;
        match self {
            ShapeKind::Shadow => r2 / 2.0,
            ShapeKind::Highlight => (1.0 - r2) / 2.0 + 0.5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Shadow => "shadow",
            ShapeKind::Highlight => "highlight",
        }
    }
}

/// Blend per-pixel falloff ratios into `buffer`.
///
/// `ratios` is indexed like the buffer. Pixels without a ratio, or with a
/// ratio of exactly zero, are left alone. Returns how many pixels changed.
pub fn apply_shape(buffer: &mut PixelBuffer, kind: ShapeKind, ratios: &[Option<f64>]) -> usize {
    let mut touched = 0;
    for (value, ratio) in buffer.values_mut().iter_mut().zip(ratios) {
        if let Some(ratio) = ratio.filter(|r| *r != 0.0) {
            *value = blend_overlay(*value, kind.contribution(ratio));
            touched += 1;
        }
    }
    touched
}

/// Uniform kernel of `size` taps summing to one.
pub fn box_kernel(size: usize) -> Vec<f64> {
    vec![1.0 / size as f64; size]
}

/// 1D convolution that keeps the input length, centred the way numpy's
/// `convolve(..., mode="same")` centres it. Samples beyond either end are 0.
fn convolve_same(input: &[f64], kernel: &[f64], output: &mut [f64]) {
    let n = input.len() as isize;
    let shift = ((kernel.len() - 1) / 2) as isize;
    for (i, out) in output.iter_mut().enumerate() {
        let center = i as isize + shift;
        *out = kernel
            .iter()
            .enumerate()
            .filter_map(|(j, w)| {
                let src = center - j as isize;
                (0..n).contains(&src).then(|| input[src as usize] * w)
            })
            .sum();
    }
}

/// Separable box blur: columns first, then rows. `size` must be at least 1;
/// a size of 1 leaves the buffer unchanged.
pub fn box_blur(buffer: &mut PixelBuffer, size: usize) {
    if size <= 1 || buffer.is_empty() {
        return;
    }
    let kernel = box_kernel(size);
    let width = buffer.width();
    let height = buffer.height();

    let source = &*buffer;
    let columns: Vec<Vec<f64>> = (0..width)
        .into_par_iter()
        .map(|x| {
            let column: Vec<f64> = (0..height).map(|y| source.get(x, y)).collect();
            let mut blurred = vec![0.0; height];
            convolve_same(&column, &kernel, &mut blurred);
            blurred
        })
        .collect();
    for (x, column) in columns.iter().enumerate() {
        for (y, value) in column.iter().enumerate() {
            buffer.set(x, y, *value);
        }
    }

    buffer
        .values_mut()
        .par_chunks_mut(width)
        .for_each(|row| {
            let source = row.to_vec();
            convolve_same(&source, &kernel, row);
        });
}
