use shade_kernel::geometry::point::Point2d;

/// A single-channel intensity image addressed by `y * width + x`.
///
/// Row `y` samples the UV plane at `v = y / height`, column `x` at
/// `u = x / width`.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl PixelBuffer {
    /// A `width` x `height` buffer filled with 0.0.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width * height],
        }
    }

    /// Wrap existing values. Returns None if the length does not match.
    pub fn from_values(width: usize, height: usize, values: Vec<f64>) -> Option<Self> {
        (values.len() == width * height).then_some(Self {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Column and row of a linear index.
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Normalized UV position of a linear index.
    pub fn position(&self, index: usize) -> Point2d {
        let (x, y) = self.coords(index);
        Point2d::new(x as f64 / self.width as f64, y as f64 / self.height as f64)
    }

    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        let i = self.index(x, y);
        self.values[i] = value;
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn fill(&mut self, value: f64) {
        self.values.fill(value);
    }

    /// Expand to RGBA: the intensity in all three colour channels, alpha 1.0.
    pub fn to_rgba(&self) -> Vec<f32> {
        self.values
            .iter()
            .flat_map(|&v| {
                let v = v as f32;
                [v, v, v, 1.0]
            })
            .collect()
    }
}
