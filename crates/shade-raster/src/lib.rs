//! Rasterization of the shading texture: projection of strokes into UV space,
//! the guide-line gradient, shape compositing and blur.
//!
//! [`pipeline::shade`] drives the whole run on a bounded worker pool.

pub mod composite;
pub mod error;
pub mod gradient;
pub mod pipeline;
pub mod pixel;
pub mod polygon;
pub mod progress;
pub mod projection;

pub use composite::{apply_shape, blend_overlay, box_blur, ShapeKind};
pub use error::{ShadeError, StrokeRole};
pub use gradient::{row_intercepts, GradientField};
pub use pipeline::{
    render_rgba, shade, ShadingConfig, ShadingReport, ShadingRequest, ShapeSummary,
};
pub use pixel::PixelBuffer;
pub use polygon::{close_shape, ClosedPolygon, ShapeDescriptor};
pub use progress::{CollectProgress, ProgressSink, TracingProgress};
pub use projection::UvProjector;
