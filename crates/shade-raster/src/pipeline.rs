//! The batch driver: projection, gradient, shapes, blur.
//!
//! Work fans out over a bounded rayon pool in phases. Every parallel task is a
//! pure function of shared read-only data and returns its value; the calling
//! thread writes results into the pixel buffer by index, so the image does not
//! depend on task completion order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use shade_kernel::geometry::point::Point2d;
use shade_kernel::geometry::transform::LinearTransform;
use shade_kernel::mesh::{Mesh, Stroke, StrokeSet};
use tracing::{debug, info, instrument};

use crate::composite::{apply_shape, box_blur, ShapeKind};
use crate::error::{ShadeError, StrokeRole};
use crate::gradient::{row_intercepts, GradientField};
use crate::pixel::PixelBuffer;
use crate::polygon::{close_shape, ShapeDescriptor};
use crate::progress::ProgressSink;
use crate::projection::UvProjector;

pub const DEFAULT_BLUR_SIZE: usize = 25;
pub const DEFAULT_WORKERS: usize = 8;

/// Tunables for a shading run. Missing fields take their defaults when
/// deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Box blur kernel width in pixels. 1 disables blurring.
    pub blur_size: usize,
    /// Worker threads in the pool built for the run.
    pub workers: usize,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            blur_size: DEFAULT_BLUR_SIZE,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl ShadingConfig {
    pub fn with_blur_size(self, blur_size: usize) -> Self {
        Self { blur_size, ..self }
    }

    pub fn with_workers(self, workers: usize) -> Self {
        Self { workers, ..self }
    }

    pub fn validate(&self) -> Result<(), ShadeError> {
        if self.blur_size == 0 {
            return Err(ShadeError::InvalidBlurSize);
        }
        if self.workers == 0 {
            return Err(ShadeError::InvalidWorkerCount);
        }
        Ok(())
    }
}

/// Inputs of a shading run, borrowed from the host for its duration.
///
/// Guide lines are required. Shadow and highlight sets may be empty; each of
/// their strokes becomes one shape, composited in order, shadows first.
#[derive(Debug, Clone, Copy)]
pub struct ShadingRequest<'a> {
    pub mesh: &'a Mesh,
    pub guide_lines: Option<&'a StrokeSet>,
    pub shadows: &'a [StrokeSet],
    pub highlights: &'a [StrokeSet],
}

impl<'a> ShadingRequest<'a> {
    pub fn new(mesh: &'a Mesh, guide_lines: &'a StrokeSet) -> Self {
        Self {
            mesh,
            guide_lines: Some(guide_lines),
            shadows: &[],
            highlights: &[],
        }
    }

    pub fn with_shadows(self, shadows: &'a [StrokeSet]) -> Self {
        Self { shadows, ..self }
    }

    pub fn with_highlights(self, highlights: &'a [StrokeSet]) -> Self {
        Self { highlights, ..self }
    }
}

/// What happened to one shape outline.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSummary {
    pub kind: ShapeKind,
    /// Position among the strokes of its kind.
    pub index: usize,
    pub polygon_points: usize,
    /// False when the outline never crossed itself and was closed naively.
    pub closed_at_crossing: bool,
    /// Pixels the shape blended into.
    pub pixels: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShadingReport {
    pub guide_lines: usize,
    pub shapes: Vec<ShapeSummary>,
}

struct ProjectionJob<'a> {
    role: StrokeRole,
    index: usize,
    stroke: &'a Stroke,
    transform: &'a LinearTransform,
}

fn jobs_for<'a>(role: StrokeRole, sets: &'a [StrokeSet]) -> impl Iterator<Item = ProjectionJob<'a>> {
    sets.iter()
        .flat_map(|set| set.strokes.iter().map(move |stroke| (stroke, &set.transform)))
        .enumerate()
        .map(move |(index, (stroke, transform))| ProjectionJob {
            role,
            index,
            stroke,
            transform,
        })
}

fn role_of(kind: ShapeKind) -> StrokeRole {
    match kind {
        ShapeKind::Shadow => StrokeRole::Shadow,
        ShapeKind::Highlight => StrokeRole::Highlight,
    }
}

/// Render the shading texture into `target`, overwriting all of it.
///
/// Configuration is checked before any work starts. If any stage fails the
/// target keeps its previous contents. Stage and error messages go to
/// `progress`.
#[instrument(skip_all, fields(width = target.width(), height = target.height()))]
pub fn shade(
    request: &ShadingRequest<'_>,
    config: &ShadingConfig,
    target: &mut PixelBuffer,
    progress: &dyn ProgressSink,
) -> Result<ShadingReport, ShadeError> {
    let result = shade_into(request, config, target, progress);
    match &result {
        Ok(_) => progress.message("Done!"),
        Err(err) => progress.message(&format!("Error: {err}")),
    }
    result
}

fn shade_into(
    request: &ShadingRequest<'_>,
    config: &ShadingConfig,
    target: &mut PixelBuffer,
    progress: &dyn ProgressSink,
) -> Result<ShadingReport, ShadeError> {
    config.validate()?;
    let guide_lines = request
        .guide_lines
        .ok_or(ShadeError::MissingInput("guide lines"))?;
    let (width, height) = (target.width(), target.height());
    if width == 0 || height == 0 {
        return Err(ShadeError::InvalidImageSize { width, height });
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()?;
    let (buffer, report) = pool.install(|| {
        render(request, guide_lines, config, width, height, progress)
    })?;

    *target = buffer;
    Ok(report)
}

fn render(
    request: &ShadingRequest<'_>,
    guide_lines: &StrokeSet,
    config: &ShadingConfig,
    width: usize,
    height: usize,
    progress: &dyn ProgressSink,
) -> Result<(PixelBuffer, ShadingReport), ShadeError> {
    let projector = UvProjector::new(request.mesh)?;

    let jobs: Vec<ProjectionJob<'_>> = jobs_for(StrokeRole::GuideLine, std::slice::from_ref(guide_lines))
        .chain(jobs_for(StrokeRole::Shadow, request.shadows))
        .chain(jobs_for(StrokeRole::Highlight, request.highlights))
        .collect();
    if let Some(job) = jobs.iter().find(|job| job.stroke.is_empty()) {
        return Err(ShadeError::EmptyStroke {
            role: job.role,
            index: job.index,
        });
    }

    // Phase 1: one task per stroke.
    progress.message("Mapping face strokes to UV coordinates...");
    let projected: Vec<Vec<Point2d>> = jobs
        .par_iter()
        .map(|job| projector.project_stroke(job.stroke, job.transform))
        .collect::<Result<_, _>>()?;
    info!(
        strokes = projected.len(),
        faces = projector.face_count(),
        "projected strokes"
    );

    let mut lines = Vec::new();
    let mut shapes = Vec::new();
    for (job, points) in jobs.iter().zip(projected) {
        match job.role {
            StrokeRole::GuideLine => lines.push(points),
            StrokeRole::Shadow => shapes.push((ShapeKind::Shadow, job.index, points)),
            StrokeRole::Highlight => shapes.push((ShapeKind::Highlight, job.index, points)),
        }
    }

    // Phase 2: per-row intercepts, one task per guide line.
    progress.message("Finding row intersection points...");
    let intercepts: Vec<Vec<f64>> = lines
        .par_iter()
        .enumerate()
        .map(|(index, line)| {
            row_intercepts(line, height).ok_or(ShadeError::EmptyStroke {
                role: StrokeRole::GuideLine,
                index,
            })
        })
        .collect::<Result<_, _>>()?;
    let field = GradientField::new(&intercepts, width, height);

    // Phase 3: one task per pixel.
    progress.message("Calculating base pixels...");
    let mut buffer = PixelBuffer::new(width, height);
    let base: Vec<f64> = (0..buffer.len())
        .into_par_iter()
        .map(|i| field.value_at_index(i))
        .collect();
    buffer.values_mut().copy_from_slice(&base);

    // Phase 4: per shape, one task per pixel, blended here in order.
    let mut summaries = Vec::with_capacity(shapes.len());
    for (kind, index, outline) in shapes {
        progress.message(&format!("Closing off {} shape {index}...", kind.label()));
        let polygon = close_shape(&outline);
        let closed_at_crossing = polygon.crossing.is_some();
        let polygon_points = polygon.len();
        let descriptor = ShapeDescriptor::new(polygon).ok_or(ShadeError::EmptyStroke {
            role: role_of(kind),
            index,
        })?;

        progress.message(&format!("Calculating {} pixels...", kind.label()));
        let ratios: Vec<Option<f64>> = (0..buffer.len())
            .into_par_iter()
            .map(|i| descriptor.falloff(buffer.position(i)))
            .collect();
        let pixels = apply_shape(&mut buffer, kind, &ratios);
        debug!(
            kind = kind.label(),
            index,
            polygon_points,
            closed_at_crossing,
            pixels,
            "composited shape"
        );

        summaries.push(ShapeSummary {
            kind,
            index,
            polygon_points,
            closed_at_crossing,
            pixels,
        });
    }

    progress.message("Blurring image...");
    box_blur(&mut buffer, config.blur_size);
    progress.message("Updating image...");

    info!(
        guide_lines = lines.len(),
        shapes = summaries.len(),
        blur = config.blur_size,
        "shading complete"
    );
    Ok((
        buffer,
        ShadingReport {
            guide_lines: lines.len(),
            shapes: summaries,
        },
    ))
}

/// Run the pipeline on a fresh `width` x `height` image and return its RGBA
/// payload (gray in all colour channels, alpha 1.0).
pub fn render_rgba(
    request: &ShadingRequest<'_>,
    config: &ShadingConfig,
    width: usize,
    height: usize,
    progress: &dyn ProgressSink,
) -> Result<Vec<f32>, ShadeError> {
    let mut target = PixelBuffer::new(width, height);
    shade(request, config, &mut target, progress)?;
    Ok(target.to_rgba())
}
