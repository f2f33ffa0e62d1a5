use std::fmt;

use shade_kernel::GeometryError;
use thiserror::Error;

/// Which input collection a stroke came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrokeRole {
    GuideLine,
    Shadow,
    Highlight,
}

impl fmt::Display for StrokeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrokeRole::GuideLine => write!(f, "guide line"),
            StrokeRole::Shadow => write!(f, "shadow"),
            StrokeRole::Highlight => write!(f, "highlight"),
        }
    }
}

/// Failures of a shading run.
///
/// Configuration problems are reported before the output buffer is touched.
/// Geometric problems abort the run; no partial image is written.
#[derive(Debug, Error)]
pub enum ShadeError {
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("Invalid output image size {width}x{height}")]
    InvalidImageSize { width: usize, height: usize },

    #[error("Blur kernel size must be at least 1")]
    InvalidBlurSize,

    #[error("Worker pool needs at least one thread")]
    InvalidWorkerCount,

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Mesh has no faces to project onto")]
    EmptyMesh,

    #[error("{role} stroke {index} has no points")]
    EmptyStroke { role: StrokeRole, index: usize },

    #[error("Face {face} cannot be used for projection: {source}")]
    DegenerateFace {
        face: usize,
        #[source]
        source: GeometryError,
    },
}
