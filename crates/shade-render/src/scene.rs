//! JSON scene files: a mesh, its guide lines and shape outlines, and optional
//! shading settings.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shade_kernel::geometry::point::Point3d;
use shade_kernel::geometry::transform::LinearTransform;
use shade_kernel::mesh::{Mesh, Stroke, StrokeSet};
use shade_raster::{ShadingConfig, ShadingRequest};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub mesh: Mesh,
    #[serde(default)]
    pub guide_lines: Option<StrokeSet>,
    #[serde(default)]
    pub shadows: Vec<StrokeSet>,
    #[serde(default)]
    pub highlights: Vec<StrokeSet>,
    /// Settings stored with the scene. Command-line flags override them.
    #[serde(default)]
    pub config: Option<ShadingConfig>,
}

impl Scene {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read scene {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse scene {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("failed to write scene {}", path.display()))
    }

    pub fn request(&self) -> ShadingRequest<'_> {
        ShadingRequest {
            mesh: &self.mesh,
            guide_lines: self.guide_lines.as_ref(),
            shadows: &self.shadows,
            highlights: &self.highlights,
        }
    }

    /// A flat 2x2 sheet tilted a quarter turn about X, three bowed guide
    /// lines, a nose shadow that overshoots its start and a cheek highlight.
    pub fn demo() -> Self {
        let tilt = LinearTransform::rotation_x(std::f64::consts::FRAC_PI_2);
        let mesh = Mesh::from_faces(Mesh::uv_grid(2.0, 2.0, 8, 8).faces, tilt);

        let curve = |points: &[(f64, f64)]| {
            Stroke::new(points.iter().map(|&(x, y)| Point3d::new(x, y, 0.0)).collect())
        };

        let guide_lines = StrokeSet::new(
            tilt,
            vec![
                curve(&[(0.5, 0.0), (0.6, 0.8), (0.55, 1.4), (0.5, 2.0)]),
                curve(&[(1.0, 0.0), (1.1, 0.9), (1.05, 1.5), (1.0, 2.0)]),
                curve(&[(1.5, 0.0), (1.55, 1.0), (1.5, 2.0)]),
            ],
        );
        let shadows = vec![StrokeSet::single(
            tilt,
            curve(&[
                (0.8, 0.7),
                (1.2, 0.7),
                (1.25, 1.0),
                (1.0, 1.3),
                (0.75, 1.0),
                (0.85, 0.6),
            ]),
        )];
        let highlights = vec![StrokeSet::single(
            tilt,
            curve(&[(1.3, 0.5), (1.7, 0.5), (1.75, 0.9), (1.4, 1.0)]),
        )];

        Self {
            mesh,
            guide_lines: Some(guide_lines),
            shadows,
            highlights,
            config: None,
        }
    }
}
