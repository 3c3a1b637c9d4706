//! Scene rendering backends.
//!
//! A [`Scene`] is a viewport (the frame bounds) plus an ordered list of
//! primitives. Backends turn it into an [`Artifact`]; SVG is written
//! directly and PNG is rasterized from the same SVG markup.

mod raster;
mod svg;

use std::fmt;

use base64::Engine;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use raster::PngRenderer;
use svg::SvgRenderer;

use super::encode::Primitive;
use super::transform::FrameBounds;

/// Output format of a spatial map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    #[default]
    Svg,
    Png,
}

impl ArtifactFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ArtifactFormat::Svg => "image/svg+xml",
            ArtifactFormat::Png => "image/png",
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArtifactFormat::Svg => "svg",
            ArtifactFormat::Png => "png",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("generated SVG could not be parsed: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("cannot allocate a {width}x{height} raster surface")]
    Surface { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("rasterizer task failed: {0}")]
    Task(String),
}

/// Everything a backend needs to draw one map.
#[derive(Debug, Clone)]
pub struct Scene {
    pub viewport: FrameBounds,
    pub primitives: Vec<Primitive>,
}

/// Rendered map bytes.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub format: ArtifactFormat,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// SVG markup; `None` for binary formats.
    pub fn as_text(&self) -> Option<&str> {
        match self.format {
            ArtifactFormat::Svg => std::str::from_utf8(&self.bytes).ok(),
            ArtifactFormat::Png => None,
        }
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// A rendering backend.
pub trait SceneRenderer {
    fn format(&self) -> ArtifactFormat;

    fn render(&self, scene: &Scene) -> Result<Vec<u8>, RenderError>;
}

/// Render a scene in the requested format.
///
/// Rasterization is CPU-bound, so callers on the async runtime should run
/// this on the blocking pool.
pub fn render_scene(scene: &Scene, format: ArtifactFormat) -> Result<Artifact, RenderError> {
    let png = PngRenderer::default();
    let renderer: &dyn SceneRenderer = match format {
        ArtifactFormat::Svg => &SvgRenderer,
        ArtifactFormat::Png => &png,
    };
    Ok(Artifact {
        format: renderer.format(),
        bytes: renderer.render(scene)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::transform::{Point, Size};

    #[test]
    fn test_format_names_and_mime() {
        assert_eq!(ArtifactFormat::default(), ArtifactFormat::Svg);
        assert_eq!(ArtifactFormat::Png.mime_type(), "image/png");
        assert_eq!(ArtifactFormat::Svg.to_string(), "svg");
        let parsed: ArtifactFormat = serde_json::from_str("\"png\"").unwrap();
        assert_eq!(parsed, ArtifactFormat::Png);
    }

    #[test]
    fn test_svg_artifact_is_text() {
        let scene = Scene {
            viewport: FrameBounds::new(Point::new(0.0, 0.0), Size::new(100.0, 100.0)),
            primitives: vec![],
        };
        let artifact = render_scene(&scene, ArtifactFormat::Svg).unwrap();
        assert_eq!(artifact.mime_type(), "image/svg+xml");
        assert!(artifact.as_text().unwrap().contains("<svg"));
        assert!(!artifact.to_base64().is_empty());
    }
}
