use std::sync::{Arc, OnceLock};

use resvg::tiny_skia::{Color as SkiaColor, Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use tracing::debug;

use super::svg::SvgRenderer;
use super::{ArtifactFormat, RenderError, Scene, SceneRenderer};

/// Longest PNG edge in pixels; larger frames are scaled down to fit
pub const DEFAULT_MAX_DIMENSION: u32 = 2048;

static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

/// System fonts, loaded once per process.
fn fonts() -> Arc<fontdb::Database> {
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            debug!("Loaded {} font faces for rasterization", db.len());
            Arc::new(db)
        })
        .clone()
}

/// Rasterizes a scene to PNG through the SVG backend.
#[derive(Debug, Clone, Copy)]
pub struct PngRenderer {
    pub max_dimension: u32,
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }
}

impl PngRenderer {
    fn scale_for(&self, width: f32, height: f32) -> f32 {
        let longest = width.max(height);
        if longest <= 0.0 {
            return 1.0;
        }
        (self.max_dimension as f32 / longest).min(1.0)
    }
}

impl SceneRenderer for PngRenderer {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::Png
    }

    fn render(&self, scene: &Scene) -> Result<Vec<u8>, RenderError> {
        let markup = SvgRenderer.markup(scene);

        let mut options = usvg::Options::default();
        options.fontdb = fonts();
        let tree = usvg::Tree::from_str(&markup, &options)?;

        let size = tree.size();
        let scale = self.scale_for(size.width(), size.height());
        let width = (size.width() * scale).ceil().max(1.0) as u32;
        let height = (size.height() * scale).ceil().max(1.0) as u32;

        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::Surface { width, height })?;
        pixmap.fill(SkiaColor::WHITE);
        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::color::Color;
    use crate::spatial::encode::{Primitive, Stroke};
    use crate::spatial::transform::{FrameBounds, Point, Size};

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn test_png_has_magic_bytes() {
        let scene = Scene {
            viewport: FrameBounds::new(Point::new(0.0, 0.0), Size::new(200.0, 100.0)),
            primitives: vec![Primitive::Rect {
                origin: Point::new(-50.0, -25.0),
                size: Size::new(100.0, 50.0),
                fill: Some(Color::rgb(255, 0, 0)),
                stroke: Some(Stroke::solid(Color::BLACK, 1.0)),
                corner_radius: 0.0,
            }],
        };

        let png = PngRenderer::default().render(&scene).unwrap();
        assert_eq!(&png[..8], &PNG_MAGIC);
    }

    #[test]
    fn test_large_frames_are_scaled_down() {
        let renderer = PngRenderer { max_dimension: 500 };
        assert_eq!(renderer.scale_for(1000.0, 250.0), 0.5);
        assert_eq!(renderer.scale_for(100.0, 100.0), 1.0);
    }
}
