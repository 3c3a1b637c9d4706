use std::fmt::Write;

use super::{ArtifactFormat, RenderError, Scene, SceneRenderer};
use crate::spatial::color::Color;
use crate::spatial::encode::{Anchor, Primitive, Stroke};

const FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";

/// Writes a scene as SVG markup.
///
/// The viewBox equals the frame's global bounding box, so primitive
/// coordinates are written unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;

impl SvgRenderer {
    pub fn markup(&self, scene: &Scene) -> String {
        let view = &scene.viewport;
        let mut out = String::with_capacity(256 + scene.primitives.len() * 128);

        // Writing into a String cannot fail.
        let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{x} {y} {w} {h}" font-family="{font}">"#,
            w = num(view.size.width),
            h = num(view.size.height),
            x = num(view.left()),
            y = num(view.top()),
            font = FONT_FAMILY,
        );
        for primitive in &scene.primitives {
            write_primitive(&mut out, primitive);
        }
        out.push_str("</svg>\n");
        out
    }
}

impl SceneRenderer for SvgRenderer {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::Svg
    }

    fn render(&self, scene: &Scene) -> Result<Vec<u8>, RenderError> {
        Ok(self.markup(scene).into_bytes())
    }
}

fn write_primitive(out: &mut String, primitive: &Primitive) {
    let _ = match primitive {
        Primitive::Rect {
            origin,
            size,
            fill,
            stroke,
            corner_radius,
        } => {
            let radius = if *corner_radius > 0.0 {
                format!(r#" rx="{0}" ry="{0}""#, num(*corner_radius))
            } else {
                String::new()
            };
            writeln!(
                out,
                r#"  <rect x="{}" y="{}" width="{}" height="{}"{}{}{}/>"#,
                num(origin.x),
                num(origin.y),
                num(size.width),
                num(size.height),
                radius,
                fill_attrs(*fill),
                stroke_attrs(stroke.as_ref()),
            )
        }
        Primitive::Line { from, to, stroke } => writeln!(
            out,
            r#"  <line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y),
            stroke_attrs(Some(stroke)),
        ),
        Primitive::Polygon { points, fill } => {
            let points = points
                .iter()
                .map(|p| format!("{},{}", num(p.x), num(p.y)))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(
                out,
                r#"  <polygon points="{}"{}/>"#,
                points,
                fill_attrs(Some(*fill))
            )
        }
        Primitive::Label {
            at,
            text,
            font_size,
            color,
            anchor,
        } => writeln!(
            out,
            r#"  <text x="{}" y="{}" font-size="{}" text-anchor="{}" dominant-baseline="middle"{}>{}</text>"#,
            num(at.x),
            num(at.y),
            num(*font_size),
            match anchor {
                Anchor::Start => "start",
                Anchor::Middle => "middle",
            },
            fill_attrs(Some(*color)),
            escape(text),
        ),
    };
}

fn fill_attrs(fill: Option<Color>) -> String {
    match fill {
        None => r#" fill="none""#.to_string(),
        Some(c) if c.a == 0 => r#" fill="none""#.to_string(),
        Some(c) if c.is_opaque() => format!(r#" fill="{}""#, c.to_hex()),
        Some(c) => format!(
            r#" fill="{}" fill-opacity="{}""#,
            c.to_hex(),
            num(c.opacity())
        ),
    }
}

fn stroke_attrs(stroke: Option<&Stroke>) -> String {
    let Some(stroke) = stroke else {
        return String::new();
    };
    let mut attrs = format!(
        r#" stroke="{}" stroke-width="{}""#,
        stroke.color.to_hex(),
        num(stroke.width)
    );
    if let Some((dash, gap)) = stroke.dash {
        let _ = write!(attrs, r#" stroke-dasharray="{},{}""#, num(dash), num(gap));
    }
    attrs
}

/// Shortest decimal form with at most two fractional digits.
fn num(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Escape text for element content and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::transform::{FrameBounds, Point, Size};

    fn scene(primitives: Vec<Primitive>) -> Scene {
        Scene {
            viewport: FrameBounds::new(Point::new(0.0, 0.0), Size::new(1000.0, 800.0)),
            primitives,
        }
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(100.0), "100");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(12.5), "12.5");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-250.0), "-250");
    }

    #[test]
    fn test_viewbox_matches_frame_bounds() {
        let svg = SvgRenderer.markup(&scene(vec![]));
        assert!(svg.contains(r#"viewBox="-500 -400 1000 800""#));
        assert!(svg.contains(r#"width="1000" height="800""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_primitives_are_written() {
        let svg = SvgRenderer.markup(&scene(vec![
            Primitive::Rect {
                origin: Point::new(-10.0, -10.0),
                size: Size::new(20.0, 20.0),
                fill: Some(Color::WHITE.with_alpha(0)),
                stroke: Some(Stroke::dashed(Color::rgb(0, 0x66, 0xff), 2.0, 10.0, 5.0)),
                corner_radius: 5.0,
            },
            Primitive::Line {
                from: Point::new(0.0, 0.0),
                to: Point::new(10.0, 0.0),
                stroke: Stroke::solid(Color::BLACK, 1.0),
            },
            Primitive::Polygon {
                points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(1.0, -1.0)],
                fill: Color::BLACK,
            },
        ]));

        assert!(svg.contains(
            r##"<rect x="-10" y="-10" width="20" height="20" rx="5" ry="5" fill="none" stroke="#0066ff" stroke-width="2" stroke-dasharray="10,5"/>"##
        ));
        assert!(svg.contains(r##"<line x1="0" y1="0" x2="10" y2="0" stroke="#000000" stroke-width="1"/>"##));
        assert!(svg.contains(r##"<polygon points="0,0 1,1 1,-1" fill="#000000"/>"##));
    }

    #[test]
    fn test_label_text_is_escaped() {
        let svg = SvgRenderer.markup(&scene(vec![Primitive::Label {
            at: Point::new(0.0, 0.0),
            text: "a < b & \"c\"".to_string(),
            font_size: 12.0,
            color: Color::BLACK,
            anchor: Anchor::Middle,
        }]));
        assert!(svg.contains("a &lt; b &amp; &quot;c&quot;</text>"));
        assert!(svg.contains(r#"text-anchor="middle""#));
    }

    #[test]
    fn test_translucent_fill() {
        assert_eq!(
            fill_attrs(Some(Color::WHITE.with_alpha(51))),
            r##" fill="#ffffff" fill-opacity="0.2""##
        );
    }
}
