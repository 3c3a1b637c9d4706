//! Per-item visual encodings.
//!
//! Each supported item type maps to a fixed set of drawing primitives in
//! board-global coordinates. The render backends only ever see primitives.

use crate::api::{ConnectorEnd, Item, ItemType, Style};

use super::color::Color;
use super::transform::{ItemBox, Layout, Point, Size};

/// Longest label, in characters, before truncation
pub const MAX_LABEL_CHARS: usize = 40;

const LABEL_FONT_SIZE: f64 = 12.0;
const MARKER_FONT_SIZE: f64 = 14.0;

const ARROW_LENGTH: f64 = 12.0;
const ARROW_HALF_WIDTH: f64 = 5.0;

const LABEL_COLOR: Color = Color::rgb(0x33, 0x33, 0x33);
const DEFAULT_BORDER: Color = Color::BLACK;
const DEFAULT_CONNECTOR: Color = Color::rgb(0x33, 0x33, 0x33);
const TEXT_OUTLINE: Color = Color::rgb(0xcc, 0xcc, 0xcc);
const IMAGE_FILL: Color = Color::rgb(0xee, 0xee, 0xff);
const FRAME_OUTLINE: Color = Color::rgb(0x00, 0x66, 0xff);
const OTHER_OUTLINE: Color = Color::rgb(0x99, 0x99, 0x99);

/// Visual category an item is drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    Shape,
    StickyNote,
    Text,
    Image,
    Frame,
    Connector,
    Other,
}

impl From<&ItemType> for VisualKind {
    fn from(item_type: &ItemType) -> Self {
        match item_type {
            ItemType::Shape => VisualKind::Shape,
            ItemType::StickyNote => VisualKind::StickyNote,
            ItemType::Text => VisualKind::Text,
            ItemType::Image => VisualKind::Image,
            ItemType::Frame => VisualKind::Frame,
            ItemType::Connector | ItemType::Line => VisualKind::Connector,
            _ => VisualKind::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// Dash and gap lengths; solid when `None`
    pub dash: Option<(f64, f64)>,
}

impl Stroke {
    pub const fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub const fn dashed(color: Color, width: f64, dash: f64, gap: f64) -> Self {
        Self {
            color,
            width,
            dash: Some((dash, gap)),
        }
    }
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        origin: Point,
        size: Size,
        fill: Option<Color>,
        stroke: Option<Stroke>,
        corner_radius: f64,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Polygon {
        points: Vec<Point>,
        fill: Color,
    },
    /// Plain text; `at` is the anchor point on the vertical center line.
    Label {
        at: Point,
        text: String,
        font_size: f64,
        color: Color,
        anchor: Anchor,
    },
}

/// Outcome of encoding one item.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    Drawn(Vec<Primitive>),
    /// Connector with an endpoint that could not be resolved
    SkippedConnector,
}

/// Encode one item. Text labels are produced only when `include_text` is set;
/// the `[IMAGE]` and `[FRAME]` markers are always drawn.
pub fn encode_item(item: &Item, layout: &Layout, include_text: bool) -> Encoded {
    let placed = layout.place(item);
    let style = item.style.as_ref();

    let mut primitives = match VisualKind::from(&item.item_type) {
        VisualKind::Connector => return encode_connector(item, layout),
        VisualKind::Shape => vec![filled_rect(&placed, style, 0.0)],
        VisualKind::StickyNote => vec![filled_rect(&placed, style, 5.0)],
        VisualKind::Text => vec![outline(&placed, Stroke::dashed(TEXT_OUTLINE, 1.0, 5.0, 5.0))],
        VisualKind::Image => vec![
            rect(&placed, Some(IMAGE_FILL), Some(border_stroke(style))),
            marker(placed.center, "[IMAGE]"),
        ],
        VisualKind::Frame => vec![
            outline(&placed, Stroke::dashed(FRAME_OUTLINE, 2.0, 10.0, 5.0)),
            marker(Point::new(placed.center.x, placed.top() + 20.0), "[FRAME]"),
        ],
        VisualKind::Other => vec![outline(&placed, Stroke::dashed(OTHER_OUTLINE, 1.0, 3.0, 3.0))],
    };

    let label = include_text
        .then(|| item.content().and_then(label_text))
        .flatten();
    if let Some(text) = label {
        primitives.push(Primitive::Label {
            at: placed.center,
            text,
            font_size: LABEL_FONT_SIZE,
            color: LABEL_COLOR,
            anchor: Anchor::Middle,
        });
    }
    Encoded::Drawn(primitives)
}

fn rect(placed: &ItemBox, fill: Option<Color>, stroke: Option<Stroke>) -> Primitive {
    Primitive::Rect {
        origin: placed.top_left(),
        size: placed.size,
        fill,
        stroke,
        corner_radius: 0.0,
    }
}

fn outline(placed: &ItemBox, stroke: Stroke) -> Primitive {
    rect(placed, None, Some(stroke))
}

fn filled_rect(placed: &ItemBox, style: Option<&Style>, corner_radius: f64) -> Primitive {
    let fill = style
        .and_then(|s| s.fill_color.as_deref())
        .and_then(Color::parse)
        .unwrap_or(Color::WHITE);

    Primitive::Rect {
        origin: placed.top_left(),
        size: placed.size,
        fill: Some(fill),
        stroke: Some(border_stroke(style)),
        corner_radius,
    }
}

/// Item border from its style, black and 1 wide by default.
fn border_stroke(style: Option<&Style>) -> Stroke {
    let color = style
        .and_then(|s| s.border_color.as_deref())
        .and_then(Color::parse)
        .unwrap_or(DEFAULT_BORDER);
    let width = style
        .and_then(|s| s.border_width)
        .filter(|w| w.is_finite() && *w >= 0.0)
        .unwrap_or(1.0);
    Stroke::solid(color, width)
}

fn marker(at: Point, text: &str) -> Primitive {
    Primitive::Label {
        at,
        text: text.to_string(),
        font_size: MARKER_FONT_SIZE,
        color: LABEL_COLOR,
        anchor: Anchor::Middle,
    }
}

fn encode_connector(item: &Item, layout: &Layout) -> Encoded {
    let geometry = item.geometry.as_ref();
    let start = geometry.and_then(|g| resolve_end(g.start.as_ref(), layout));
    let end = geometry.and_then(|g| resolve_end(g.end.as_ref(), layout));
    let (Some(from), Some(to)) = (start, end) else {
        return Encoded::SkippedConnector;
    };

    let style = item.style.as_ref();
    let color = style
        .and_then(|s| s.extra.get("strokeColor"))
        .and_then(|v| v.as_str())
        .or_else(|| style.and_then(|s| s.border_color.as_deref()))
        .and_then(Color::parse)
        .unwrap_or(DEFAULT_CONNECTOR);
    let stroke = Stroke::solid(color, 2.0);

    let mut primitives = vec![Primitive::Line { from, to, stroke }];
    primitives.extend(arrowhead(from, to, color));
    Encoded::Drawn(primitives)
}

/// Explicit coordinates win; otherwise the referenced item's center.
fn resolve_end(end: Option<&ConnectorEnd>, layout: &Layout) -> Option<Point> {
    let end = end?;
    if let (Some(x), Some(y)) = (end.x, end.y) {
        return Some(Point::new(x, y));
    }
    layout.get(end.item.as_deref()?).map(|b| b.center)
}

/// Triangle at `to` pointing along the segment. `None` for a zero-length
/// segment, which has no direction.
fn arrowhead(from: Point, to: Point, color: Color) -> Option<Primitive> {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let length = dx.hypot(dy);
    if length < f64::EPSILON {
        return None;
    }
    let (ux, uy) = (dx / length, dy / length);
    let depth = ARROW_LENGTH.min(length);
    let base = Point::new(to.x - ux * depth, to.y - uy * depth);
    let (px, py) = (-uy * ARROW_HALF_WIDTH, ux * ARROW_HALF_WIDTH);

    Some(Primitive::Polygon {
        points: vec![
            to,
            Point::new(base.x + px, base.y + py),
            Point::new(base.x - px, base.y - py),
        ],
        fill: color,
    })
}

/// Plain-text label from item content: markup stripped, entities decoded,
/// whitespace collapsed and long text truncated. `None` when nothing
/// printable remains.
pub fn label_text(content: &str) -> Option<String> {
    plain_text(content).map(|text| truncate(&text, MAX_LABEL_CHARS))
}

/// Item content without markup, untruncated.
pub fn plain_text(content: &str) -> Option<String> {
    let text = collapse_whitespace(&decode_entities(&strip_tags(content)));
    (!text.is_empty()).then_some(text)
}

fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
