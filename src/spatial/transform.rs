//! Coordinate transform between board-global and frame-relative space.
//!
//! Board coordinates have their origin at the board center and item
//! positions name the item's center. Frame-relative coordinates have their
//! origin at the frame's top-left corner. Every consumer (the geometric
//! payload, the encoder, the grid) goes through the functions here so the
//! numbers and the picture cannot drift apart.

use std::collections::HashMap;

use serde::Serialize;

use crate::api::Item;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Frame size assumed when the frame has no usable geometry
pub const DEFAULT_FRAME_SIZE: Size = Size::new(1000.0, 1000.0);

/// Item size assumed when an item has no geometry
pub const DEFAULT_ITEM_SIZE: Size = Size::new(100.0, 100.0);

/// Smallest frame extent kept as reported; the SVG writes two decimals
const MIN_FRAME_DIMENSION: f64 = 1.0;

fn usable(dimension: Option<f64>) -> Option<f64> {
    dimension.filter(|d| d.is_finite() && *d >= MIN_FRAME_DIMENSION)
}

/// Global bounding box of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBounds {
    pub center: Point,
    pub size: Size,
}

impl FrameBounds {
    pub fn new(center: Point, size: Size) -> Self {
        Self { center, size }
    }

    /// Bounds of a frame item. Missing or degenerate dimensions, including
    /// any below one board unit, fall back to [`DEFAULT_FRAME_SIZE`] so grid
    /// spacing never divides a zero extent.
    ///
    /// The frame's own position is taken as board-global. A frame nested in
    /// another frame reports its position relative to that parent, which is
    /// not fetched here, so its bounds and the children lifted by
    /// [`FrameBounds::item_position`] stay in the parent's local space.
    pub fn of(frame: &Item) -> Self {
        let center = frame
            .position
            .as_ref()
            .map(|p| Point::new(p.x, p.y))
            .unwrap_or_default();
        let geometry = frame.geometry.as_ref();
        let size = Size::new(
            usable(geometry.and_then(|g| g.width)).unwrap_or(DEFAULT_FRAME_SIZE.width),
            usable(geometry.and_then(|g| g.height)).unwrap_or(DEFAULT_FRAME_SIZE.height),
        );
        Self { center, size }
    }

    pub fn left(&self) -> f64 {
        self.center.x - self.size.width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.center.y - self.size.height / 2.0
    }

    pub fn right(&self) -> f64 {
        self.center.x + self.size.width / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.center.y + self.size.height / 2.0
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left(), self.top())
    }

    /// Offset of a global point from the frame's top-left corner.
    pub fn to_relative(&self, global: Point) -> Point {
        Point::new(global.x - self.left(), global.y - self.top())
    }

    /// Global position of an item inside this frame.
    ///
    /// A missing position is (0,0). Positions Miro reports relative to the
    /// parent's top-left corner are lifted back into board space.
    pub fn item_position(&self, item: &Item) -> Point {
        match &item.position {
            None => Point::default(),
            Some(p) if p.is_parent_relative() => Point::new(self.left() + p.x, self.top() + p.y),
            Some(p) => Point::new(p.x, p.y),
        }
    }

    /// Center, frame-relative position and size of an item.
    pub fn place(&self, item: &Item) -> ItemBox {
        let center = self.item_position(item);
        ItemBox {
            center,
            relative: self.to_relative(center),
            size: item_size(item),
        }
    }
}

/// Rendered size of an item; each missing dimension defaults independently.
pub fn item_size(item: &Item) -> Size {
    let geometry = item.geometry.as_ref();
    Size::new(
        geometry
            .and_then(|g| g.width)
            .unwrap_or(DEFAULT_ITEM_SIZE.width),
        geometry
            .and_then(|g| g.height)
            .unwrap_or(DEFAULT_ITEM_SIZE.height),
    )
}

/// Resolved placement of one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBox {
    /// Global center
    pub center: Point,
    /// Center relative to the frame's top-left corner
    pub relative: Point,
    pub size: Size,
}

impl ItemBox {
    pub fn top_left(&self) -> Point {
        Point::new(
            self.center.x - self.size.width / 2.0,
            self.center.y - self.size.height / 2.0,
        )
    }

    pub fn top(&self) -> f64 {
        self.center.y - self.size.height / 2.0
    }
}

/// Placements of every item in a frame, indexed by item id.
pub struct Layout {
    bounds: FrameBounds,
    boxes: HashMap<String, ItemBox>,
}

impl Layout {
    pub fn new(bounds: FrameBounds, items: &[Item]) -> Self {
        let boxes = items
            .iter()
            .map(|item| (item.id.clone(), bounds.place(item)))
            .collect();
        Self { bounds, boxes }
    }

    pub fn bounds(&self) -> &FrameBounds {
        &self.bounds
    }

    pub fn get(&self, item_id: &str) -> Option<&ItemBox> {
        self.boxes.get(item_id)
    }

    pub fn place(&self, item: &Item) -> ItemBox {
        self.get(&item.id)
            .copied()
            .unwrap_or_else(|| self.bounds.place(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::testing::{frame, item};

    #[test]
    fn test_relative_position_formula() {
        let bounds = FrameBounds::of(&frame("f", 200.0, -100.0, 800.0, 600.0));
        let shape = item("a", "shape", Some((150.0, 50.0)), Some((40.0, 40.0)));
        let placed = bounds.place(&shape);

        assert_eq!(placed.center, Point::new(150.0, 50.0));
        assert_eq!(
            placed.relative,
            Point::new(150.0 - (200.0 - 400.0), 50.0 - (-100.0 - 300.0))
        );
    }

    #[test]
    fn test_frame_at_origin_example() {
        let bounds = FrameBounds::of(&frame("f", 0.0, 0.0, 1000.0, 1000.0));
        let a = item("a", "shape", Some((100.0, 100.0)), Some((50.0, 50.0)));
        assert_eq!(bounds.place(&a).relative, Point::new(600.0, 600.0));
    }

    #[test]
    fn test_missing_frame_geometry_defaults() {
        let mut f = frame("f", 10.0, 20.0, 0.0, 0.0);
        f.geometry = None;
        let bounds = FrameBounds::of(&f);
        assert_eq!(bounds.size, DEFAULT_FRAME_SIZE);
        assert_eq!(bounds.left(), 10.0 - 500.0);
        assert_eq!(bounds.bottom(), 20.0 + 500.0);

        let zero = FrameBounds::of(&frame("g", 0.0, 0.0, 0.0, 300.0));
        assert_eq!(zero.size, Size::new(1000.0, 300.0));
    }

    #[test]
    fn test_missing_item_position_and_geometry() {
        let bounds = FrameBounds::of(&frame("f", 0.0, 0.0, 1000.0, 1000.0));
        let bare = item("a", "text", None, None);
        let placed = bounds.place(&bare);
        assert_eq!(placed.center, Point::default());
        assert_eq!(placed.relative, Point::new(500.0, 500.0));
        assert_eq!(placed.size, DEFAULT_ITEM_SIZE);
    }

    #[test]
    fn test_sub_unit_frame_dimension_defaults() {
        let bounds = FrameBounds::of(&frame("f", 0.0, 0.0, 0.004, 500.0));
        assert_eq!(bounds.size, Size::new(DEFAULT_FRAME_SIZE.width, 500.0));
        let bounds = FrameBounds::of(&frame("f", 0.0, 0.0, 1.0, 500.0));
        assert_eq!(bounds.size, Size::new(1.0, 500.0));
    }

    #[test]
    fn test_nested_frame_position_is_taken_as_is() {
        let mut nested = frame("inner", 50.0, 40.0, 100.0, 80.0);
        nested.position.as_mut().unwrap().relative_to = Some("parent_top_left".to_string());
        let bounds = FrameBounds::of(&nested);
        assert_eq!(bounds.center, Point::new(50.0, 40.0));
        assert_eq!(bounds.top_left(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_partial_geometry_defaults_per_dimension() {
        let mut text = item("t", "text", Some((0.0, 0.0)), Some((320.0, 1.0)));
        text.geometry.as_mut().unwrap().height = None;
        assert_eq!(item_size(&text), Size::new(320.0, 100.0));
    }

    #[test]
    fn test_parent_relative_position_is_lifted() {
        let bounds = FrameBounds::of(&frame("f", 100.0, 100.0, 400.0, 200.0));
        let mut child = item("c", "sticky_note", Some((50.0, 60.0)), None);
        child.position.as_mut().unwrap().relative_to = Some("parent_top_left".to_string());

        let placed = bounds.place(&child);
        assert_eq!(placed.center, Point::new(-100.0 + 50.0, 0.0 + 60.0));
        assert_eq!(placed.relative, Point::new(50.0, 60.0));
    }

    #[test]
    fn test_layout_lookup() {
        let bounds = FrameBounds::of(&frame("f", 0.0, 0.0, 1000.0, 1000.0));
        let items = vec![item("a", "shape", Some((1.0, 2.0)), None)];
        let layout = Layout::new(bounds, &items);
        assert_eq!(layout.get("a").unwrap().center, Point::new(1.0, 2.0));
        assert!(layout.get("missing").is_none());
        assert_eq!(layout.place(&items[0]), bounds.place(&items[0]));
    }
}
