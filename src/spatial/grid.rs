//! Coordinate grid overlay.
//!
//! Ticks are evenly spaced over the frame extent and labeled with rounded
//! board-global coordinates, so a reader can take a position straight off
//! the picture and use it in a create or update call.

use serde::Serialize;

use super::color::Color;
use super::encode::{Anchor, Primitive, Stroke};
use super::error::MapError;
use super::transform::{FrameBounds, Point};

const TICK_LENGTH: f64 = 10.0;
const TICK_FONT_SIZE: f64 = 10.0;
const TICK_COLOR: Color = Color::rgb(0x99, 0x99, 0x99);
const TICK_LABEL_COLOR: Color = Color::rgb(0x66, 0x66, 0x66);
const BORDER_COLOR: Color = Color::rgb(0x66, 0x66, 0x66);

/// Number of grid divisions per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GridDensity(u32);

impl GridDensity {
    pub const MIN: u32 = 4;
    pub const MAX: u32 = 20;
    pub const DEFAULT: u32 = 10;

    pub fn new(divisions: u32) -> Result<Self, MapError> {
        if (Self::MIN..=Self::MAX).contains(&divisions) {
            Ok(Self(divisions))
        } else {
            Err(MapError::InvalidGridDensity(divisions))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for GridDensity {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// One tick on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tick {
    /// Distance from the frame's left (x axis) or top (y axis) edge
    pub offset: f64,
    /// Board-global coordinate of the tick
    pub position: f64,
    /// Rounded global coordinate printed next to the tick
    pub label: i64,
}

/// Grid ticks for a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOverlay {
    bounds: FrameBounds,
    pub density: GridDensity,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
}

fn ticks(start: f64, extent: f64, divisions: u32) -> Vec<Tick> {
    (0..=divisions)
        .map(|i| {
            let offset = extent * f64::from(i) / f64::from(divisions);
            let position = start + offset;
            Tick {
                offset,
                position,
                label: position.round() as i64,
            }
        })
        .collect()
}

impl GridOverlay {
    pub fn new(bounds: &FrameBounds, density: GridDensity) -> Self {
        Self {
            bounds: *bounds,
            density,
            x_ticks: ticks(bounds.left(), bounds.size.width, density.get()),
            y_ticks: ticks(bounds.top(), bounds.size.height, density.get()),
        }
    }

    /// Tick marks, coordinate labels and the frame border. Labels sit just
    /// inside the frame edge so they stay in the rendered viewport.
    pub fn primitives(&self) -> Vec<Primitive> {
        let left = self.bounds.left();
        let top = self.bounds.top();
        let stroke = Stroke::solid(TICK_COLOR, 1.0);
        let mut out = Vec::with_capacity(4 * (self.x_ticks.len() + self.y_ticks.len()) + 1);

        for tick in &self.x_ticks {
            out.push(Primitive::Line {
                from: Point::new(tick.position, top),
                to: Point::new(tick.position, top + TICK_LENGTH),
                stroke,
            });
            out.push(Primitive::Label {
                at: Point::new(tick.position, top + TICK_LENGTH + 12.0),
                text: tick.label.to_string(),
                font_size: TICK_FONT_SIZE,
                color: TICK_LABEL_COLOR,
                anchor: Anchor::Middle,
            });
        }

        for tick in &self.y_ticks {
            out.push(Primitive::Line {
                from: Point::new(left, tick.position),
                to: Point::new(left + TICK_LENGTH, tick.position),
                stroke,
            });
            out.push(Primitive::Label {
                at: Point::new(left + TICK_LENGTH + 4.0, tick.position),
                text: tick.label.to_string(),
                font_size: TICK_FONT_SIZE,
                color: TICK_LABEL_COLOR,
                anchor: Anchor::Start,
            });
        }

        out.push(Primitive::Rect {
            origin: self.bounds.top_left(),
            size: self.bounds.size,
            fill: None,
            stroke: Some(Stroke::solid(BORDER_COLOR, 2.0)),
            corner_radius: 0.0,
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::transform::Size;

    fn offsets(ticks: &[Tick]) -> Vec<f64> {
        ticks.iter().map(|t| t.offset).collect()
    }

    #[test]
    fn test_density_bounds() {
        assert!(GridDensity::new(4).is_ok());
        assert!(GridDensity::new(20).is_ok());
        assert!(matches!(
            GridDensity::new(3),
            Err(MapError::InvalidGridDensity(3))
        ));
        assert!(GridDensity::new(21).is_err());
        assert_eq!(GridDensity::default().get(), 10);
    }

    #[test]
    fn test_density_four_on_square_frame() {
        let bounds = FrameBounds::new(Point::new(500.0, 500.0), Size::new(1000.0, 1000.0));
        let grid = GridOverlay::new(&bounds, GridDensity::new(4).unwrap());

        assert_eq!(offsets(&grid.x_ticks), vec![0.0, 250.0, 500.0, 750.0, 1000.0]);
        assert_eq!(offsets(&grid.y_ticks), vec![0.0, 250.0, 500.0, 750.0, 1000.0]);
        let labels: Vec<_> = grid.x_ticks.iter().map(|t| t.label).collect();
        assert_eq!(labels, vec![0, 250, 500, 750, 1000]);
    }

    #[test]
    fn test_labels_are_rounded_global_coordinates() {
        let bounds = FrameBounds::new(Point::new(-10.4, 3.0), Size::new(300.0, 90.0));
        let grid = GridOverlay::new(&bounds, GridDensity::new(4).unwrap());

        assert_eq!(grid.x_ticks.len(), 5);
        assert_eq!(grid.x_ticks[0].label, -160);
        assert_eq!(grid.x_ticks[4].label, 140);
        assert_eq!(grid.y_ticks[0].position, -42.0);
        assert_eq!(grid.y_ticks[1].label, -20);
    }

    #[test]
    fn test_primitives_count_and_border() {
        let bounds = FrameBounds::new(Point::new(0.0, 0.0), Size::new(1000.0, 500.0));
        let grid = GridOverlay::new(&bounds, GridDensity::new(5).unwrap());
        let primitives = grid.primitives();

        assert_eq!(primitives.len(), 2 * 6 + 2 * 6 + 1);
        assert!(matches!(
            primitives.last(),
            Some(Primitive::Rect { origin, .. }) if *origin == Point::new(-500.0, -250.0)
        ));
    }
}
