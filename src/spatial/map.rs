//! Frame spatial map orchestration.
//!
//! Validate the request, confirm the target is a frame, aggregate its
//! children, place them, then produce the geometric payload and the rendered
//! artifact from the same placements.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::{Item, ItemQuery, ItemType, Style, MAX_PAGE_SIZE, MIN_PAGE_SIZE};

use super::aggregate::{fetch_all_items, ItemSource};
use super::color::Color;
use super::encode::{encode_item, plain_text, Encoded, Primitive};
use super::error::MapError;
use super::grid::{GridDensity, GridOverlay, Tick};
use super::render::{render_scene, Artifact, ArtifactFormat, RenderError, Scene};
use super::transform::{FrameBounds, Layout, Point};

/// Validated spatial-map request.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialMapRequest {
    pub board_id: String,
    pub frame_id: String,
    pub include_text: bool,
    pub grid_density: GridDensity,
    pub format: ArtifactFormat,
    /// Items requested per listing page
    pub page_size: u32,
}

impl SpatialMapRequest {
    /// Check every argument before any network traffic happens.
    pub fn new(
        board_id: impl Into<String>,
        frame_id: impl Into<String>,
        include_text: bool,
        grid_density: Option<u32>,
        format: ArtifactFormat,
    ) -> Result<Self, MapError> {
        let board_id = board_id.into();
        let frame_id = frame_id.into();
        if board_id.trim().is_empty() {
            return Err(MapError::EmptyBoardId);
        }
        if frame_id.trim().is_empty() {
            return Err(MapError::EmptyFrameId);
        }
        let grid_density = match grid_density {
            Some(divisions) => GridDensity::new(divisions)?,
            None => GridDensity::default(),
        };
        Ok(Self {
            board_id,
            frame_id,
            include_text,
            grid_density,
            format,
            page_size: MAX_PAGE_SIZE,
        })
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameBoundsSummary {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl From<&FrameBounds> for FrameBoundsSummary {
    fn from(bounds: &FrameBounds) -> Self {
        Self {
            x: bounds.center.x,
            y: bounds.center.y,
            width: bounds.size.width,
            height: bounds.size.height,
            left: bounds.left(),
            top: bounds.top(),
            right: bounds.right(),
            bottom: bounds.bottom(),
        }
    }
}

/// Geometric record of one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Board-global center
    pub position: Point,
    /// Center relative to the frame's top-left corner
    pub relative_position: Point,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSummary {
    pub density: GridDensity,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
}

/// Geometric payload returned next to the picture.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSummary {
    pub frame_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_title: Option<String>,
    pub frame_bounds: FrameBoundsSummary,
    pub item_count: usize,
    pub rendered_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_connectors: Vec<String>,
    pub grid: GridSummary,
    pub format: ArtifactFormat,
    pub mime_type: &'static str,
    pub items: Vec<ItemEntry>,
}

impl MapSummary {
    /// Human-readable overview for the text part of a tool result.
    pub fn describe(&self) -> String {
        let b = &self.frame_bounds;
        let title = self
            .frame_title
            .as_deref()
            .map(|t| format!(" \"{}\"", t))
            .unwrap_or_default();
        let mut text = format!(
            "Spatial map of frame {}{}: {} item(s), {} drawn.\n\
             Frame center ({}, {}), size {} x {}, spans x {}..{} and y {}..{} in board coordinates.\n\
             Grid: {} divisions per axis; tick labels are board coordinates.",
            self.frame_id,
            title,
            self.item_count,
            self.rendered_count,
            b.x,
            b.y,
            b.width,
            b.height,
            b.left,
            b.right,
            b.top,
            b.bottom,
            self.grid.density.get(),
        );
        if !self.skipped_connectors.is_empty() {
            text.push_str(&format!(
                "\nSkipped {} connector(s) with unresolved endpoints: {}.",
                self.skipped_connectors.len(),
                self.skipped_connectors.join(", ")
            ));
        }
        text
    }
}

/// A finished spatial map.
#[derive(Debug, Clone)]
pub struct SpatialMap {
    pub summary: MapSummary,
    pub artifact: Artifact,
}

/// Build the geometric payload and the scene for a frame and its children.
///
/// Pure and synchronous; every position in the payload and every primitive
/// in the scene comes from one [`Layout`].
pub fn compose(
    frame: &Item,
    items: &[Item],
    include_text: bool,
    density: GridDensity,
    format: ArtifactFormat,
) -> (MapSummary, Scene) {
    let bounds = FrameBounds::of(frame);
    let layout = Layout::new(bounds, items);
    let grid = GridOverlay::new(&bounds, density);

    let mut primitives = vec![Primitive::Rect {
        origin: bounds.top_left(),
        size: bounds.size,
        fill: Some(Color::WHITE),
        stroke: None,
        corner_radius: 0.0,
    }];
    primitives.extend(grid.primitives());

    let mut rendered_count = 0;
    let mut skipped_connectors = Vec::new();
    for item in items {
        match encode_item(item, &layout, include_text) {
            Encoded::Drawn(drawn) => {
                rendered_count += 1;
                primitives.extend(drawn);
            }
            Encoded::SkippedConnector => {
                warn!("Skipping connector {} with unresolved endpoint", item.id);
                skipped_connectors.push(item.id.clone());
            }
        }
    }

    let entries = items
        .iter()
        .map(|item| {
            let placed = layout.place(item);
            ItemEntry {
                id: item.id.clone(),
                item_type: item.item_type.clone(),
                position: placed.center,
                relative_position: placed.relative,
                width: placed.size.width,
                height: placed.size.height,
                style: item.style.clone(),
                content: include_text
                    .then(|| item.content().and_then(plain_text))
                    .flatten(),
            }
        })
        .collect();

    let summary = MapSummary {
        frame_id: frame.id.clone(),
        frame_title: frame.title().map(str::to_string),
        frame_bounds: FrameBoundsSummary::from(&bounds),
        item_count: items.len(),
        rendered_count,
        skipped_connectors,
        grid: GridSummary {
            density,
            x_ticks: grid.x_ticks.clone(),
            y_ticks: grid.y_ticks.clone(),
        },
        format,
        mime_type: format.mime_type(),
        items: entries,
    };
    let scene = Scene {
        viewport: bounds,
        primitives,
    };
    (summary, scene)
}

/// Fetch, place and render one frame.
pub async fn build_spatial_map<S>(
    source: &S,
    request: &SpatialMapRequest,
) -> Result<SpatialMap, MapError>
where
    S: ItemSource + ?Sized,
{
    let board_id = request.board_id.as_str();
    let frame_id = request.frame_id.as_str();

    let frame = source
        .fetch_item(board_id, frame_id)
        .await
        .map_err(MapError::upstream(format!("fetch frame {}", frame_id), board_id))?;
    if frame.item_type != ItemType::Frame {
        return Err(MapError::NotAFrame {
            item_id: frame_id.to_string(),
            actual: frame.item_type,
        });
    }

    let query = ItemQuery::in_frame(frame_id).with_limit(request.page_size);
    let items = fetch_all_items(source, board_id, &query).await?;
    debug!("Frame {} has {} child item(s)", frame_id, items.len());

    let (summary, scene) = compose(
        &frame,
        &items,
        request.include_text,
        request.grid_density,
        request.format,
    );

    let format = request.format;
    let artifact = match format {
        ArtifactFormat::Svg => render_scene(&scene, format),
        ArtifactFormat::Png => tokio::task::spawn_blocking(move || render_scene(&scene, format))
            .await
            .map_err(|e| MapError::Render {
                format,
                source: RenderError::Task(e.to_string()),
            })?,
    }
    .map_err(|source| MapError::Render { format, source })?;

    info!(
        "Rendered {} map of frame {} ({} of {} items, {} bytes)",
        format,
        frame_id,
        summary.rendered_count,
        summary.item_count,
        artifact.bytes.len()
    );
    Ok(SpatialMap { summary, artifact })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ConnectorEnd, Geometry};
    use crate::spatial::testing::{frame, item, page, MockSource};

    fn request(format: ArtifactFormat, density: Option<u32>) -> SpatialMapRequest {
        SpatialMapRequest::new("board", "f", true, density, format).unwrap()
    }

    #[test]
    fn test_request_validation() {
        assert!(matches!(
            SpatialMapRequest::new("", "f", false, None, ArtifactFormat::Svg),
            Err(MapError::EmptyBoardId)
        ));
        assert!(matches!(
            SpatialMapRequest::new("b", " ", false, None, ArtifactFormat::Svg),
            Err(MapError::EmptyFrameId)
        ));
        assert!(matches!(
            SpatialMapRequest::new("b", "f", false, Some(2), ArtifactFormat::Svg),
            Err(MapError::InvalidGridDensity(2))
        ));
        let ok = SpatialMapRequest::new("b", "f", false, None, ArtifactFormat::Png).unwrap();
        assert_eq!(ok.grid_density.get(), 10);
        assert_eq!(ok.page_size, MAX_PAGE_SIZE);
        assert_eq!(ok.with_page_size(5).page_size, MIN_PAGE_SIZE);
    }

    #[test]
    fn test_payload_matches_frame_example() {
        let f = frame("f", 0.0, 0.0, 1000.0, 1000.0);
        let a = item("a", "shape", Some((100.0, 100.0)), Some((50.0, 50.0)));
        let (summary, scene) = compose(
            &f,
            &[a],
            false,
            GridDensity::default(),
            ArtifactFormat::Svg,
        );

        let entry = &summary.items[0];
        assert_eq!(entry.position, Point::new(100.0, 100.0));
        assert_eq!(entry.relative_position, Point::new(600.0, 600.0));
        assert_eq!((entry.width, entry.height), (50.0, 50.0));
        assert!(entry.content.is_none());

        assert!(scene.primitives.iter().any(|p| matches!(
            p,
            Primitive::Rect { origin, .. } if *origin == Point::new(75.0, 75.0)
        )));
        assert_eq!(summary.frame_bounds.left, -500.0);
        assert_eq!(summary.frame_bounds.bottom, 500.0);
    }

    #[test]
    fn test_missing_position_agrees_in_payload_and_scene() {
        let f = frame("f", 0.0, 0.0, 1000.0, 1000.0);
        let bare = item("t", "sticky_note", None, None);
        let (summary, scene) = compose(
            &f,
            &[bare],
            false,
            GridDensity::default(),
            ArtifactFormat::Svg,
        );

        assert_eq!(summary.items[0].position, Point::default());
        assert_eq!(summary.items[0].relative_position, Point::new(500.0, 500.0));
        assert!(scene.primitives.iter().any(|p| matches!(
            p,
            Primitive::Rect { origin, corner_radius, .. }
                if *origin == Point::new(-50.0, -50.0) && *corner_radius == 5.0
        )));
    }

    #[test]
    fn test_unresolved_connector_is_listed_and_skipped() {
        let f = frame("f", 0.0, 0.0, 1000.0, 1000.0);
        let a = item("a", "shape", Some((0.0, 0.0)), None);
        let mut c = item("c", "connector", None, None);
        c.geometry = Some(Geometry {
            start: Some(ConnectorEnd {
                item: Some("a".to_string()),
                ..Default::default()
            }),
            end: Some(ConnectorEnd {
                item: Some("gone".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });

        let (summary, scene) = compose(
            &f,
            &[a, c],
            false,
            GridDensity::default(),
            ArtifactFormat::Svg,
        );
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.rendered_count, 1);
        assert_eq!(summary.skipped_connectors, vec!["c".to_string()]);
        assert!(!scene
            .primitives
            .iter()
            .any(|p| matches!(p, Primitive::Line { stroke, .. } if stroke.width == 2.0)));
        assert!(summary.describe().contains("Skipped 1 connector(s)"));
    }

    #[test]
    fn test_summary_json_shape() {
        let mut f = frame("f", 0.0, 0.0, 400.0, 400.0);
        f.data = Some(serde_json::json!({"title": "Sprint"}));
        let mut note = item("n", "sticky_note", Some((10.0, 10.0)), None);
        note.data = Some(serde_json::json!({"content": "<p>Hello</p>"}));

        let (summary, _) = compose(
            &f,
            &[note],
            true,
            GridDensity::new(4).unwrap(),
            ArtifactFormat::Png,
        );
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["frameTitle"], "Sprint");
        assert_eq!(json["mimeType"], "image/png");
        assert_eq!(json["format"], "png");
        assert_eq!(json["grid"]["density"], 4);
        assert_eq!(json["grid"]["xTicks"].as_array().unwrap().len(), 5);
        assert_eq!(json["items"][0]["type"], "sticky_note");
        assert_eq!(json["items"][0]["relativePosition"]["x"], 210.0);
        assert_eq!(json["items"][0]["content"], "Hello");
        assert!(json.get("skippedConnectors").is_none());
    }

    #[tokio::test]
    async fn test_build_svg_map() {
        let source = MockSource::new(vec![
            Ok(page(&["a", "b"], Some("c1"))),
            Ok(page(&["c"], None)),
        ])
        .with_item(frame("f", 0.0, 0.0, 1000.0, 1000.0));

        let map = build_spatial_map(&source, &request(ArtifactFormat::Svg, Some(4)))
            .await
            .unwrap();

        assert_eq!(map.summary.item_count, 3);
        assert_eq!(map.artifact.mime_type(), "image/svg+xml");
        let svg = map.artifact.as_text().unwrap();
        assert!(svg.contains(r#"viewBox="-500 -500 1000 1000""#));
        assert!(svg.contains(">250</text>"));
        assert_eq!(source.page_calls(), 2);
        assert_eq!(source.queries()[0].parent_item_id.as_deref(), Some("f"));
    }

    #[tokio::test]
    async fn test_build_png_map() {
        let source = MockSource::new(vec![Ok(page(&["a"], None))])
            .with_item(frame("f", 0.0, 0.0, 300.0, 200.0));

        let map = build_spatial_map(&source, &request(ArtifactFormat::Png, None))
            .await
            .unwrap();

        assert_eq!(map.artifact.mime_type(), "image/png");
        assert_eq!(&map.artifact.bytes[..4], &[0x89, b'P', b'N', b'G']);
        assert!(map.artifact.as_text().is_none());
    }

    #[tokio::test]
    async fn test_sliver_frame_renders_png() {
        let source = MockSource::new(vec![Ok(page(&["a"], None))])
            .with_item(frame("f", 0.0, 0.0, 0.004, 500.0));

        let map = build_spatial_map(&source, &request(ArtifactFormat::Png, None))
            .await
            .unwrap();

        assert_eq!(map.summary.frame_bounds.width, 1000.0);
        assert_eq!(map.summary.frame_bounds.height, 500.0);
        assert_eq!(&map.artifact.bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_non_frame_target_fails_before_listing() {
        let source = MockSource::new(vec![Ok(page(&["a"], None))]).with_item(item(
            "f",
            "sticky_note",
            Some((0.0, 0.0)),
            None,
        ));

        let err = build_spatial_map(&source, &request(ArtifactFormat::Svg, None))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("sticky_note"));
        assert_eq!(source.page_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_frame_reports_upstream_error() {
        let source = MockSource::new(vec![]);
        let err = build_spatial_map(&source, &request(ArtifactFormat::Svg, None))
            .await
            .unwrap_err();

        assert!(matches!(
            err.api_error(),
            Some(ApiError::Status { status: 404, .. })
        ));
        assert!(err.to_string().contains("fetch frame f"));
        assert_eq!(source.page_calls(), 0);
    }
}
