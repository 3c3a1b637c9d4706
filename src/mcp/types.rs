//! MCP tool parameter types.
//!
//! These types are used with rmcp's `Parameters<T>` wrapper for automatic
//! deserialization and JSON schema generation. Field names follow Miro's
//! camelCase convention.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::spatial::ArtifactFormat;

fn default_true() -> bool {
    true
}

fn default_origin() -> String {
    "center".to_string()
}

fn default_embed_mode() -> String {
    "inline".to_string()
}

fn default_page_limit() -> u32 {
    10
}

/// Parameters for list_boards (no arguments needed)
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListBoardsArgs {}

/// Parameters for tools that only need a board
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardArgs {
    /// ID of the board
    pub board_id: String,
}

/// Parameters for get_items_in_frame
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameItemsArgs {
    /// ID of the board that contains the frame
    pub board_id: String,
    /// ID of the frame to get items from
    pub frame_id: String,
}

/// Parameters for get_items_on_board
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardItemsPageArgs {
    /// ID of the board
    pub board_id: String,
    /// Items per page, 10 to 50
    #[serde(default = "default_page_limit")]
    pub limit: u32,
    /// Only return items of this type (e.g. `sticky_note`, `shape`, `frame`)
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
    /// Cursor from a previous page
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Parameters for create_sticky_note_item
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStickyNoteArgs {
    /// ID of the board to create the sticky note on
    pub board_id: String,
    /// Content: `{"content": "...", "shape": "square" | "rectangle"}`
    pub data: Value,
    /// Style: `{"fillColor": "light_yellow", "textAlign": "center", ...}`
    pub style: Value,
    /// Position: `{"x": 0, "y": 0, "origin": "center"}`
    pub position: Value,
    /// Geometry: `{"width": 200}` (sticky notes keep their aspect ratio)
    #[serde(default)]
    pub geometry: Option<Value>,
    /// Parent frame: `{"id": "<frame id>"}`
    #[serde(default)]
    pub parent: Option<Value>,
}

/// Parameters for update_sticky_note_item
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStickyNoteArgs {
    /// ID of the board that contains the sticky note
    pub board_id: String,
    /// ID of the sticky note to update
    pub item_id: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub style: Option<Value>,
    #[serde(default)]
    pub position: Option<Value>,
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(default)]
    pub parent: Option<Value>,
}

/// Parameters for tools addressing one item
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemArgs {
    /// ID of the board that contains the item
    pub board_id: String,
    /// ID of the item
    pub item_id: String,
}

/// Parameters for create_items_in_bulk
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateArgs {
    /// ID of the board to create the items on
    pub board_id: String,
    /// 1 to 20 item bodies, each with a `type` (`sticky_note`, `shape`, `text`, ...)
    /// plus the `data`, `style`, `position` and `geometry` for that type
    pub items: Vec<Value>,
}

/// Parameters for create_shape
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShapeArgs {
    /// ID of the board to create the shape on
    pub board_id: String,
    /// Content: `{"shape": "rectangle", "content": "..."}`
    #[serde(default)]
    pub data: Option<Value>,
    /// Style: `{"fillColor": "#ffffff", "borderColor": "#1a1a1a", "borderWidth": "2"}`
    #[serde(default)]
    pub style: Option<Value>,
    /// Position: `{"x": 0, "y": 0, "origin": "center"}`
    #[serde(default)]
    pub position: Option<Value>,
    /// Geometry: `{"width": 200, "height": 100, "rotation": 0}`
    #[serde(default)]
    pub geometry: Option<Value>,
    /// Parent frame: `{"id": "<frame id>"}`
    #[serde(default)]
    pub parent: Option<Value>,
}

/// Parameters for create_image
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateImageArgs {
    /// ID of the board to create the image on
    pub board_id: String,
    /// Either a URL or a `data:image/...;base64,` URI
    pub image_data: String,
    /// Whether `imageData` is a URL (true) or base64 data (false)
    #[serde(default = "default_true")]
    pub is_url: bool,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Width in board units; set width or height, not both
    #[serde(default)]
    pub width: Option<f64>,
    /// Height in board units; ignored when width is set
    #[serde(default)]
    pub height: Option<f64>,
    /// Origin point for positioning
    #[serde(default = "default_origin")]
    pub origin: String,
}

/// Image retrieval mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Full-resolution original
    #[default]
    Original,
    /// The preview served at the item's image URL
    Url,
}

/// Parameters for get_image
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetImageArgs {
    /// ID of the board that contains the image
    pub board_id: String,
    /// ID of the image item
    pub image_id: String,
    #[serde(default)]
    pub format: ImageFormat,
}

/// Parameters for create_embed
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmbedArgs {
    /// ID of the board to create the embed on
    pub board_id: String,
    /// URL of the content to embed (YouTube, Figma, Google Docs, ...)
    pub url: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    /// `inline` plays on the board, `modal` opens a dialog
    #[serde(default = "default_embed_mode")]
    pub mode: String,
    /// Preview image URL shown before the embed loads
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default = "default_origin")]
    pub origin: String,
}

/// Parameters for get_shape_details
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDetailsArgs {
    /// ID of the board that contains the shape
    pub board_id: String,
    /// ID of the shape item
    pub shape_id: String,
}

/// Parameters for get_shapes_by_type
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShapesByTypeArgs {
    /// ID of the board to search
    pub board_id: String,
    /// Shape kind, e.g. `rectangle`, `circle`, `triangle`, `rhombus`
    pub shape_type: String,
}

/// Parameters for export_board_as_json
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportBoardArgs {
    /// ID of the board to export
    pub board_id: String,
    /// Add a `highResImageUrl` to every image item
    #[serde(default = "default_true")]
    pub include_images: bool,
}

/// Parameters for get_frame_spatial_map
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpatialMapArgs {
    /// ID of the board that contains the frame
    pub board_id: String,
    /// ID of the frame to map
    pub frame_id: String,
    /// Draw item text and include it in the item list
    #[serde(default)]
    pub include_text: bool,
    /// Grid divisions per axis, 4 to 20 (default 10)
    #[serde(default)]
    pub grid_density: Option<u32>,
    /// `svg` (default) or `png`
    #[serde(default)]
    pub format: ArtifactFormat,
}
