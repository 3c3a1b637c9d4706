//! Miro REST API request and response types.
//!
//! Items are modeled loosely: the fields the spatial mapper needs are typed,
//! everything else is kept in `extra` maps so tools can pass payloads through
//! without losing data.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Board summary as returned by `GET /boards`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Offset-paginated board listing
#[derive(Debug, Deserialize)]
pub struct BoardsPage {
    #[serde(default)]
    pub data: Vec<Board>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

/// Cursor-paginated item listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsPage {
    #[serde(default)]
    pub data: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// Smallest and largest page size the items endpoint accepts
pub const MIN_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 50;

/// Filters for `GET /boards/{board_id}/items`
#[derive(Debug, Clone, PartialEq)]
pub struct ItemQuery {
    pub parent_item_id: Option<String>,
    pub item_type: Option<String>,
    pub limit: u32,
}

impl Default for ItemQuery {
    fn default() -> Self {
        Self {
            parent_item_id: None,
            item_type: None,
            limit: MAX_PAGE_SIZE,
        }
    }
}

impl ItemQuery {
    pub fn in_frame(frame_id: impl Into<String>) -> Self {
        Self {
            parent_item_id: Some(frame_id.into()),
            ..Self::default()
        }
    }

    pub fn of_type(item_type: impl Into<String>) -> Self {
        Self {
            item_type: Some(item_type.into()),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        self
    }
}

/// Item type tag.
///
/// Unknown tags are kept verbatim in `Other` so they survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemType {
    Shape,
    StickyNote,
    Text,
    Image,
    Frame,
    Embed,
    Card,
    AppCard,
    Document,
    Connector,
    /// Legacy tag for connectors; drawn the same way
    Line,
    Other(String),
}

impl ItemType {
    pub fn as_str(&self) -> &str {
        match self {
            ItemType::Shape => "shape",
            ItemType::StickyNote => "sticky_note",
            ItemType::Text => "text",
            ItemType::Image => "image",
            ItemType::Frame => "frame",
            ItemType::Embed => "embed",
            ItemType::Card => "card",
            ItemType::AppCard => "app_card",
            ItemType::Document => "document",
            ItemType::Connector => "connector",
            ItemType::Line => "line",
            ItemType::Other(tag) => tag,
        }
    }
}

impl From<String> for ItemType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "shape" => ItemType::Shape,
            "sticky_note" => ItemType::StickyNote,
            "text" => ItemType::Text,
            "image" => ItemType::Image,
            "frame" => ItemType::Frame,
            "embed" => ItemType::Embed,
            "card" => ItemType::Card,
            "app_card" => ItemType::AppCard,
            "document" => ItemType::Document,
            "connector" => ItemType::Connector,
            "line" => ItemType::Line,
            _ => ItemType::Other(tag),
        }
    }
}

impl From<ItemType> for String {
    fn from(item_type: ItemType) -> Self {
        match item_type {
            ItemType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item position. Board-global with the origin at the board center unless
/// `relative_to` says otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_to: Option<String>,
}

impl Position {
    /// Miro reports children of a frame relative to the frame's top-left corner.
    pub fn is_parent_relative(&self) -> bool {
        self.relative_to.as_deref() == Some("parent_top_left")
    }
}

/// One end of a connector: explicit coordinates and/or a reference to an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConnectorEnd {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Geometry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<ConnectorEnd>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<ConnectorEnd>,
}

/// Item style. Miro sends numeric style values as strings for some item
/// types, so `border_width` accepts both.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_f64"
    )]
    pub border_width: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParentRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Board item snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    fn data_str(&self, key: &str) -> Option<&str> {
        self.data.as_ref()?.get(key)?.as_str()
    }

    /// Textual content, from `data.content` or a top-level `content` field.
    pub fn content(&self) -> Option<&str> {
        self.data_str("content")
            .or_else(|| self.extra.get("content").and_then(Value::as_str))
            .filter(|s| !s.is_empty())
    }

    /// Frame or card title, if any.
    pub fn title(&self) -> Option<&str> {
        self.data_str("title")
            .or_else(|| self.extra.get("title").and_then(Value::as_str))
            .filter(|s| !s.is_empty())
    }

    /// Shape kind (`rectangle`, `circle` ...) for shape items.
    pub fn shape_kind(&self) -> Option<&str> {
        self.data_str("shape")
            .or_else(|| self.extra.get("shape").and_then(Value::as_str))
    }

    pub fn image_url(&self) -> Option<&str> {
        self.data_str("imageUrl")
    }
}

/// Generic create/update body shared by sticky notes and shapes.
///
/// The nested objects are forwarded as given; Miro validates them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Value>,
}

/// Placement used by image and embed creation
#[derive(Debug, Clone, Serialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub origin: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Dimensions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Dimensions {
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}

#[derive(Debug, Serialize)]
pub(super) struct UrlData<'a> {
    pub url: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct EmbedData<'a> {
    pub url: &'a str,
    pub mode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<&'a str>,
}

/// Body for URL-based image and embed creation
#[derive(Debug, Serialize)]
pub(super) struct PlacedRequest<T> {
    pub data: T,
    pub position: Placement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Dimensions>,
}

/// Response of the bulk create endpoint
#[derive(Debug, Deserialize)]
pub struct BulkCreateResponse {
    #[serde(default)]
    pub data: Vec<Item>,
}
