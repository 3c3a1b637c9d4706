//! Shape tools.

use rmcp::{model::*, ErrorData as McpError};
use serde::Serialize;

use crate::api::{Item, ItemPayload, ItemQuery, ItemType, MiroClient, Style};
use crate::mcp::types::{CreateShapeArgs, ShapeDetailsArgs, ShapesByTypeArgs};
use crate::spatial::fetch_all_items;

use super::common::{api_failure, map_failure, summary_with_json, tool_error};

/// Flattened view of a shape item
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShapeDetails {
    id: String,
    #[serde(rename = "type")]
    item_type: ItemType,
    shape: Option<String>,
    x: Option<f64>,
    y: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    style: Option<Style>,
    content: Option<String>,
}

impl From<&Item> for ShapeDetails {
    fn from(item: &Item) -> Self {
        let geometry = item.geometry.as_ref();
        Self {
            id: item.id.clone(),
            item_type: item.item_type.clone(),
            shape: item.shape_kind().map(str::to_string),
            x: item.position.as_ref().map(|p| p.x),
            y: item.position.as_ref().map(|p| p.y),
            width: geometry.and_then(|g| g.width),
            height: geometry.and_then(|g| g.height),
            style: item.style.clone(),
            content: item.content().map(str::to_string),
        }
    }
}

pub async fn create_shape(
    client: &MiroClient,
    args: CreateShapeArgs,
) -> Result<CallToolResult, McpError> {
    let payload = ItemPayload {
        data: args.data,
        style: args.style,
        position: args.position,
        geometry: args.geometry,
        parent: args.parent,
    };
    match client.create_shape(&args.board_id, &payload).await {
        Ok(item) => Ok(summary_with_json(
            format!("Created shape {} on board {}", item.id, args.board_id),
            &item,
        )),
        Err(e) => Ok(api_failure("create shape", &e)),
    }
}

pub async fn get_shape_details(
    client: &MiroClient,
    args: ShapeDetailsArgs,
) -> Result<CallToolResult, McpError> {
    let item = match client.get_item(&args.board_id, &args.shape_id).await {
        Ok(item) => item,
        Err(e) => return Ok(api_failure("get shape details", &e)),
    };
    if item.item_type != ItemType::Shape {
        return Ok(tool_error(format!(
            "Error: item {} is not a shape, it's a {}",
            args.shape_id, item.item_type
        )));
    }
    Ok(summary_with_json(
        format!("Shape {}", item.id),
        &ShapeDetails::from(&item),
    ))
}

fn shapes_of_kind<'a>(items: &'a [Item], kind: &'a str) -> impl Iterator<Item = &'a Item> {
    items
        .iter()
        .filter(move |item| item.item_type == ItemType::Shape && item.shape_kind() == Some(kind))
}

pub async fn get_shapes_by_type(
    client: &MiroClient,
    page_size: u32,
    args: ShapesByTypeArgs,
) -> Result<CallToolResult, McpError> {
    let query = ItemQuery::of_type(ItemType::Shape.as_str()).with_limit(page_size);
    let items = match fetch_all_items(client, &args.board_id, &query).await {
        Ok(items) => items,
        Err(e) => return Ok(map_failure("list shapes", &e)),
    };

    let shapes: Vec<ShapeDetails> = shapes_of_kind(&items, &args.shape_type)
        .map(ShapeDetails::from)
        .collect();
    Ok(summary_with_json(
        format!(
            "Found {} {} shape(s) on board {}",
            shapes.len(),
            args.shape_type,
            args.board_id
        ),
        &serde_json::json!({ "shapes": shapes }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(id: &str, kind: &str) -> Item {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "type": "shape",
            "data": {"shape": kind, "content": "<p>x</p>"},
            "position": {"x": 1, "y": 2},
            "geometry": {"width": 30, "height": 40}
        }))
        .unwrap()
    }

    #[test]
    fn test_filter_by_kind() {
        let items = vec![shape("1", "circle"), shape("2", "rectangle"), shape("3", "circle")];
        let ids: Vec<_> = shapes_of_kind(&items, "circle").map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_details_flatten_item() {
        let details = ShapeDetails::from(&shape("1", "circle"));
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["shape"], "circle");
        assert_eq!(json["type"], "shape");
        assert_eq!(json["x"], 1.0);
        assert_eq!(json["height"], 40.0);
        assert_eq!(json["content"], "<p>x</p>");
    }
}
