//! Board and item listing tools.

use rmcp::{model::*, ErrorData as McpError};
use serde_json::Value;
use tracing::info;

use crate::api::{Item, ItemQuery, ItemType, MiroClient};
use crate::mcp::types::{BoardArgs, BoardItemsPageArgs, ExportBoardArgs, FrameItemsArgs};
use crate::spatial::fetch_all_items;

use super::common::{api_failure, map_failure, summary_with_json, tool_error};

/// List every board the token can access
pub async fn list_boards(client: &MiroClient) -> Result<CallToolResult, McpError> {
    match client.list_boards().await {
        Ok(boards) => Ok(summary_with_json(
            format!("Found {} board(s)", boards.len()),
            &boards,
        )),
        Err(e) => Ok(api_failure("list boards", &e)),
    }
}

/// All frames on a board
pub async fn get_frames(
    client: &MiroClient,
    page_size: u32,
    args: BoardArgs,
) -> Result<CallToolResult, McpError> {
    let query = ItemQuery::of_type(ItemType::Frame.as_str()).with_limit(page_size);
    match fetch_all_items(client, &args.board_id, &query).await {
        Ok(frames) => Ok(summary_with_json(
            format!("Found {} frame(s) on board {}", frames.len(), args.board_id),
            &frames,
        )),
        Err(e) => Ok(map_failure("list frames", &e)),
    }
}

/// All children of a frame
pub async fn get_items_in_frame(
    client: &MiroClient,
    page_size: u32,
    args: FrameItemsArgs,
) -> Result<CallToolResult, McpError> {
    if args.frame_id.trim().is_empty() {
        return Ok(tool_error("Error: frameId must not be empty"));
    }
    let query = ItemQuery::in_frame(&args.frame_id).with_limit(page_size);
    match fetch_all_items(client, &args.board_id, &query).await {
        Ok(items) => Ok(summary_with_json(
            format!("Found {} item(s) in frame {}", items.len(), args.frame_id),
            &items,
        )),
        Err(e) => Ok(map_failure("list frame items", &e)),
    }
}

/// One raw page of board items, including the cursor for the next page
pub async fn get_items_on_board(
    client: &MiroClient,
    args: BoardItemsPageArgs,
) -> Result<CallToolResult, McpError> {
    let mut query = ItemQuery::default().with_limit(args.limit);
    query.item_type = args.item_type;

    match client
        .list_items_page(&args.board_id, &query, args.cursor.as_deref())
        .await
    {
        Ok(page) => {
            let more = if page.cursor.is_some() {
                "; more available via cursor"
            } else {
                ""
            };
            Ok(summary_with_json(
                format!("Retrieved {} item(s){}", page.data.len(), more),
                &page,
            ))
        }
        Err(e) => Ok(api_failure("list board items", &e)),
    }
}

/// Add `highResImageUrl` to image items.
fn with_high_res_urls(items: Vec<Item>) -> Vec<Value> {
    items
        .into_iter()
        .map(|item| {
            let high_res = (item.item_type == ItemType::Image)
                .then(|| item.image_url().map(|url| format!("{}?format=original", url)))
                .flatten();
            let mut value = serde_json::to_value(&item).unwrap_or(Value::Null);
            if let (Some(url), Some(object)) = (high_res, value.as_object_mut()) {
                object.insert("highResImageUrl".to_string(), Value::String(url));
            }
            value
        })
        .collect()
}

/// Every item on a board as JSON
pub async fn export_board_as_json(
    client: &MiroClient,
    page_size: u32,
    args: ExportBoardArgs,
) -> Result<CallToolResult, McpError> {
    let query = ItemQuery::default().with_limit(page_size);
    let items = match fetch_all_items(client, &args.board_id, &query).await {
        Ok(items) => items,
        Err(e) => return Ok(map_failure("export board", &e)),
    };
    info!("Exporting {} items from board {}", items.len(), args.board_id);

    let summary = format!(
        "Exported {} item(s) from board {}. For a visual layout, use get_frame_spatial_map.",
        items.len(),
        args.board_id
    );
    if args.include_images {
        Ok(summary_with_json(summary, &with_high_res_urls(items)))
    } else {
        Ok(summary_with_json(summary, &items))
    }
}
