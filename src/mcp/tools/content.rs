//! Sticky note and bulk item tools.

use rmcp::{model::*, ErrorData as McpError};

use crate::api::{ItemPayload, MiroClient, MAX_BULK_ITEMS};
use crate::mcp::types::{BulkCreateArgs, CreateStickyNoteArgs, ItemArgs, UpdateStickyNoteArgs};

use super::common::{api_failure, summary_with_json, tool_error};

pub async fn create_sticky_note(
    client: &MiroClient,
    args: CreateStickyNoteArgs,
) -> Result<CallToolResult, McpError> {
    let payload = ItemPayload {
        data: Some(args.data),
        style: Some(args.style),
        position: Some(args.position),
        geometry: args.geometry,
        parent: args.parent,
    };
    match client.create_sticky_note(&args.board_id, &payload).await {
        Ok(item) => Ok(summary_with_json(
            format!("Created sticky note {} on board {}", item.id, args.board_id),
            &item,
        )),
        Err(e) => Ok(api_failure("create sticky note", &e)),
    }
}

pub async fn update_sticky_note(
    client: &MiroClient,
    args: UpdateStickyNoteArgs,
) -> Result<CallToolResult, McpError> {
    let payload = ItemPayload {
        data: args.data,
        style: args.style,
        position: args.position,
        geometry: args.geometry,
        parent: args.parent,
    };
    if payload.data.is_none()
        && payload.style.is_none()
        && payload.position.is_none()
        && payload.geometry.is_none()
        && payload.parent.is_none()
    {
        return Ok(tool_error(
            "Error: nothing to update; pass at least one of data, style, position, geometry or parent",
        ));
    }

    match client
        .update_sticky_note(&args.board_id, &args.item_id, &payload)
        .await
    {
        Ok(item) => Ok(summary_with_json(
            format!("Updated sticky note {}", item.id),
            &item,
        )),
        Err(e) => Ok(api_failure("update sticky note", &e)),
    }
}

pub async fn delete_sticky_note(
    client: &MiroClient,
    args: ItemArgs,
) -> Result<CallToolResult, McpError> {
    match client
        .delete_sticky_note(&args.board_id, &args.item_id)
        .await
    {
        Ok(()) => Ok(CallToolResult::success(vec![Content::text(format!(
            "Deleted sticky note {} from board {}",
            args.item_id, args.board_id
        ))])),
        Err(e) => Ok(api_failure("delete sticky note", &e)),
    }
}

/// Every bulk item needs a `type` so Miro can route it.
fn check_bulk_items(items: &[serde_json::Value]) -> Result<(), String> {
    if items.is_empty() || items.len() > MAX_BULK_ITEMS {
        return Err(format!(
            "Error: items must contain 1 to {} entries, got {}",
            MAX_BULK_ITEMS,
            items.len()
        ));
    }
    let untyped: Vec<String> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.get("type").and_then(|t| t.as_str()).is_none())
        .map(|(i, _)| i.to_string())
        .collect();
    if !untyped.is_empty() {
        return Err(format!(
            "Error: every item needs a string `type`; missing at index {}",
            untyped.join(", ")
        ));
    }
    Ok(())
}

pub async fn create_items_in_bulk(
    client: &MiroClient,
    args: BulkCreateArgs,
) -> Result<CallToolResult, McpError> {
    if let Err(message) = check_bulk_items(&args.items) {
        return Ok(tool_error(message));
    }
    match client.bulk_create_items(&args.board_id, &args.items).await {
        Ok(created) => Ok(summary_with_json(
            format!(
                "Created {} item(s) on board {}",
                created.data.len(),
                args.board_id
            ),
            &created.data,
        )),
        Err(e) => Ok(api_failure("create items in bulk", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bulk_items_need_type() {
        assert!(check_bulk_items(&[json!({"type": "sticky_note"})]).is_ok());

        let err = check_bulk_items(&[json!({"type": "shape"}), json!({"data": {}})]).unwrap_err();
        assert!(err.contains("index 1"));

        let err = check_bulk_items(&[]).unwrap_err();
        assert!(err.contains("got 0"));
    }
}
