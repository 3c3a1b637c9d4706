//! Embed tool.

use rmcp::{model::*, ErrorData as McpError};
use tracing::warn;

use crate::api::{Dimensions, MiroClient, Placement};
use crate::mcp::types::CreateEmbedArgs;

use super::common::{api_failure, tool_error};

pub async fn create_embed(
    client: &MiroClient,
    args: CreateEmbedArgs,
) -> Result<CallToolResult, McpError> {
    if args.mode != "inline" && args.mode != "modal" {
        return Ok(tool_error(format!(
            "Error: mode must be \"inline\" or \"modal\", got \"{}\"",
            args.mode
        )));
    }
    if args.width.is_some() && args.height.is_some() {
        warn!("Both width and height given for an embed; fixed aspect ratio content may be distorted");
    }

    let position = Placement {
        x: args.x,
        y: args.y,
        origin: args.origin,
    };
    let geometry = Dimensions {
        width: args.width,
        height: args.height,
    };

    match client
        .create_embed(
            &args.board_id,
            &args.url,
            &args.mode,
            args.preview_url.as_deref(),
            position,
            Some(geometry),
        )
        .await
    {
        Ok(embed) => {
            let geometry = embed.geometry.as_ref();
            let dimension = |d: Option<f64>| d.map_or_else(|| "auto".to_string(), |v| v.to_string());
            let provider = embed
                .data
                .as_ref()
                .and_then(|d| d.get("providerName"))
                .and_then(|p| p.as_str())
                .unwrap_or("Unknown");
            Ok(CallToolResult::success(vec![
                Content::text(format!(
                    "Created embed with ID {} on board {}",
                    embed.id, args.board_id
                )),
                Content::text(format!(
                    "Embed dimensions: {} x {}",
                    dimension(geometry.and_then(|g| g.width)),
                    dimension(geometry.and_then(|g| g.height))
                )),
                Content::text(format!("Provider: {}", provider)),
            ]))
        }
        Err(e) => Ok(api_failure("create embed", &e)),
    }
}
