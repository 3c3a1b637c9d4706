//! Frame spatial map tool.

use std::time::Duration;

use rmcp::{model::*, ErrorData as McpError};
use tracing::info;

use crate::api::MiroClient;
use crate::mcp::types::SpatialMapArgs;
use crate::spatial::{
    build_spatial_map, ArtifactFormat, ItemSource, MapError, SpatialMap, SpatialMapRequest,
};

use super::common::{json_content, map_failure};

/// Run the whole pipeline under one deadline. Dropping the future on expiry
/// aborts any outstanding page fetch.
async fn build_with_deadline<S>(
    source: &S,
    request: &SpatialMapRequest,
    limit: Duration,
) -> Result<SpatialMap, MapError>
where
    S: ItemSource + ?Sized,
{
    match tokio::time::timeout(limit, build_spatial_map(source, request)).await {
        Ok(result) => result,
        Err(_) => Err(MapError::TimedOut {
            frame_id: request.frame_id.clone(),
            limit,
        }),
    }
}

fn render_result(map: SpatialMap) -> CallToolResult {
    let json = match json_content(&map.summary) {
        Ok(json) => json,
        Err(err) => return err,
    };
    let picture = match map.artifact.format {
        ArtifactFormat::Svg => match map.artifact.as_text() {
            Some(svg) => Content::text(svg),
            None => Content::text(String::from_utf8_lossy(&map.artifact.bytes).into_owned()),
        },
        ArtifactFormat::Png => Content::image(map.artifact.to_base64(), map.artifact.mime_type()),
    };
    CallToolResult::success(vec![Content::text(map.summary.describe()), json, picture])
}

pub async fn get_frame_spatial_map(
    client: &MiroClient,
    page_size: u32,
    limit: Duration,
    args: SpatialMapArgs,
) -> Result<CallToolResult, McpError> {
    let request = match SpatialMapRequest::new(
        args.board_id,
        args.frame_id,
        args.include_text,
        args.grid_density,
        args.format,
    ) {
        Ok(request) => request.with_page_size(page_size),
        Err(e) => return Ok(map_failure("build spatial map", &e)),
    };

    info!(
        "Building {} spatial map for frame {} on board {}",
        request.format, request.frame_id, request.board_id
    );
    match build_with_deadline(client, &request, limit).await {
        Ok(map) => Ok(render_result(map)),
        Err(e) => Ok(map_failure("build spatial map", &e)),
    }
}
