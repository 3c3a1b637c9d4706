//! Image tools.

use base64::Engine;
use rmcp::{model::*, ErrorData as McpError};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::api::{ApiError, Dimensions, Item, ItemType, MiroClient, Placement};
use crate::mcp::types::{CreateImageArgs, GetImageArgs, ImageFormat};

use super::common::{api_failure, json_content, tool_error};

/// Decoded `data:image/...;base64,` URI
#[derive(Debug, PartialEq)]
struct DataUri {
    mime_type: String,
    bytes: Vec<u8>,
}

fn parse_data_uri(input: &str) -> Result<DataUri, String> {
    let rest = input.strip_prefix("data:").filter(|r| r.starts_with("image/")).ok_or(
        "Base64 image data must include a data URI prefix (e.g. data:image/png;base64,...)",
    )?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or("Data URI has no ',' separating header and payload")?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or("Data URI must be base64 encoded (\";base64,\")")?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| format!("Invalid base64 image data: {}", e))?;
    if bytes.is_empty() {
        return Err("Image data is empty".to_string());
    }
    Ok(DataUri {
        mime_type: mime_type.to_string(),
        bytes,
    })
}

/// Fixed aspect ratio images take one dimension; width wins.
fn single_dimension(width: Option<f64>, height: Option<f64>) -> Option<Dimensions> {
    match (width, height) {
        (Some(width), _) => Some(Dimensions {
            width: Some(width),
            height: None,
        }),
        (None, Some(height)) => Some(Dimensions {
            width: None,
            height: Some(height),
        }),
        (None, None) => None,
    }
}

pub async fn create_image(
    client: &MiroClient,
    args: CreateImageArgs,
) -> Result<CallToolResult, McpError> {
    let position = Placement {
        x: args.x,
        y: args.y,
        origin: args.origin,
    };
    let geometry = single_dimension(args.width, args.height);

    let created = if args.is_url {
        client
            .create_image_by_url(&args.board_id, &args.image_data, position, geometry)
            .await
    } else {
        let image = match parse_data_uri(&args.image_data) {
            Ok(image) => image,
            Err(message) => return Ok(tool_error(format!("Error: {}", message))),
        };
        debug!(
            "Uploading {} bytes of {} to board {}",
            image.bytes.len(),
            image.mime_type,
            args.board_id
        );
        client
            .create_image_from_bytes(
                &args.board_id,
                image.bytes,
                &image.mime_type,
                position,
                geometry,
            )
            .await
    };

    let image = match created {
        Ok(image) => image,
        Err(e) => return Ok(api_failure("create image", &e)),
    };
    if image.item_type != ItemType::Image {
        return Ok(tool_error(format!(
            "Error: Miro returned a {} instead of an image",
            image.item_type
        )));
    }

    let details = serde_json::json!({
        "miroImageId": image.id,
        "boardId": args.board_id,
        "imageUrl": image.image_url(),
        "dimensions": dimensions(&image),
        "requiresAuth": true,
    });
    let json = match json_content(&details) {
        Ok(json) => json,
        Err(err) => return Ok(err),
    };
    Ok(CallToolResult::success(vec![
        Content::text(format!(
            "Created image with ID {} on board {}",
            image.id, args.board_id
        )),
        json,
    ]))
}

fn dimensions(item: &Item) -> serde_json::Value {
    let geometry = item.geometry.as_ref();
    serde_json::json!({
        "width": geometry.and_then(|g| g.width),
        "height": geometry.and_then(|g| g.height),
    })
}

/// URL to download for the requested format. `original` asks the resource
/// endpoint for the full-resolution file.
fn resource_url(image_url: &str, format: ImageFormat) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(image_url)?;
    if format == ImageFormat::Original {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "format")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(pairs)
            .append_pair("format", "original");
    }
    Ok(url)
}

/// Resource endpoints answer JSON with the actual download location.
#[derive(Deserialize)]
struct ResourceLocation {
    url: String,
}

async fn download_image(client: &MiroClient, url: &Url) -> Result<(Vec<u8>, String), ApiError> {
    let (bytes, content_type) = client.fetch_bytes(url.as_str()).await?;
    let is_json = content_type
        .as_deref()
        .is_some_and(|c| c.starts_with("application/json"));
    if !is_json {
        return Ok((bytes, content_type.unwrap_or_else(|| "image/png".to_string())));
    }

    let location: ResourceLocation =
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })?;
    debug!("Following image resource location {}", location.url);
    let (bytes, content_type) = client.fetch_bytes(&location.url).await?;
    Ok((bytes, content_type.unwrap_or_else(|| "image/png".to_string())))
}

pub async fn get_image(client: &MiroClient, args: GetImageArgs) -> Result<CallToolResult, McpError> {
    let image = match client.get_item(&args.board_id, &args.image_id).await {
        Ok(item) => item,
        Err(e) => return Ok(api_failure("get image", &e)),
    };
    if image.item_type != ItemType::Image {
        return Ok(tool_error(format!(
            "Error: item {} is not an image, it's a {}",
            args.image_id, image.item_type
        )));
    }
    let Some(image_url) = image.image_url() else {
        return Ok(tool_error(format!(
            "Error: image {} has no image URL",
            args.image_id
        )));
    };
    let url = match resource_url(image_url, args.format) {
        Ok(url) => url,
        Err(e) => return Ok(tool_error(format!("Error: invalid image URL {}: {}", image_url, e))),
    };

    let (bytes, mime_type) = match download_image(client, &url).await {
        Ok(download) => download,
        Err(e) => return Ok(api_failure("download image", &e)),
    };

    let details = serde_json::json!({
        "miroImageId": image.id,
        "dimensions": dimensions(&image),
    });
    let json = match json_content(&details) {
        Ok(json) => json,
        Err(err) => return Ok(err),
    };
    Ok(CallToolResult::success(vec![
        Content::text(format!(
            "Retrieved image {} from board {} ({} bytes)",
            args.image_id,
            args.board_id,
            bytes.len()
        )),
        Content::image(
            base64::engine::general_purpose::STANDARD.encode(&bytes),
            mime_type,
        ),
        json,
    ]))
}
