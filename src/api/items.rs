//! Item creation, update and deletion endpoints.
//!
//! These are direct pass-throughs: bodies are forwarded as given and Miro's
//! response item is returned unchanged.

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;

use super::client::MiroClient;
use super::error::ApiError;
use super::types::{
    BulkCreateResponse, Dimensions, EmbedData, Item, ItemPayload, PlacedRequest, Placement,
    UrlData,
};

/// Largest batch the bulk endpoint accepts
pub const MAX_BULK_ITEMS: usize = 20;

fn optional_dimensions(geometry: Option<Dimensions>) -> Option<Dimensions> {
    geometry.filter(|g| !g.is_empty())
}

impl MiroClient {
    pub async fn create_sticky_note(
        &self,
        board_id: &str,
        payload: &ItemPayload,
    ) -> Result<Item, ApiError> {
        let url = self.endpoint(&["boards", board_id, "sticky_notes"])?;
        self.send_json(Method::POST, url, payload).await
    }

    pub async fn update_sticky_note(
        &self,
        board_id: &str,
        item_id: &str,
        payload: &ItemPayload,
    ) -> Result<Item, ApiError> {
        let url = self.endpoint(&["boards", board_id, "sticky_notes", item_id])?;
        self.send_json(Method::PATCH, url, payload).await
    }

    pub async fn delete_sticky_note(&self, board_id: &str, item_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["boards", board_id, "sticky_notes", item_id])?;
        self.delete(url).await
    }

    pub async fn create_shape(&self, board_id: &str, payload: &ItemPayload) -> Result<Item, ApiError> {
        let url = self.endpoint(&["boards", board_id, "shapes"])?;
        self.send_json(Method::POST, url, payload).await
    }

    /// Create up to [`MAX_BULK_ITEMS`] items in one transaction.
    pub async fn bulk_create_items(
        &self,
        board_id: &str,
        items: &[Value],
    ) -> Result<BulkCreateResponse, ApiError> {
        if items.is_empty() || items.len() > MAX_BULK_ITEMS {
            return Err(ApiError::InvalidInput(format!(
                "bulk creation takes 1 to {} items, got {}",
                MAX_BULK_ITEMS,
                items.len()
            )));
        }
        let url = self.endpoint(&["boards", board_id, "items", "bulk"])?;
        self.send_json(Method::POST, url, items).await
    }

    pub async fn create_image_by_url(
        &self,
        board_id: &str,
        image_url: &str,
        position: Placement,
        geometry: Option<Dimensions>,
    ) -> Result<Item, ApiError> {
        let url = self.endpoint(&["boards", board_id, "images"])?;
        let body = PlacedRequest {
            data: UrlData { url: image_url },
            position,
            geometry: optional_dimensions(geometry),
        };
        self.send_json(Method::POST, url, &body).await
    }

    /// Upload image bytes as a multipart `resource` part.
    pub async fn create_image_from_bytes(
        &self,
        board_id: &str,
        bytes: Vec<u8>,
        mime_type: &str,
        position: Placement,
        geometry: Option<Dimensions>,
    ) -> Result<Item, ApiError> {
        let url = self.endpoint(&["boards", board_id, "images"])?;

        let mut data = serde_json::json!({ "position": position });
        if let Some(geometry) = optional_dimensions(geometry) {
            data["geometry"] = serde_json::to_value(geometry).unwrap_or(Value::Null);
        }

        let extension = mime_type.rsplit('/').next().unwrap_or("png");
        let invalid_part = |source: reqwest::Error| ApiError::Transport {
            url: url.to_string(),
            source,
        };
        let form = Form::new()
            .part(
                "data",
                Part::text(data.to_string())
                    .mime_str("application/json")
                    .map_err(invalid_part)?,
            )
            .part(
                "resource",
                Part::bytes(bytes)
                    .file_name(format!("image.{}", extension))
                    .mime_str(mime_type)
                    .map_err(invalid_part)?,
            );

        self.send_multipart(url.clone(), form).await
    }

    pub async fn create_embed(
        &self,
        board_id: &str,
        embed_url: &str,
        mode: &str,
        preview_url: Option<&str>,
        position: Placement,
        geometry: Option<Dimensions>,
    ) -> Result<Item, ApiError> {
        let url = self.endpoint(&["boards", board_id, "embeds"])?;
        let body = PlacedRequest {
            data: EmbedData {
                url: embed_url,
                mode,
                preview_url,
            },
            position,
            geometry: optional_dimensions(geometry),
        };
        self.send_json(Method::POST, url, &body).await
    }
}
