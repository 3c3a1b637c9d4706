//! Board and item read endpoints.

use async_trait::async_trait;
use tracing::debug;

use super::client::MiroClient;
use super::error::ApiError;
use super::types::{Board, BoardsPage, Item, ItemQuery, ItemsPage};
use crate::spatial::ItemSource;

/// Page size for the offset-paginated board listing
const BOARDS_PAGE_SIZE: u64 = 50;

impl MiroClient {
    /// List every board visible to the token, following offset pagination.
    pub async fn list_boards(&self) -> Result<Vec<Board>, ApiError> {
        let mut boards = Vec::new();
        let mut offset = 0u64;

        loop {
            let mut url = self.endpoint(&["boards"])?;
            url.query_pairs_mut()
                .append_pair("limit", &BOARDS_PAGE_SIZE.to_string())
                .append_pair("offset", &offset.to_string());

            let page: BoardsPage = self.get_json(url).await?;
            let received = page.data.len() as u64;
            boards.extend(page.data);
            offset = page.offset.unwrap_or(offset) + received;

            let exhausted = match page.total {
                Some(total) => offset >= total,
                None => received < BOARDS_PAGE_SIZE,
            };
            if exhausted || received == 0 {
                break;
            }
        }

        debug!("Listed {} boards", boards.len());
        Ok(boards)
    }

    /// Fetch a single item of any type.
    pub async fn get_item(&self, board_id: &str, item_id: &str) -> Result<Item, ApiError> {
        let url = self.endpoint(&["boards", board_id, "items", item_id])?;
        self.get_json(url).await
    }

    /// Fetch one page of items.
    pub async fn list_items_page(
        &self,
        board_id: &str,
        query: &ItemQuery,
        cursor: Option<&str>,
    ) -> Result<ItemsPage, ApiError> {
        let mut url = self.endpoint(&["boards", board_id, "items"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &query.limit.to_string());
            if let Some(item_type) = &query.item_type {
                pairs.append_pair("type", item_type);
            }
            if let Some(parent) = &query.parent_item_id {
                pairs.append_pair("parent_item_id", parent);
            }
            if let Some(cursor) = cursor {
                pairs.append_pair("cursor", cursor);
            }
        }
        self.get_json(url).await
    }
}

#[async_trait]
impl ItemSource for MiroClient {
    async fn fetch_item(&self, board_id: &str, item_id: &str) -> Result<Item, ApiError> {
        self.get_item(board_id, item_id).await
    }

    async fn fetch_page(
        &self,
        board_id: &str,
        query: &ItemQuery,
        cursor: Option<&str>,
    ) -> Result<ItemsPage, ApiError> {
        self.list_items_page(board_id, query, cursor).await
    }
}
