//! Cursor-paginated item aggregation.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::debug;

use crate::api::{ApiError, Item, ItemQuery, ItemsPage};

use super::error::MapError;

/// Read access to board items.
///
/// Implemented by [`crate::api::MiroClient`]; tests substitute an in-memory
/// source.
#[async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch_item(&self, board_id: &str, item_id: &str) -> Result<Item, ApiError>;

    async fn fetch_page(
        &self,
        board_id: &str,
        query: &ItemQuery,
        cursor: Option<&str>,
    ) -> Result<ItemsPage, ApiError>;
}

/// Collect every item matching `query` by following cursors until none is
/// returned.
///
/// Items keep the order in which pages and items arrived. Any failed page
/// fails the whole call; no partial list is returned. A cursor seen twice
/// means the listing would never terminate and is reported as an error.
pub async fn fetch_all_items<S>(
    source: &S,
    board_id: &str,
    query: &ItemQuery,
) -> Result<Vec<Item>, MapError>
where
    S: ItemSource + ?Sized,
{
    if board_id.trim().is_empty() {
        return Err(MapError::EmptyBoardId);
    }

    let mut items = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = source
            .fetch_page(board_id, query, cursor.as_deref())
            .await
            .map_err(MapError::upstream(
                format!("list items (page {})", pages + 1),
                board_id,
            ))?;
        pages += 1;
        items.extend(page.data);

        match page.cursor.filter(|c| !c.is_empty()) {
            None => break,
            Some(next) => {
                if !seen.insert(next.clone()) {
                    return Err(MapError::RepeatedCursor {
                        board_id: board_id.to_string(),
                        cursor: next,
                        pages,
                    });
                }
                cursor = Some(next);
            }
        }
    }

    debug!(
        "Aggregated {} items from {} page(s) on board {}",
        items.len(),
        pages,
        board_id
    );
    Ok(items)
}
