//! Frame spatial mapping.
//!
//! Turns a frame and its children into a coordinate-annotated picture plus a
//! geometric payload, both derived from one set of placements.

mod aggregate;
mod color;
mod encode;
mod error;
mod grid;
mod map;
mod render;
mod transform;

pub use aggregate::{fetch_all_items, ItemSource};
pub use error::MapError;
pub use map::{build_spatial_map, SpatialMap, SpatialMapRequest};
pub use render::ArtifactFormat;

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory item source and item builders.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::ItemSource;
    use crate::api::{ApiError, Geometry, Item, ItemQuery, ItemsPage, Position};

    pub fn item(
        id: &str,
        item_type: &str,
        position: Option<(f64, f64)>,
        size: Option<(f64, f64)>,
    ) -> Item {
        Item {
            id: id.to_string(),
            item_type: item_type.to_string().into(),
            position: position.map(|(x, y)| Position {
                x,
                y,
                origin: Some("center".to_string()),
                relative_to: None,
            }),
            geometry: size.map(|(width, height)| Geometry {
                width: Some(width),
                height: Some(height),
                ..Default::default()
            }),
            style: None,
            data: None,
            parent: None,
            extra: Default::default(),
        }
    }

    pub fn frame(id: &str, x: f64, y: f64, width: f64, height: f64) -> Item {
        item(id, "frame", Some((x, y)), Some((width, height)))
    }

    pub fn page(ids: &[&str], cursor: Option<&str>) -> ItemsPage {
        ItemsPage {
            data: ids
                .iter()
                .map(|id| item(id, "shape", Some((0.0, 0.0)), None))
                .collect(),
            cursor: cursor.map(str::to_string),
            total: None,
        }
    }

    #[derive(Default)]
    struct Calls {
        cursors: Vec<Option<String>>,
        queries: Vec<ItemQuery>,
    }

    /// Serves scripted pages in order and a fixed set of items by id.
    pub struct MockSource {
        pages: Mutex<VecDeque<Result<ItemsPage, ApiError>>>,
        items: Vec<Item>,
        calls: Mutex<Calls>,
    }

    impl MockSource {
        pub fn new(pages: Vec<Result<ItemsPage, ApiError>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                items: Vec::new(),
                calls: Mutex::new(Calls::default()),
            }
        }

        pub fn with_item(mut self, item: Item) -> Self {
            self.items.push(item);
            self
        }

        pub fn page_calls(&self) -> usize {
            self.calls.lock().unwrap().cursors.len()
        }

        pub fn cursors(&self) -> Vec<Option<String>> {
            self.calls.lock().unwrap().cursors.clone()
        }

        pub fn queries(&self) -> Vec<ItemQuery> {
            self.calls.lock().unwrap().queries.clone()
        }
    }

    #[async_trait]
    impl ItemSource for MockSource {
        async fn fetch_item(&self, board_id: &str, item_id: &str) -> Result<Item, ApiError> {
            self.items
                .iter()
                .find(|i| i.id == item_id)
                .cloned()
                .ok_or_else(|| ApiError::Status {
                    status: 404,
                    url: format!("mock://boards/{}/items/{}", board_id, item_id),
                    body: "not found".to_string(),
                })
        }

        async fn fetch_page(
            &self,
            _board_id: &str,
            query: &ItemQuery,
            cursor: Option<&str>,
        ) -> Result<ItemsPage, ApiError> {
            {
                let mut calls = self.calls.lock().unwrap();
                calls.cursors.push(cursor.map(str::to_string));
                calls.queries.push(query.clone());
            }
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ItemsPage::default()))
        }
    }
}
