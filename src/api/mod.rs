//! API client for the Miro REST API (v2).
//!
//! This module provides the HTTP client used by every tool: board and item
//! listing, item creation endpoints, and the error type they share.

mod boards;
mod client;
mod error;
mod http;
mod items;
mod types;

pub use client::{ClientConfig, MiroClient, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use error::ApiError;
pub use items::MAX_BULK_ITEMS;
pub use types::{
    ConnectorEnd, Dimensions, Geometry, Item, ItemPayload, ItemQuery, ItemType, ItemsPage,
    Placement, Position, Style, MAX_PAGE_SIZE, MIN_PAGE_SIZE,
};
