//! MCP tool implementations.
//!
//! Each tool family is implemented in its own module for better organization.

mod boards;
mod common;
mod content;
mod embeds;
mod images;
mod shapes;
mod spatial;

// Re-export tool functions
pub use boards::{export_board_as_json, get_frames, get_items_in_frame, get_items_on_board, list_boards};
pub use content::{create_items_in_bulk, create_sticky_note, delete_sticky_note, update_sticky_note};
pub use embeds::create_embed;
pub use images::{create_image, get_image};
pub use shapes::{create_shape, get_shape_details, get_shapes_by_type};
pub use spatial::get_frame_spatial_map;
