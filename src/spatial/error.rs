use std::time::Duration;

use crate::api::{ApiError, ItemType};

use super::grid::GridDensity;
use super::render::{ArtifactFormat, RenderError};

/// Failure of a spatial-map or aggregation request.
///
/// Every variant is scoped to the single request that produced it.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("board id must not be empty")]
    EmptyBoardId,

    #[error("frame id must not be empty")]
    EmptyFrameId,

    #[error(
        "grid density {0} is out of range (expected {min} to {max})",
        min = GridDensity::MIN,
        max = GridDensity::MAX
    )]
    InvalidGridDensity(u32),

    #[error("item {item_id} is not a frame, it's a {actual}")]
    NotAFrame { item_id: String, actual: ItemType },

    #[error("failed to {operation} on board {board_id}: {source}")]
    Upstream {
        operation: String,
        board_id: String,
        #[source]
        source: ApiError,
    },

    #[error("item listing on board {board_id} repeated cursor {cursor:?} after {pages} page(s)")]
    RepeatedCursor {
        board_id: String,
        cursor: String,
        pages: usize,
    },

    #[error("failed to render {format} artifact: {source}")]
    Render {
        format: ArtifactFormat,
        #[source]
        source: RenderError,
    },

    #[error("spatial map for frame {frame_id} timed out after {limit:?}")]
    TimedOut { frame_id: String, limit: Duration },
}

impl MapError {
    pub(crate) fn upstream(
        operation: impl Into<String>,
        board_id: &str,
    ) -> impl FnOnce(ApiError) -> MapError {
        let operation = operation.into();
        let board_id = board_id.to_string();
        move |source| MapError::Upstream {
            operation,
            board_id,
            source,
        }
    }

    /// The underlying API failure, if this error came from the remote service.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            MapError::Upstream { source, .. } => Some(source),
            _ => None,
        }
    }
}
