//! MCP server implementation.
//!
//! This module contains the MiroMcpServer struct, its tool routing, and the
//! board resources and prompt it exposes.

use std::sync::Arc;
use std::time::Duration;

use rmcp::{
    handler::server::router::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    service::RequestContext, tool, tool_handler, tool_router, ErrorData as McpError, RoleServer,
    ServerHandler,
};
use tracing::{debug, warn};

use crate::api::{ItemQuery, MiroClient, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::spatial::fetch_all_items;

use super::tools;
use super::types::*;

/// Default deadline for one spatial map
pub const DEFAULT_MAP_TIMEOUT: Duration = Duration::from_secs(120);

const BOARD_URI_PREFIX: &str = "miro://board/";
const PROMPT_NAME: &str = "Working with MIRO";
const BOARD_KEY_FACTS: &str = include_str!("../../resources/boards-key-facts.md");

/// Board id named by a `miro://board/{id}` resource URI.
fn board_id_from_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix(BOARD_URI_PREFIX)
        .map(|id| id.trim_end_matches('/'))
        .filter(|id| !id.is_empty() && !id.contains('/'))
}

/// Miro MCP Server
#[derive(Clone)]
pub struct MiroMcpServer {
    client: Arc<MiroClient>,
    tool_router: ToolRouter<Self>,
    /// Items requested per listing page
    page_size: u32,
    /// Deadline for the whole spatial-map pipeline
    map_timeout: Duration,
}

#[tool_router]
impl MiroMcpServer {
    /// Create a new Miro MCP server around a shared API client
    pub fn new(client: Arc<MiroClient>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
            page_size: MAX_PAGE_SIZE,
            map_timeout: DEFAULT_MAP_TIMEOUT,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        self
    }

    pub fn with_map_timeout(mut self, map_timeout: Duration) -> Self {
        self.map_timeout = map_timeout;
        self
    }

    #[tool(
        name = "list_boards",
        description = "List all Miro boards the token can access, with their IDs and names"
    )]
    async fn list_boards(
        &self,
        Parameters(_): Parameters<ListBoardsArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::list_boards(&self.client).await
    }

    #[tool(
        name = "get_frames",
        description = "Get all frames on a Miro board, following pagination to the end"
    )]
    async fn get_frames(
        &self,
        Parameters(args): Parameters<BoardArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::get_frames(&self.client, self.page_size, args).await
    }

    #[tool(
        name = "get_items_in_frame",
        description = "Get all items inside a specific frame on a Miro board"
    )]
    async fn get_items_in_frame(
        &self,
        Parameters(args): Parameters<FrameItemsArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::get_items_in_frame(&self.client, self.page_size, args).await
    }

    #[tool(
        name = "get_items_on_board",
        description = "Get one page of items on a Miro board. Pass the returned cursor to fetch the next page. Optionally filter by item type."
    )]
    async fn get_items_on_board(
        &self,
        Parameters(args): Parameters<BoardItemsPageArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::get_items_on_board(&self.client, args).await
    }

    #[tool(
        name = "create_sticky_note_item",
        description = "Create a sticky note on a Miro board. data holds the content and shape, style the fillColor and text alignment, position the x/y coordinates."
    )]
    async fn create_sticky_note_item(
        &self,
        Parameters(args): Parameters<CreateStickyNoteArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::create_sticky_note(&self.client, args).await
    }

    #[tool(
        name = "update_sticky_note_item",
        description = "Update the content, style, position, geometry or parent of an existing sticky note"
    )]
    async fn update_sticky_note_item(
        &self,
        Parameters(args): Parameters<UpdateStickyNoteArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::update_sticky_note(&self.client, args).await
    }

    #[tool(
        name = "delete_sticky_note_item",
        description = "Delete a sticky note from a Miro board"
    )]
    async fn delete_sticky_note_item(
        &self,
        Parameters(args): Parameters<ItemArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::delete_sticky_note(&self.client, args).await
    }

    #[tool(
        name = "create_items_in_bulk",
        description = "Create up to 20 items (sticky notes, shapes, text, cards, ...) on a Miro board in one transaction. Every item needs a type."
    )]
    async fn create_items_in_bulk(
        &self,
        Parameters(args): Parameters<BulkCreateArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::create_items_in_bulk(&self.client, args).await
    }

    #[tool(
        name = "create_shape",
        description = "Create a shape on a Miro board. data.shape selects the kind (rectangle, circle, triangle, rhombus, ...)."
    )]
    async fn create_shape(
        &self,
        Parameters(args): Parameters<CreateShapeArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::create_shape(&self.client, args).await
    }

    #[tool(
        name = "create_image",
        description = "Create an image on a Miro board from either a URL or base64 data. Base64 data must be a data URI (data:image/png;base64,...). For images with a fixed aspect ratio, specify either width OR height, not both."
    )]
    async fn create_image(
        &self,
        Parameters(args): Parameters<CreateImageArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::create_image(&self.client, args).await
    }

    #[tool(
        name = "get_image",
        description = "Get the image data of an image item on a Miro board, as image content plus its dimensions"
    )]
    async fn get_image(
        &self,
        Parameters(args): Parameters<GetImageArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::get_image(&self.client, args).await
    }

    #[tool(
        name = "create_embed",
        description = "Embed external content (YouTube, Figma, Google Docs, ...) on a Miro board"
    )]
    async fn create_embed(
        &self,
        Parameters(args): Parameters<CreateEmbedArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::create_embed(&self.client, args).await
    }

    #[tool(
        name = "get_shape_details",
        description = "Get the kind, position, size, style and content of a shape item"
    )]
    async fn get_shape_details(
        &self,
        Parameters(args): Parameters<ShapeDetailsArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::get_shape_details(&self.client, args).await
    }

    #[tool(
        name = "get_shapes_by_type",
        description = "Find every shape of a given kind (rectangle, circle, ...) on a Miro board"
    )]
    async fn get_shapes_by_type(
        &self,
        Parameters(args): Parameters<ShapesByTypeArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::get_shapes_by_type(&self.client, self.page_size, args).await
    }

    #[tool(
        name = "export_board_as_json",
        description = "Export every item on a Miro board as JSON. Image items get a highResImageUrl unless includeImages is false."
    )]
    async fn export_board_as_json(
        &self,
        Parameters(args): Parameters<ExportBoardArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::export_board_as_json(&self.client, self.page_size, args).await
    }

    #[tool(
        name = "get_frame_spatial_map",
        description = "Render a frame and everything in it as a picture with a coordinate grid, plus a JSON list of every item's global position, frame-relative position and size.\n\nGrid labels are board coordinates, so positions read off the picture can be used directly in create and update calls. Returns a text summary, the JSON payload, and the map as SVG text (format=svg, default) or a PNG image (format=png). gridDensity sets the divisions per axis (4 to 20, default 10); includeText draws item text."
    )]
    async fn get_frame_spatial_map(
        &self,
        Parameters(args): Parameters<SpatialMapArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::get_frame_spatial_map(&self.client, self.page_size, self.map_timeout, args).await
    }
}

#[tool_handler]
impl ServerHandler for MiroMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: "miro-mcp".to_string(),
                title: Some("Miro".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Miro MCP Server reads and edits Miro boards: boards, frames, sticky notes, shapes, images and embeds. Use get_frame_spatial_map to see where things are before placing new items."
                    .to_string(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let boards = self.client.list_boards().await.map_err(|e| {
            warn!("Failed to list board resources: {}", e);
            McpError::internal_error(format!("failed to list boards: {}", e), None)
        })?;

        let resources = boards
            .into_iter()
            .map(|board| {
                let uri = format!("{}{}", BOARD_URI_PREFIX, board.id);
                let mut raw = RawResource::new(uri, board.name.clone());
                raw.mime_type = Some("application/json".to_string());
                raw.description = Some(
                    board
                        .description
                        .filter(|d| !d.is_empty())
                        .unwrap_or_else(|| format!("Miro board: {}", board.name)),
                );
                raw.no_annotation()
            })
            .collect();
        Ok(ListResourcesResult::with_all_items(resources))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let uri = request.uri;
        let Some(board_id) = board_id_from_uri(&uri) else {
            return Err(McpError::resource_not_found(
                format!("resource URI must look like {}{{board id}}", BOARD_URI_PREFIX),
                Some(serde_json::json!({ "uri": &uri })),
            ));
        };
        debug!("Reading board resource {}", board_id);

        let query = ItemQuery::default().with_limit(self.page_size);
        let items = fetch_all_items(self.client.as_ref(), board_id, &query)
            .await
            .map_err(|e| McpError::internal_error(format!("failed to read board: {}", e), None))?;
        let text = serde_json::to_string_pretty(&items)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult::with_all_items(vec![Prompt::new(
            PROMPT_NAME,
            Some("Basic prompt for working with MIRO boards"),
            None,
        )]))
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        if request.name != PROMPT_NAME {
            return Err(McpError::invalid_params(
                format!("unknown prompt: {}", request.name),
                None,
            ));
        }
        Ok(GetPromptResult {
            description: Some("Key facts about Miro boards".to_string()),
            messages: vec![PromptMessage::new_text(
                PromptMessageRole::User,
                BOARD_KEY_FACTS,
            )],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClientConfig;

    fn first_text(result: &CallToolResult) -> String {
        result
            .content
            .first()
            .and_then(|c| c.as_text())
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    fn server() -> MiroMcpServer {
        let client = MiroClient::new(ClientConfig::new("test-token")).unwrap();
        MiroMcpServer::new(Arc::new(client))
    }

    #[test]
    fn test_mcp_server_creation() {
        let server = server();
        assert_eq!(server.page_size, MAX_PAGE_SIZE);
        assert_eq!(server.map_timeout, DEFAULT_MAP_TIMEOUT);
    }

    #[test]
    fn test_server_settings_are_clamped() {
        let server = server()
            .with_page_size(3)
            .with_map_timeout(Duration::from_secs(5));
        assert_eq!(server.page_size, MIN_PAGE_SIZE);
        assert_eq!(server.map_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_all_tools_registered() {
        let names: Vec<String> = server()
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        for expected in [
            "list_boards",
            "get_frames",
            "get_items_in_frame",
            "get_items_on_board",
            "create_sticky_note_item",
            "update_sticky_note_item",
            "delete_sticky_note_item",
            "create_items_in_bulk",
            "create_shape",
            "create_image",
            "get_image",
            "create_embed",
            "get_shape_details",
            "get_shapes_by_type",
            "export_board_as_json",
            "get_frame_spatial_map",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing tool {expected}");
        }
    }

    #[test]
    fn test_board_uri_parsing() {
        assert_eq!(board_id_from_uri("miro://board/uXjVO="), Some("uXjVO="));
        assert_eq!(board_id_from_uri("miro://board/abc/"), Some("abc"));
        assert_eq!(board_id_from_uri("miro://board/"), None);
        assert_eq!(board_id_from_uri("miro://board/a/items"), None);
        assert_eq!(board_id_from_uri("https://miro.com/app/board/abc"), None);
    }

    #[test]
    fn test_key_facts_are_bundled() {
        assert!(BOARD_KEY_FACTS.contains("sticky"));
    }

    #[tokio::test]
    async fn test_invalid_density_fails_before_network() {
        let server = server();
        let result = server
            .get_frame_spatial_map(Parameters(SpatialMapArgs {
                board_id: "b".to_string(),
                frame_id: "f".to_string(),
                include_text: false,
                grid_density: Some(30),
                format: crate::spatial::ArtifactFormat::Svg,
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(first_text(&result).contains("grid density 30"));
    }
}
