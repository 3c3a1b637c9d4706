//! MCP server handlers.
//!
//! This module contains only the MCP server startup logic.
//! Note: Token resolution and client construction are handled in main.rs.

use anyhow::Result;
use tracing::{error, info};

use super::server::MiroMcpServer;

/// Run the MCP server over stdio until the client disconnects.
pub async fn run_mcp_server(server: MiroMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("🔧 Starting Miro MCP Server...");
    info!("📝 Stdio mode (using rmcp)");

    let service = server.serve(stdio()).await.map_err(|e| {
        error!("Failed to start MCP service: {:?}", e);
        anyhow::anyhow!("Failed to start MCP service: {:?}", e)
    })?;
    info!("🔗 Ready for MCP client connections");

    service.waiting().await.map_err(|e| {
        error!("MCP service error: {:?}", e);
        anyhow::anyhow!("MCP service error: {:?}", e)
    })?;

    info!("MCP server shutting down");
    Ok(())
}
