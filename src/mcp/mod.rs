//! MCP (Model Context Protocol) server implementation using rmcp.
//!
//! The server exposes Miro board operations as tools, each board as a
//! `miro://board/{id}` resource, and a prompt with key facts about boards.

mod handlers;
mod server;
mod tools;
pub mod types;

pub use handlers::run_mcp_server;
pub use server::MiroMcpServer;
