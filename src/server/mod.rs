//! MCP server for the Ecclesia parish management API.
//!
//! This module provides the MCP protocol server that exposes tither, contribution,
//! parish and report functionality to AI assistants through the Model Context Protocol.

pub mod handlers;
pub mod views;

pub use handlers::{EcclesiaMcpServer, Services};

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the Ecclesia MCP server with stdio transport.
///
/// Communicates via stdin/stdout and returns once the client disconnects.
pub async fn run_server(server: EcclesiaMcpServer) -> Result<()> {
    let service = server.serve(stdio()).await?;

    service.waiting().await?;

    Ok(())
}
