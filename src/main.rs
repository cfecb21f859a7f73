//! Ecclesia MCP Server - Main entry point
//!
//! Provides a Model Context Protocol (MCP) interface to the Ecclesia parish
//! management API over stdio.

use anyhow::Result;
use ecclesia_mcp_server::client::{AsyncEcclesiaClient, AsyncEcclesiaClientImpl};
use ecclesia_mcp_server::session::{FileTokenStore, MemoryTokenStore, TokenStore};
use ecclesia_mcp_server::{Config, EcclesiaClient, EcclesiaMcpServer, Services, Session};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration before logging so LOG_LEVEL can seed the filter
    let config = Config::from_env();

    // stderr only: stdout carries the MCP protocol
    let default_level = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Starting Ecclesia MCP Server with API URL: {}",
        config.api_base_url
    );

    let store: Box<dyn TokenStore> = match &config.session_file {
        Some(path) => {
            info!("Persisting session to {}", path.display());
            Box::new(FileTokenStore::new(path.clone()))
        }
        None => Box::new(MemoryTokenStore::new()),
    };
    let session = Arc::new(Session::restore(store));

    let sync_client = EcclesiaClient::new(&config, session.clone());
    let client =
        Arc::new(AsyncEcclesiaClientImpl::new(sync_client)) as Arc<dyn AsyncEcclesiaClient>;

    let services = Services::from_client(client, session);

    // A restored token is re-validated against /auth/me; failing that, fall back
    // to configured credentials
    let user = match services.auth.check_auth().await {
        Ok(user) => user,
        Err(e) => {
            warn!("Could not validate stored session: {}", e);
            None
        }
    };
    match (user, &config.credentials) {
        (Some(user), _) => info!("Resumed session for {}", user.email),
        (None, Some(credentials)) => {
            match services
                .auth
                .login(&credentials.email, &credentials.password)
                .await
            {
                Ok(user) => info!("Logged in as {}", user.email),
                Err(e) => warn!("Login with configured credentials failed: {}", e),
            }
        }
        (None, None) => info!("No session; tools will require the login tool first"),
    }

    let server = EcclesiaMcpServer::new(services).with_default_page_size(config.default_page_size);

    info!("Starting MCP server with stdio transport");
    ecclesia_mcp_server::server::run_server(server).await?;

    info!("Ecclesia MCP Server shutdown complete");
    Ok(())
}
