use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

use bitbucket_mcp::config::Config;
use bitbucket_mcp::server::BitbucketMcp;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (logs go to stderr to keep stdout clean for MCP)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let service = BitbucketMcp::new(config)?;
    let server = service.serve(stdio()).await?;
    server.waiting().await?;

    Ok(())
}
