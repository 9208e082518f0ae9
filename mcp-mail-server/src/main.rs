//! mcp-mail-server binary

use mail_core::config::{LoggingConfig, Transport};
use mail_core::{Config, Credentials};
use mcp_mail_server::{serve_http, serve_stdio, AppState, McpServer};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    init_logging(&config.logging);

    info!("🚀 Starting mcp-mail-server v{}...", env!("CARGO_PKG_VERSION"));

    let credentials = Credentials::from_env();
    debug!("Credentials: {:?}", credentials);

    let transport = config.server.transport;
    let listen_addr = config.server.listen_addr.clone();

    let state = Arc::new(AppState::new(config, credentials));
    let server = Arc::new(McpServer::new(state));
    info!("📋 Available tools: {}", server.tool_names().join(", "));

    match transport {
        Transport::Stdio => serve_stdio(server).await,
        Transport::Http => serve_http(server, &listen_addr).await,
    }
}

/// Logs go to stderr; stdout carries protocol traffic in stdio mode.
/// `RUST_LOG` takes precedence over `logging.level`.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
