//! Google Search MCP Agent - Main Entry Point

use clap::Parser;
use google_search_agent::config::{AgentConfig, ConfigError, ProcessEnv};
use google_search_agent::observability::init_default_logging;
use google_search_agent::protocol::McpServer;
use google_search_agent::tools::builtin::{google_search, GoogleSearchConfig, GoogleSearchTool};
use google_search_agent::tools::{ToolError, ToolSystem};
use google_search_agent::{http, AgentResult, APP_NAME, APP_VERSION};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

const ENV_HELP: &str = "\
Environment Variables:
  GOOGLE_API_KEY: Your Google API key for Custom Search API
  GOOGLE_CSE_ID:  Your Custom Search Engine ID (the 'cx' value)

Both are read on every tool call, not at startup.";

/// Google Search MCP Agent
#[derive(Parser)]
#[command(name = "google-search-agent")]
#[command(about = "Google Search MCP Agent - exposes Google Custom Search as an MCP tool over HTTP")]
#[command(version)]
#[command(after_help = ENV_HELP)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen interface for the HTTP server [default: 0.0.0.0]
    #[arg(long, value_name = "HOST")]
    listen: Option<String>,

    /// TCP port for the HTTP server [default: 8080]
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    info!("Starting {} v{}", APP_NAME, APP_VERSION);

    let config = match load_configuration(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_server(config).await {
        error!("Server failed: {}", e);
        process::exit(1);
    }

    info!("Application shutdown complete");
}

/// File values override defaults; explicit flags override both
fn load_configuration(cli: &Cli) -> Result<AgentConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            AgentConfig::load_from_file(path)?
        }
        None => AgentConfig::default(),
    };

    if let Some(listen) = &cli.listen {
        config.server.listen = listen.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    config.validate()?;
    Ok(config)
}

/// Bootstrap: build the tool registry with injected dependencies
fn build_tools(config: &AgentConfig) -> Result<ToolSystem, ToolError> {
    let mut tools = ToolSystem::new();
    tools.register(Box::new(GoogleSearchTool::new(
        google_search::default_client()?,
        GoogleSearchConfig::from(&config.search),
        Arc::new(ProcessEnv),
    )));
    Ok(tools)
}

async fn run_server(config: AgentConfig) -> AgentResult<()> {
    let tools = build_tools(&config)?;
    let server = Arc::new(McpServer::new(APP_NAME, APP_VERSION, tools));

    let address = http::resolve_bind_address(&config.bind_address()).await?;
    info!("Starting {} v{} on {}", APP_NAME, APP_VERSION, address);

    http::serve(server, address, shutdown_signal()).await
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}
