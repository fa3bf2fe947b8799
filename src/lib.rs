//! Google Search Agent
//!
//! A Model Context Protocol (MCP) server exposing the Google Custom Search
//! JSON API as a single tool, `google_search`, over HTTP.
//!
//! # Overview
//!
//! - [`tools::builtin::GoogleSearchTool`] validates the `query` argument,
//!   reads credentials per call, queries the upstream API and reshapes the
//!   hits into `[{"title": .., "link": ..}]`.
//! - [`protocol::McpServer`] decodes JSON-RPC messages (`initialize`,
//!   `tools/list`, `tools/call`, ...) and dispatches them.
//! - [`http`] mounts the MCP endpoint at the root next to `/health` and
//!   `/version`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use google_search_agent::config::ProcessEnv;
//! use google_search_agent::protocol::McpServer;
//! use google_search_agent::tools::builtin::{google_search, GoogleSearchConfig, GoogleSearchTool};
//! use google_search_agent::tools::ToolSystem;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tools = ToolSystem::new();
//! tools.register(Box::new(GoogleSearchTool::new(
//!     google_search::default_client()?,
//!     GoogleSearchConfig::default(),
//!     Arc::new(ProcessEnv),
//! )));
//!
//! let server = Arc::new(McpServer::new("google-search-agent", "0.3.0", tools));
//! let address = "127.0.0.1:8080".parse()?;
//! google_search_agent::http::serve(server, address, async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod protocol;
pub mod tools;

pub use config::{AgentConfig, ConfigError, ProcessEnv, SearchCredentials, SecretSource};
pub use error::{AgentError, AgentResult};
pub use protocol::{CallToolResult, McpServer};
pub use tools::{Tool, ToolDescription, ToolError, ToolSystem};

/// Service name reported by `/version` and `initialize`
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Service version reported by `/version` and `initialize`
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
