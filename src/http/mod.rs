//! HTTP front door
//!
//! Routes:
//! - `/health` and `/version`: static informational endpoints
//! - everything else with `POST`: the MCP endpoint, wrapped in access logging

pub mod access_log;
pub mod health;
pub mod mcp;

use crate::error::{AgentError, AgentResult};
use crate::protocol::McpServer;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use warp::{Filter, Rejection, Reply};

/// Full route table
pub fn routes(
    server: Arc<McpServer>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let info = server.server_info().clone();

    health::health_route()
        .or(health::version_route(info))
        .or(mcp::mcp_route(server))
}

/// Resolve `host:port` (hostnames allowed) to the first socket address
pub async fn resolve_bind_address(address: &str) -> AgentResult<SocketAddr> {
    tokio::net::lookup_host(address)
        .await
        .map_err(|e| AgentError::server_error(format!("Cannot resolve {address}: {e}")))?
        .next()
        .ok_or_else(|| AgentError::server_error(format!("No address found for {address}")))
}

/// Bind and serve until `shutdown` resolves
///
/// Binding failure is returned as an error; everything after that is
/// per-request and never stops the server.
pub async fn serve<F>(server: Arc<McpServer>, address: SocketAddr, shutdown: F) -> AgentResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (bound, running) = warp::serve(routes(server))
        .try_bind_with_graceful_shutdown(address, shutdown)
        .map_err(|e| AgentError::server_error(format!("Failed to bind {address}: {e}")))?;

    info!("MCP server listening on {}", bound);
    info!("MCP endpoint available at / (POST with JSON-RPC)");
    info!(
        "Test with: curl -X POST -d '{{\"jsonrpc\":\"2.0\",\"method\":\"tools/list\",\"id\":1}}' http://{}",
        bound
    );

    running.await;
    info!("HTTP server stopped");
    Ok(())
}
