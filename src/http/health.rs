//! Static informational endpoints
//!
//! Both routes answer any method with 200, matching a plain path-based mux.
//! They sit in front of the root-mounted MCP route so they never fall
//! through to JSON-RPC dispatch.

use crate::protocol::Implementation;
use serde::Serialize;
use warp::{Filter, Rejection, Reply};

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// `/health` - liveness probe, body is exactly `{"status":"ok"}`
pub fn health_route() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("health")
        .and(warp::path::end())
        .map(|| warp::reply::json(&HealthResponse { status: "ok" }))
}

/// `/version` - service name and version
pub fn version_route(
    info: Implementation,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("version")
        .and(warp::path::end())
        .map(move || warp::reply::json(&info))
}
