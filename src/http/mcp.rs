//! Root-mounted MCP endpoint (streamable HTTP, JSON responses only)

use crate::http::access_log::{self, MCP_SESSION_ID};
use crate::protocol::{McpReply, McpServer};
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::header::{HeaderName, HeaderValue};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Largest JSON-RPC body accepted
pub const MAX_BODY_BYTES: u64 = 4 * 1024 * 1024;

/// POST on any path not claimed by an earlier route, wrapped in access logging
pub fn mcp_route(
    server: Arc<McpServer>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::post()
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(warp::any().map(move || server.clone()))
        .and_then(handle_mcp)
        .with(warp::log::custom(access_log::log_request))
}

async fn handle_mcp(body: Bytes, server: Arc<McpServer>) -> Result<Response, Infallible> {
    let reply = server.handle_body(&body).await;
    Ok(build_response(reply))
}

/// Status to send: the explicit one if the handler chose it, else 200
pub fn response_status(explicit: Option<StatusCode>) -> StatusCode {
    explicit.unwrap_or(StatusCode::OK)
}

fn build_response(reply: McpReply) -> Response {
    let (mut response, explicit_status) = match reply.body {
        Some(body) => (warp::reply::json(&body).into_response(), None),
        // Notifications only: acknowledged, nothing to return
        None => (warp::reply().into_response(), Some(StatusCode::ACCEPTED)),
    };

    *response.status_mut() = response_status(explicit_status);

    if let Some(session_id) = reply.session_id {
        if let Ok(value) = HeaderValue::from_str(&session_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(MCP_SESSION_ID), value);
        }
    }

    response
}
