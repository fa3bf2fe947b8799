//! MCP request dispatcher
//!
//! Turns JSON-RPC bodies into typed method calls against the [`ToolSystem`]
//! and serializes the outcome back into JSON-RPC responses. Transport
//! concerns (HTTP status, headers) stay in the `http` module.

use crate::error::AgentError;
use crate::protocol::messages::{
    CallToolParams, ErrorCode, Implementation, InitializeParams, InitializeResult,
    ListToolsResult, RpcError, RpcRequest, RpcResponse, ServerCapabilities, ToolsCapability,
    JSONRPC_VERSION, LATEST_PROTOCOL_VERSION, SUPPORTED_PROTOCOL_VERSIONS,
};
use crate::tools::ToolSystem;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, Instrument};
use uuid::Uuid;

/// What the transport should send back for one HTTP body
#[derive(Debug, Clone, PartialEq)]
pub struct McpReply {
    /// Response document; `None` when every message was a notification
    pub body: Option<Value>,
    /// Set when an `initialize` call succeeded
    pub session_id: Option<String>,
}

struct Outcome {
    response: Option<RpcResponse>,
    session_id: Option<String>,
}

impl Outcome {
    fn reply(response: RpcResponse) -> Self {
        Self {
            response: Some(response),
            session_id: None,
        }
    }

    fn silent() -> Self {
        Self {
            response: None,
            session_id: None,
        }
    }
}

/// Model Context Protocol server exposing a fixed set of tools
pub struct McpServer {
    info: Implementation,
    tools: ToolSystem,
}

impl McpServer {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, version: V, tools: ToolSystem) -> Self {
        Self {
            info: Implementation {
                name: name.into(),
                version: version.into(),
            },
            tools,
        }
    }

    pub fn server_info(&self) -> &Implementation {
        &self.info
    }

    /// Handle one raw HTTP body: a single message or a batch
    pub async fn handle_body(&self, body: &[u8]) -> McpReply {
        let message: Value = match serde_json::from_slice(body) {
            Ok(message) => message,
            Err(e) => {
                debug!("Rejecting unparseable JSON-RPC body: {}", e);
                return McpReply {
                    body: Some(to_json(&RpcResponse::failure(
                        Value::Null,
                        RpcError::new(ErrorCode::ParseError, format!("Parse error: {e}")),
                    ))),
                    session_id: None,
                };
            }
        };

        match message {
            Value::Array(batch) if batch.is_empty() => McpReply {
                body: Some(to_json(&RpcResponse::failure(
                    Value::Null,
                    RpcError::new(ErrorCode::InvalidRequest, "Invalid Request: empty batch"),
                ))),
                session_id: None,
            },
            Value::Array(batch) => {
                let mut responses = Vec::with_capacity(batch.len());
                let mut session_id = None;

                for entry in batch {
                    let outcome = self.handle_message(entry).await;
                    responses.extend(outcome.response);
                    session_id = session_id.or(outcome.session_id);
                }

                McpReply {
                    body: (!responses.is_empty()).then(|| to_json(&responses)),
                    session_id,
                }
            }
            single => {
                let outcome = self.handle_message(single).await;
                McpReply {
                    body: outcome.response.as_ref().map(to_json),
                    session_id: outcome.session_id,
                }
            }
        }
    }

    async fn handle_message(&self, message: Value) -> Outcome {
        let id_hint = message.get("id").cloned().unwrap_or(Value::Null);

        let request: RpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                return Outcome::reply(RpcResponse::failure(
                    id_hint,
                    RpcError::new(ErrorCode::InvalidRequest, format!("Invalid Request: {e}")),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Outcome::reply(RpcResponse::failure(
                id_hint,
                RpcError::new(
                    ErrorCode::InvalidRequest,
                    format!("Invalid Request: unsupported jsonrpc version '{}'", request.jsonrpc),
                ),
            ));
        }

        let is_initialize = request.method == "initialize";
        let span = crate::request_span!(method = %request.method);
        let Some(response) = self.handle_request(request).instrument(span).await else {
            return Outcome::silent();
        };

        let session_id = (is_initialize && response.error.is_none())
            .then(|| format!("mcp-session-{}", Uuid::new_v4()));

        Outcome {
            response: Some(response),
            session_id,
        }
    }

    /// Dispatch a decoded request; notifications yield `None`
    pub async fn handle_request(&self, request: RpcRequest) -> Option<RpcResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "Received notification");
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let result = match request.method.as_str() {
            "initialize" => self.initialize(request.params),
            "ping" => Ok(json!({})),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(request.params).await,
            method => Err(RpcError::new(
                ErrorCode::MethodNotFound,
                format!("Method not found: {method}"),
            )),
        };

        Some(match result {
            Ok(result) => RpcResponse::success(id, result),
            Err(error) => RpcResponse::failure(id, error),
        })
    }

    fn initialize(&self, params: Option<Value>) -> Result<Value, RpcError> {
        let params: InitializeParams = match params {
            Some(params) => serde_json::from_value(params).map_err(|e| {
                RpcError::new(
                    ErrorCode::InvalidParams,
                    format!("Invalid initialize params: {e}"),
                )
            })?,
            None => InitializeParams::default(),
        };

        if let Some(client) = &params.client_info {
            debug!(client = %client.name, version = %client.version, "Client initializing");
        }

        let protocol_version = negotiate_protocol_version(params.protocol_version.as_deref());

        serialize_result(&InitializeResult {
            protocol_version: protocol_version.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: self.info.clone(),
        })
    }

    fn list_tools(&self) -> Result<Value, RpcError> {
        let tools = self
            .tools
            .list_tools()
            .iter()
            .map(|description| description.to_definition())
            .collect();

        serialize_result(&ListToolsResult { tools })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, RpcError> {
        let params: CallToolParams = params
            .ok_or_else(|| AgentError::invalid_input("Missing tools/call params"))
            .and_then(|params| {
                serde_json::from_value(params).map_err(|e| {
                    AgentError::invalid_input(format!("Invalid tools/call params: {e}"))
                })
            })
            .map_err(|e| e.to_rpc_error())?;

        let arguments = params.arguments.unwrap_or_else(|| json!({}));

        match self.tools.execute_tool(&params.name, &arguments).await {
            Ok(result) => serialize_result(&result),
            Err(e) => {
                error!(tool = %params.name, "Tool call failed: {}", e);
                Err(AgentError::from(e).to_rpc_error())
            }
        }
    }
}

/// Echo the client's revision when we support it, otherwise offer our latest
pub fn negotiate_protocol_version(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|requested| {
            SUPPORTED_PROTOCOL_VERSIONS
                .iter()
                .copied()
                .find(|supported| *supported == requested)
        })
        .unwrap_or(LATEST_PROTOCOL_VERSION)
}

fn serialize_result<T: Serialize>(result: &T) -> Result<Value, RpcError> {
    serde_json::to_value(result).map_err(|e| {
        AgentError::internal_error(format!("Failed to serialize result: {e}")).to_rpc_error()
    })
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
