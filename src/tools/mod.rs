//! Tool system for the MCP endpoint
//!
//! A tool describes itself (name, description, JSON Schema for its
//! arguments) and executes against a JSON argument object. Execution has two
//! failure channels:
//! - `Ok(CallToolResult::error(..))` is a tool-level error the calling agent
//!   sees as explanatory text.
//! - `Err(ToolError)` is a hard error, surfaced as a JSON-RPC fault.

use crate::protocol::{CallToolResult, ToolDefinition};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, Instrument};

pub mod builtin;

/// Tool interface
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns name, description and the JSON Schema of the arguments
    fn describe(&self) -> ToolDescription;

    /// Runs one invocation. Dropping the returned future aborts any
    /// outbound I/O still in flight.
    async fn execute(&self, arguments: &Value) -> Result<CallToolResult, ToolError>;
}

/// Tool description advertised to clients
#[derive(Debug, Clone)]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDescription {
    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.parameters.clone(),
        }
    }
}

/// Registry of tools keyed by name
pub struct ToolSystem {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolSystem {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool under its described name, replacing any previous one
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.describe().name;
        if self.tools.insert(name.clone(), tool).is_some() {
            debug!(tool = %name, "Replaced previously registered tool");
        }
    }

    /// Descriptions of all registered tools, sorted by name
    pub fn list_tools(&self) -> Vec<ToolDescription> {
        let mut descriptions: Vec<ToolDescription> =
            self.tools.values().map(|tool| tool.describe()).collect();
        descriptions.sort_by(|a, b| a.name.cmp(&b.name));
        descriptions
    }

    /// Execute a tool by name
    pub async fn execute_tool(
        &self,
        tool_name: &str,
        arguments: &Value,
    ) -> Result<CallToolResult, ToolError> {
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| ToolError::UnknownTool(tool_name.to_string()))?;

        tool.execute(arguments)
            .instrument(crate::tool_span!(tool = %tool_name))
            .await
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Hard tool failures
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Upstream request failed: {0}")]
    Upstream(String),
    #[error("Failed to decode upstream response: {0}")]
    Decode(String),
    #[error("Failed to serialize tool result: {0}")]
    Serialization(String),
    #[error("Tool execution failed: {0}")]
    ExecutionError(String),
}
