//! Error types for the Google Search agent
//!
//! Maps internal errors to JSON-RPC error codes for the MCP endpoint.
//! Tool-level failures (bad arguments, missing credentials, upstream HTTP
//! status) never reach this module: they travel as `CallToolResult` values.

use crate::protocol::messages::{ErrorCode, RpcError};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Main error type for agent operations
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },

    #[error("Server error: {message}")]
    ServerError { message: String },

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),

    #[error("Tool error: {0}")]
    ToolError(#[from] crate::tools::ToolError),
}

impl AgentError {
    /// Convert to a JSON-RPC error object for the response envelope
    pub fn to_rpc_error(&self) -> RpcError {
        use crate::tools::ToolError;

        let (code, message) = match self {
            AgentError::InvalidInput { message } => (ErrorCode::InvalidParams, message.clone()),
            AgentError::InternalError { message } => (ErrorCode::InternalError, message.clone()),
            AgentError::ServerError { message } => (ErrorCode::InternalError, message.clone()),
            AgentError::ConfigError(e) => (
                ErrorCode::InternalError,
                format!("Configuration error: {e}"),
            ),
            AgentError::ToolError(e @ ToolError::UnknownTool(_)) => {
                (ErrorCode::InvalidParams, e.to_string())
            }
            AgentError::ToolError(e) => (ErrorCode::InternalError, e.to_string()),
        };

        RpcError::new(code, sanitize_error_message(&message))
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create internal error
    pub fn internal_error<S: Into<String>>(message: S) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Create server error
    pub fn server_error<S: Into<String>>(message: S) -> Self {
        Self::ServerError {
            message: message.into(),
        }
    }
}

static SECRET_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(password|token|key|secret|cx)([=:]\s*)[^\s&]+").expect("valid regex")
});

/// Sanitize error messages before they leave the process
///
/// reqwest errors embed the request URL, which carries the API key and
/// engine id as query parameters.
pub fn sanitize_error_message(message: &str) -> String {
    let mut sanitized = SECRET_ASSIGNMENT
        .replace_all(message, "${1}${2}***")
        .to_string();

    // Truncate very long messages - ensure total length is <= 500
    if sanitized.len() > 500 {
        let truncate_suffix = "...[truncated]";
        let mut cut = 500 - truncate_suffix.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized = format!("{}{}", &sanitized[..cut], truncate_suffix);
    }

    sanitized
}

/// Result type for agent operations
pub type AgentResult<T> = Result<T, AgentError>;
