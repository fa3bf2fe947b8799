//! Observability for the Google Search agent
//!
//! Structured logging setup and the span macros used around MCP requests and
//! tool execution. Per-request access logging lives with the HTTP routes.

pub mod logging;

// Re-export for convenience
pub use logging::{init_default_logging, init_logging, LogFormat};

// Span macros for structured logging
pub use logging::{request_span, tool_span};
