//! Builtin tools exposed over the MCP endpoint
//!
//! Each tool keeps its pure request/response shaping functions separate from
//! the I/O in `execute`.

pub mod google_search;

pub use google_search::{GoogleSearchConfig, GoogleSearchTool, SearchArgs, SearchResultItem};
