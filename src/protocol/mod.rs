//! Model Context Protocol surface
//!
//! `messages` holds the JSON-RPC and MCP wire types; `server` dispatches
//! decoded requests to the tool system.

pub mod messages;
pub mod server;

pub use messages::*;
pub use server::{McpReply, McpServer};
