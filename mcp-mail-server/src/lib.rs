//! mcp-mail-server - MCP server for sending and organizing email
//!
//! Exposes SMTP delivery, file-based templates and the Gmail API as MCP
//! tools over stdio or HTTP.

pub mod mcp;
pub mod server;
pub mod state;
pub mod tools;

pub use server::{router, serve_http, serve_stdio, McpServer};
pub use state::AppState;
