//! Presentation layer for stackgate
//!
//! This crate contains the tool surface, the MCP server, CLI definitions
//! and output formatters.

pub mod cli;
pub mod mcp;
pub mod output;
pub mod tools;

// Re-export commonly used types
pub use cli::{Cli, Command, FormatArg};
pub use mcp::{ServeError, StackgateMcp, serve_stdio};
pub use output::{JsonFormatter, MarkdownFormatter, OutputFormatter, format_response};
pub use tools::{KnowledgeTools, ToolError};
