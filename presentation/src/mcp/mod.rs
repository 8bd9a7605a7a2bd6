//! MCP (Model Context Protocol) server

mod server;

pub use server::{ServeError, StackgateMcp, serve_stdio};
