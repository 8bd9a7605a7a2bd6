//! MCP server exposing the knowledge tools over stdio

use crate::tools::{
    AdvancedSearchArgs, AnalyzeStackTraceArgs, GetQuestionArgs, KnowledgeTools,
    SearchByErrorArgs, SearchByQueryArgs, ToolError,
};
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    transport::stdio,
};
use thiserror::Error;
use tracing::{info, warn};

const INSTRUCTIONS: &str = "Searches Stack Overflow for questions, answers and comments. \
Use search_by_error for error messages, analyze_stack_trace for full traces, \
get_question when the question ID is known and advanced_search for fine-grained filters. \
Results are Markdown by default; pass response_format=\"json\" for structured output.";

/// MCP server lifecycle errors
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to start MCP server: {0}")]
    Start(String),

    #[error("MCP server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Clone)]
pub struct StackgateMcp {
    tool_router: ToolRouter<Self>,
    tools: KnowledgeTools,
}

#[tool_router]
impl StackgateMcp {
    pub fn new(tools: KnowledgeTools) -> Self {
        Self {
            tool_router: Self::tool_router(),
            tools,
        }
    }

    #[tool(description = "Search Stack Overflow for questions matching a free-text query")]
    async fn search_by_query(
        &self,
        Parameters(args): Parameters<SearchByQueryArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(call_result(self.tools.search_by_query(args).await))
    }

    #[tool(
        description = "Search Stack Overflow for an error message, optionally tagged by language and technologies"
    )]
    async fn search_by_error(
        &self,
        Parameters(args): Parameters<SearchByErrorArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(call_result(self.tools.search_by_error(args).await))
    }

    #[tool(description = "Fetch one Stack Overflow question by ID with its answers and comments")]
    async fn get_question(
        &self,
        Parameters(args): Parameters<GetQuestionArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(call_result(self.tools.get_question(args).await))
    }

    #[tool(description = "Find Stack Overflow questions related to a stack trace")]
    async fn analyze_stack_trace(
        &self,
        Parameters(args): Parameters<AnalyzeStackTraceArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(call_result(self.tools.analyze_stack_trace(args).await))
    }

    #[tool(description = "Search Stack Overflow with the full set of advanced search filters")]
    async fn advanced_search(
        &self,
        Parameters(args): Parameters<AdvancedSearchArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(call_result(self.tools.advanced_search(args).await))
    }
}

// Tool failures are reported to the host as error results, not protocol errors
fn call_result(result: Result<String, ToolError>) -> CallToolResult {
    match result {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(err) => {
            warn!("Tool call failed: {}", err);
            CallToolResult::error(vec![Content::text(err.to_string())])
        }
    }
}

#[tool_handler]
impl ServerHandler for StackgateMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Serve `tools` on stdin/stdout until the client disconnects
pub async fn serve_stdio(tools: KnowledgeTools) -> Result<(), ServeError> {
    info!("Starting MCP server on stdio");
    let running = StackgateMcp::new(tools)
        .serve(stdio())
        .await
        .map_err(|e| ServeError::Start(e.to_string()))?;
    let reason = running.waiting().await?;
    info!("MCP server stopped: {:?}", reason);
    Ok(())
}
