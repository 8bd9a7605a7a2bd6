//! Tool surface shared by the MCP server and the CLI

pub mod args;
pub mod knowledge_tools;

#[cfg(test)]
pub(crate) mod test_support;

pub use args::{
    AdvancedSearchArgs, AnalyzeStackTraceArgs, GetQuestionArgs, SearchByErrorArgs,
    SearchByQueryArgs,
};
pub use knowledge_tools::{FETCH_FAILED, KnowledgeTools, SEARCH_FAILED, TRACE_FAILED, ToolError};
