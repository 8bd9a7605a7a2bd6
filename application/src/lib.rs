//! Application layer for stackgate
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::knowledge_gateway::{FetchError, KnowledgeGateway, THROTTLED_STATUS};
pub use use_cases::assemble_results::ResultAssembler;
pub use use_cases::query_knowledge::{
    AnalyzeStackTraceInput, DEFAULT_SEARCH_LIMIT, DEFAULT_TRACE_LIMIT, GetQuestionInput,
    QueryError, QueryKnowledgeUseCase, SearchByErrorInput, SearchByQueryInput,
};
