//! Query knowledge use case
//!
//! Turns the caller-facing search operations (free text, error message, stack
//! trace, direct id, advanced filters) into gateway searches and expands the
//! matches into result trees.

use crate::ports::knowledge_gateway::{FetchError, KnowledgeGateway};
use crate::use_cases::assemble_results::ResultAssembler;
use stackgate_domain::{AggregateResult, DomainError, PostId, SearchFilters};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Default number of results for query and error searches
pub const DEFAULT_SEARCH_LIMIT: u32 = 5;

/// Default number of results for stack trace analysis
pub const DEFAULT_TRACE_LIMIT: u32 = 3;

/// Errors that can occur while answering a query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("{0}")]
    Invalid(#[from] DomainError),

    #[error("{0}")]
    Fetch(#[from] FetchError),
}

/// Input for a free-text search
#[derive(Debug, Clone)]
pub struct SearchByQueryInput {
    pub query: String,
    pub tags: Vec<String>,
    pub min_score: Option<i64>,
    pub include_comments: bool,
    pub limit: u32,
}

impl SearchByQueryInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            tags: Vec::new(),
            min_score: None,
            include_comments: false,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// Input for an error message search
#[derive(Debug, Clone)]
pub struct SearchByErrorInput {
    pub error_message: String,
    pub language: Option<String>,
    pub technologies: Vec<String>,
    pub min_score: Option<i64>,
    pub include_comments: bool,
    pub limit: u32,
}

impl SearchByErrorInput {
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
            language: None,
            technologies: Vec::new(),
            min_score: None,
            include_comments: false,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Lowercased language followed by lowercased technologies
    fn tags(&self) -> Vec<String> {
        self.language
            .iter()
            .chain(self.technologies.iter())
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Input for a direct question lookup
#[derive(Debug, Clone)]
pub struct GetQuestionInput {
    pub question_id: PostId,
    pub include_comments: bool,
}

impl GetQuestionInput {
    pub fn new(question_id: PostId) -> Self {
        Self {
            question_id,
            include_comments: true,
        }
    }
}

/// Input for stack trace analysis
#[derive(Debug, Clone)]
pub struct AnalyzeStackTraceInput {
    pub stack_trace: String,
    pub language: String,
    pub include_comments: bool,
    pub limit: u32,
}

impl AnalyzeStackTraceInput {
    pub fn new(stack_trace: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            stack_trace: stack_trace.into(),
            language: language.into(),
            include_comments: true,
            limit: DEFAULT_TRACE_LIMIT,
        }
    }

    /// The line that names the error: the first non-blank line of the trace
    pub fn error_line(&self) -> Option<&str> {
        self.stack_trace
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
    }
}

/// Use case answering knowledge queries
pub struct QueryKnowledgeUseCase {
    gateway: Arc<dyn KnowledgeGateway>,
    assembler: ResultAssembler,
}

impl QueryKnowledgeUseCase {
    pub fn new(gateway: Arc<dyn KnowledgeGateway>) -> Self {
        Self {
            assembler: ResultAssembler::new(Arc::clone(&gateway)),
            gateway,
        }
    }

    /// Search by free text, optionally restricted to tags
    pub async fn search_by_query(
        &self,
        input: SearchByQueryInput,
    ) -> Result<Vec<AggregateResult>, QueryError> {
        let query = non_empty(&input.query, "query")?;
        debug!("Searching for: {}", query);
        if !input.tags.is_empty() {
            debug!("Filtering by tags: {}", input.tags.join(", "));
        }

        let filters = SearchFilters::query(query)
            .with_tags(input.tags)
            .with_min_score(input.min_score)
            .with_page_size(input.limit);
        self.search(filters, input.include_comments).await
    }

    /// Search for solutions to an error message
    pub async fn search_by_error(
        &self,
        input: SearchByErrorInput,
    ) -> Result<Vec<AggregateResult>, QueryError> {
        let message = non_empty(&input.error_message, "error message")?;
        let tags = input.tags();
        debug!("Searching for error: {}", message);
        if !tags.is_empty() {
            debug!("Using tags: {}", tags.join(", "));
        }

        let filters = SearchFilters::query(message)
            .with_tags(tags)
            .with_min_score(input.min_score)
            .with_page_size(input.limit);
        self.search(filters, input.include_comments).await
    }

    /// Fetch one question by id and expand it
    pub async fn get_question(
        &self,
        input: GetQuestionInput,
    ) -> Result<Vec<AggregateResult>, QueryError> {
        if input.question_id == 0 {
            return Err(DomainError::InvalidQuestionId(input.question_id).into());
        }
        debug!("Fetching question: {}", input.question_id);

        let question = self.gateway.get_question(input.question_id).await?;
        let result = self
            .assembler
            .assemble_one(question, input.include_comments)
            .await?;
        Ok(vec![result])
    }

    /// Search for the error named by the first line of a stack trace
    pub async fn analyze_stack_trace(
        &self,
        input: AnalyzeStackTraceInput,
    ) -> Result<Vec<AggregateResult>, QueryError> {
        let language = non_empty(&input.language, "language")?.to_lowercase();
        let error_line = input
            .error_line()
            .ok_or(DomainError::EmptyInput("stack trace"))?;
        debug!("Analyzing stack trace: {}", error_line);
        debug!("Language: {}", language);

        let filters = SearchFilters::query(error_line)
            .with_tags([language])
            .with_min_score(Some(0))
            .with_page_size(input.limit);
        self.search(filters, input.include_comments).await
    }

    /// Run a fully specified search
    pub async fn advanced_search(
        &self,
        filters: SearchFilters,
        include_comments: bool,
    ) -> Result<Vec<AggregateResult>, QueryError> {
        self.search(filters, include_comments).await
    }

    async fn search(
        &self,
        filters: SearchFilters,
        include_comments: bool,
    ) -> Result<Vec<AggregateResult>, QueryError> {
        filters.validate()?;

        let questions = self.gateway.advanced_search(&filters).await?;
        let results = self.assembler.assemble(questions, include_comments).await?;
        info!("Found {} results", results.len());
        Ok(results)
    }
}

fn non_empty<'a>(value: &'a str, field: &'static str) -> Result<&'a str, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(DomainError::EmptyInput(field))
    } else {
        Ok(trimmed)
    }
}
