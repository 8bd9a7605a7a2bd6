//! Knowledge tools: argument validation, dispatch and rendering

use super::args::{
    AdvancedSearchArgs, AnalyzeStackTraceArgs, GetQuestionArgs, SearchByErrorArgs,
    SearchByQueryArgs,
};
use crate::output::format_response;
use stackgate_application::{
    AnalyzeStackTraceInput, FetchError, GetQuestionInput, QueryError, QueryKnowledgeUseCase,
    SearchByErrorInput, SearchByQueryInput,
};
use stackgate_domain::{AggregateResult, DomainError, OutputFormat, SearchFilters};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub const SEARCH_FAILED: &str = "Failed to search Stack Overflow";
pub const FETCH_FAILED: &str = "Failed to fetch Stack Overflow question";
pub const TRACE_FAILED: &str = "Failed to analyze stack trace";

/// Tool invocation failure, rendered as a single message for the host
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidInput(String),

    #[error("{label}: {source}")]
    Failed {
        label: &'static str,
        source: FetchError,
    },
}

impl ToolError {
    fn from_query(label: &'static str, err: QueryError) -> Self {
        match err {
            QueryError::Invalid(e) => ToolError::InvalidInput(e.to_string()),
            QueryError::Fetch(source) => ToolError::Failed { label, source },
        }
    }
}

impl From<DomainError> for ToolError {
    fn from(err: DomainError) -> Self {
        ToolError::InvalidInput(err.to_string())
    }
}

/// The five knowledge tools over one shared use case
#[derive(Clone)]
pub struct KnowledgeTools {
    use_case: Arc<QueryKnowledgeUseCase>,
    default_format: OutputFormat,
}

impl KnowledgeTools {
    pub fn new(use_case: QueryKnowledgeUseCase) -> Self {
        Self {
            use_case: Arc::new(use_case),
            default_format: OutputFormat::default(),
        }
    }

    /// Format used when a call leaves `response_format` unset
    pub fn with_default_format(mut self, format: OutputFormat) -> Self {
        self.default_format = format;
        self
    }

    pub async fn search_by_query(&self, args: SearchByQueryArgs) -> Result<String, ToolError> {
        let format = self.format(args.response_format.as_deref())?;
        info!("search_by_query: {}", args.query);

        let mut input = SearchByQueryInput::new(args.query);
        input.tags = args.tags.unwrap_or_default();
        input.min_score = args.min_score;
        input.include_comments = args.include_comments.unwrap_or(false);
        if let Some(limit) = args.limit {
            input.limit = limit;
        }

        let results = self.use_case.search_by_query(input).await;
        render(SEARCH_FAILED, results, format)
    }

    pub async fn search_by_error(&self, args: SearchByErrorArgs) -> Result<String, ToolError> {
        let format = self.format(args.response_format.as_deref())?;
        info!("search_by_error: {}", args.error_message);

        let mut input = SearchByErrorInput::new(args.error_message);
        input.language = args.language;
        input.technologies = args.technologies.unwrap_or_default();
        input.min_score = args.min_score;
        input.include_comments = args.include_comments.unwrap_or(false);
        if let Some(limit) = args.limit {
            input.limit = limit;
        }

        let results = self.use_case.search_by_error(input).await;
        render(SEARCH_FAILED, results, format)
    }

    pub async fn get_question(&self, args: GetQuestionArgs) -> Result<String, ToolError> {
        let format = self.format(args.response_format.as_deref())?;
        info!("get_question: {}", args.question_id);

        let mut input = GetQuestionInput::new(args.question_id);
        if let Some(include) = args.include_comments {
            input.include_comments = include;
        }

        let results = self.use_case.get_question(input).await;
        render(FETCH_FAILED, results, format)
    }

    pub async fn analyze_stack_trace(
        &self,
        args: AnalyzeStackTraceArgs,
    ) -> Result<String, ToolError> {
        let format = self.format(args.response_format.as_deref())?;
        info!("analyze_stack_trace ({})", args.language);

        let mut input = AnalyzeStackTraceInput::new(args.stack_trace, args.language);
        if let Some(include) = args.include_comments {
            input.include_comments = include;
        }
        if let Some(limit) = args.limit {
            input.limit = limit;
        }

        let results = self.use_case.analyze_stack_trace(input).await;
        render(TRACE_FAILED, results, format)
    }

    pub async fn advanced_search(&self, args: AdvancedSearchArgs) -> Result<String, ToolError> {
        let format = self.format(args.response_format.as_deref())?;
        let include_comments = args.include_comments.unwrap_or(false);
        let filters = filters_from_args(args)?;
        info!("advanced_search: {:?}", filters.query);

        let results = self
            .use_case
            .advanced_search(filters, include_comments)
            .await;
        render(SEARCH_FAILED, results, format)
    }

    fn format(&self, requested: Option<&str>) -> Result<OutputFormat, ToolError> {
        match requested {
            Some(name) => Ok(name.parse()?),
            None => Ok(self.default_format),
        }
    }
}

fn filters_from_args(args: AdvancedSearchArgs) -> Result<SearchFilters, ToolError> {
    let mut filters = SearchFilters {
        query: args.query,
        tagged: args.tags.unwrap_or_default(),
        not_tagged: args.not_tagged.unwrap_or_default(),
        min_score: args.min_score,
        title: args.title,
        body: args.body,
        min_answers: args.min_answers,
        accepted: args.accepted,
        min_views: args.min_views,
        url: args.url,
        user: args.user,
        closed: args.closed,
        wiki: args.wiki,
        migrated: args.migrated,
        notice: args.notice,
        from_date: args.from_date,
        to_date: args.to_date,
        ..SearchFilters::default()
    };
    if let Some(sort) = args.sort {
        filters.sort = sort.parse()?;
    }
    if let Some(order) = args.order {
        filters.order = order.parse()?;
    }
    if let Some(limit) = args.limit {
        filters.page_size = limit;
    }
    Ok(filters)
}

fn render(
    label: &'static str,
    results: Result<Vec<AggregateResult>, QueryError>,
    format: OutputFormat,
) -> Result<String, ToolError> {
    match results {
        Ok(results) => {
            info!(
                "Rendering {} result(s) as {}",
                results.len(),
                format.as_str()
            );
            Ok(format_response(&results, format))
        }
        Err(err) => {
            let err = ToolError::from_query(label, err);
            match &err {
                ToolError::Failed { source, .. } => {
                    warn!("{} (upstream status: {:?})", err, source.status())
                }
                ToolError::InvalidInput(_) => warn!("{}", err),
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{question, stub_with, tools_for};
    use super::*;
    use crate::output::NO_RESULTS;
    use stackgate_application::use_cases::test_support::StubGateway;

    #[tokio::test]
    async fn test_search_by_query_renders_markdown_by_default() {
        let (gateway, tools) = tools_for(stub_with(vec![question(1, 10)]));
        let output = tools
            .search_by_query(SearchByQueryArgs {
                query: "tokio runtime".into(),
                tags: Some(vec!["rust".into()]),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(output.starts_with("# Question 1"));
        assert!(output.contains("### ✓ Answer (Score: 1)"));
        let search = &gateway.searches()[0];
        assert_eq!(search.query.as_deref(), Some("tokio runtime"));
        assert_eq!(search.tagged, vec!["rust"]);
        assert_eq!(search.page_size, 5);
    }

    #[tokio::test]
    async fn test_json_format() {
        let (_, tools) = tools_for(stub_with(vec![question(1, 10)]));
        let output = tools
            .search_by_query(SearchByQueryArgs {
                query: "q".into(),
                response_format: Some("json".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["question"]["question_id"], 1);
        assert!(value[0]["comments"].is_null());
    }

    #[tokio::test]
    async fn test_min_score_filtering_everything_reports_no_results() {
        let low: Vec<_> = (1..=5).map(|id| question(id, 10)).collect();
        for format in ["markdown", "json"] {
            let (_, tools) = tools_for(stub_with(low.clone()));
            let output = tools
                .search_by_query(SearchByQueryArgs {
                    query: "q".into(),
                    min_score: Some(100),
                    response_format: Some(format.into()),
                    ..Default::default()
                })
                .await
                .unwrap();
            assert_eq!(output, NO_RESULTS);
        }
    }

    #[tokio::test]
    async fn test_invalid_input_makes_no_upstream_call() {
        let (gateway, tools) = tools_for(StubGateway::new());

        let err = tools
            .search_by_query(SearchByQueryArgs {
                query: "  ".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));

        let err = tools
            .search_by_query(SearchByQueryArgs {
                query: "ok".into(),
                response_format: Some("yaml".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("yaml"));

        let err = tools
            .get_question(GetQuestionArgs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));

        let err = tools
            .advanced_search(AdvancedSearchArgs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));

        let err = tools
            .advanced_search(AdvancedSearchArgs {
                query: Some("x".into()),
                sort: Some("hot".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));

        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_is_labeled() {
        let gateway = StubGateway::new().failing_all(FetchError::upstream(Some(500), "boom"));
        let (_, tools) = tools_for(gateway);
        let err = tools
            .search_by_error(SearchByErrorArgs {
                error_message: "TypeError".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to search Stack Overflow: Upstream request failed (500): boom"
        );
    }

    #[tokio::test]
    async fn test_missing_question_is_labeled() {
        let (_, tools) = tools_for(StubGateway::new());
        let err = tools
            .get_question(GetQuestionArgs {
                question_id: 7,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch Stack Overflow question: Question with ID 7 not found"
        );
    }

    #[tokio::test]
    async fn test_stack_trace_uses_first_line_and_language_tag() {
        let (gateway, tools) = tools_for(stub_with(vec![question(3, 0)]));
        tools
            .analyze_stack_trace(AnalyzeStackTraceArgs {
                stack_trace: "TypeError: x is undefined\n    at foo (a.js:1:1)".into(),
                language: "JavaScript".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let search = &gateway.searches()[0];
        assert_eq!(search.query.as_deref(), Some("TypeError: x is undefined"));
        assert_eq!(search.tagged, vec!["javascript"]);
        assert_eq!(search.min_score, Some(0));
        assert_eq!(search.page_size, 3);
    }

    #[tokio::test]
    async fn test_stack_trace_failure_is_labeled() {
        let gateway =
            StubGateway::new().failing_all(FetchError::RateLimitExhausted { attempts: 10 });
        let (_, tools) = tools_for(gateway);
        let err = tools
            .analyze_stack_trace(AnalyzeStackTraceArgs {
                stack_trace: "panic".into(),
                language: "rust".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Failed to analyze stack trace: "));
    }

    #[tokio::test]
    async fn test_advanced_search_maps_every_filter() {
        let (gateway, tools) = tools_for(stub_with(vec![question(1, 5)]));
        tools
            .advanced_search(AdvancedSearchArgs {
                title: Some("lifetime".into()),
                tags: Some(vec!["rust".into()]),
                not_tagged: Some(vec!["c++".into()]),
                accepted: Some(true),
                min_answers: Some(2),
                from_date: Some(100),
                to_date: Some(200),
                sort: Some("creation".into()),
                order: Some("asc".into()),
                limit: Some(20),
                ..Default::default()
            })
            .await
            .unwrap();

        let search = &gateway.searches()[0];
        assert_eq!(search.title.as_deref(), Some("lifetime"));
        assert_eq!(search.not_tagged, vec!["c++"]);
        assert_eq!(search.accepted, Some(true));
        assert_eq!(search.min_answers, Some(2));
        assert_eq!(search.sort, stackgate_domain::SortField::Creation);
        assert_eq!(search.order, stackgate_domain::SortOrder::Asc);
        assert_eq!(search.page_size, 20);
    }

    #[tokio::test]
    async fn test_default_format_override() {
        let (_, tools) = tools_for(stub_with(vec![question(1, 1)]));
        let tools = tools.with_default_format(OutputFormat::Json);
        let output = tools
            .search_by_query(SearchByQueryArgs {
                query: "q".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(output.trim_start().starts_with('['));
    }
}
