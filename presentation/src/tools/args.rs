//! Tool argument schemas
//!
//! Shared by the MCP server (deserialized from tool calls, with JSON Schema
//! published to the host) and the CLI subcommands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchByQueryArgs {
    /// Free-text search query
    pub query: String,
    /// Only return questions carrying all of these tags (e.g. ["python", "pandas"])
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Minimum question score
    #[serde(default)]
    pub min_score: Option<i64>,
    /// Fetch comments for the question and every answer (default false)
    #[serde(default)]
    pub include_comments: Option<bool>,
    /// "markdown" (default) or "json"
    #[serde(default)]
    pub response_format: Option<String>,
    /// Maximum number of questions (default 5)
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchByErrorArgs {
    /// Error message to search for
    pub error_message: String,
    /// Programming language, used as a tag (e.g. "python")
    #[serde(default)]
    pub language: Option<String>,
    /// Related technologies, used as tags (e.g. ["react", "django"])
    #[serde(default)]
    pub technologies: Option<Vec<String>>,
    /// Minimum question score
    #[serde(default)]
    pub min_score: Option<i64>,
    /// Fetch comments for the question and every answer (default false)
    #[serde(default)]
    pub include_comments: Option<bool>,
    /// "markdown" (default) or "json"
    #[serde(default)]
    pub response_format: Option<String>,
    /// Maximum number of questions (default 5)
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GetQuestionArgs {
    /// Stack Overflow question ID
    pub question_id: u64,
    /// Fetch comments for the question and every answer (default true)
    #[serde(default)]
    pub include_comments: Option<bool>,
    /// "markdown" (default) or "json"
    #[serde(default)]
    pub response_format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeStackTraceArgs {
    /// Full stack trace; its first line is used as the search query
    pub stack_trace: String,
    /// Programming language of the trace, used as a tag
    pub language: String,
    /// Fetch comments for the question and every answer (default true)
    #[serde(default)]
    pub include_comments: Option<bool>,
    /// "markdown" (default) or "json"
    #[serde(default)]
    pub response_format: Option<String>,
    /// Maximum number of questions (default 3)
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Every filter of the upstream advanced search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AdvancedSearchArgs {
    /// Free-text query
    #[serde(default)]
    pub query: Option<String>,
    /// Required tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Excluded tags
    #[serde(default)]
    pub not_tagged: Option<Vec<String>>,
    /// Text that must appear in the title
    #[serde(default)]
    pub title: Option<String>,
    /// Text that must appear in the body
    #[serde(default)]
    pub body: Option<String>,
    /// URL contained in the question
    #[serde(default)]
    pub url: Option<String>,
    /// Minimum question score
    #[serde(default)]
    pub min_score: Option<i64>,
    /// Minimum number of answers
    #[serde(default)]
    pub min_answers: Option<u32>,
    /// Minimum number of views
    #[serde(default)]
    pub min_views: Option<u64>,
    /// Only questions with (true) or without (false) an accepted answer
    #[serde(default)]
    pub accepted: Option<bool>,
    /// Only closed (true) or open (false) questions
    #[serde(default)]
    pub closed: Option<bool>,
    /// Only community wiki (true) or regular (false) questions
    #[serde(default)]
    pub wiki: Option<bool>,
    /// Only migrated (true) or non-migrated (false) questions
    #[serde(default)]
    pub migrated: Option<bool>,
    /// Only questions with (true) or without (false) a post notice
    #[serde(default)]
    pub notice: Option<bool>,
    /// Owner user ID
    #[serde(default)]
    pub user: Option<u64>,
    /// Created at or after this Unix timestamp
    #[serde(default)]
    pub from_date: Option<i64>,
    /// Created at or before this Unix timestamp
    #[serde(default)]
    pub to_date: Option<i64>,
    /// "votes" (default), "activity", "creation" or "relevance"
    #[serde(default)]
    pub sort: Option<String>,
    /// "desc" (default) or "asc"
    #[serde(default)]
    pub order: Option<String>,
    /// Fetch comments for the question and every answer (default false)
    #[serde(default)]
    pub include_comments: Option<bool>,
    /// "markdown" (default) or "json"
    #[serde(default)]
    pub response_format: Option<String>,
    /// Maximum number of questions (default 5)
    #[serde(default)]
    pub limit: Option<u32>,
}
