//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    #[error("Search requires at least one of: query, tags, title, body or url")]
    EmptySearch,

    #[error("Invalid question id: {0}")]
    InvalidQuestionId(u64),

    #[error("Unknown response format '{0}' (expected \"json\" or \"markdown\")")]
    UnknownOutputFormat(String),

    #[error("Invalid sort field '{0}' (expected activity, votes, creation or relevance)")]
    UnknownSortField(String),

    #[error("Invalid sort order '{0}' (expected asc or desc)")]
    UnknownSortOrder(String),

    #[error("Invalid date range: from {from} is after to {to}")]
    InvalidDateRange { from: i64, to: i64 },
}
