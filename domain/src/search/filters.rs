//! Advanced search filters

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of questions requested per search
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Largest page size the remote service accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// Field the remote service sorts search results by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Activity,
    #[default]
    Votes,
    Creation,
    Relevance,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Activity => "activity",
            SortField::Votes => "votes",
            SortField::Creation => "creation",
            SortField::Relevance => "relevance",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "activity" => Ok(SortField::Activity),
            "votes" => Ok(SortField::Votes),
            "creation" => Ok(SortField::Creation),
            "relevance" => Ok(SortField::Relevance),
            other => Err(DomainError::UnknownSortField(other.to_string())),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Desc,
    Asc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Desc => "desc",
            SortOrder::Asc => "asc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "desc" => Ok(SortOrder::Desc),
            "asc" => Ok(SortOrder::Asc),
            other => Err(DomainError::UnknownSortOrder(other.to_string())),
        }
    }
}

/// Filters for an advanced question search (Value Object)
///
/// Everything except `min_score` is sent upstream. `min_score` is applied
/// locally after the page comes back, so `page_size` bounds the upstream fetch
/// and callers may receive fewer results than requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Free-text query
    pub query: Option<String>,
    /// Questions must carry all of these tags
    pub tagged: Vec<String>,
    /// Questions must carry none of these tags
    pub not_tagged: Vec<String>,
    /// Local score threshold (inclusive)
    pub min_score: Option<i64>,
    pub title: Option<String>,
    pub body: Option<String>,
    /// Minimum number of answers
    pub min_answers: Option<u32>,
    pub accepted: Option<bool>,
    /// Minimum view count
    pub min_views: Option<u64>,
    pub url: Option<String>,
    /// Owning user id
    pub user: Option<u64>,
    pub closed: Option<bool>,
    pub wiki: Option<bool>,
    pub migrated: Option<bool>,
    pub notice: Option<bool>,
    /// Creation date lower bound, seconds since the epoch
    pub from_date: Option<i64>,
    /// Creation date upper bound, seconds since the epoch
    pub to_date: Option<i64>,
    pub sort: SortField,
    pub order: SortOrder,
    pub page_size: u32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            query: None,
            tagged: Vec::new(),
            not_tagged: Vec::new(),
            min_score: None,
            title: None,
            body: None,
            min_answers: None,
            accepted: None,
            min_views: None,
            url: None,
            user: None,
            closed: None,
            wiki: None,
            migrated: None,
            notice: None,
            from_date: None,
            to_date: None,
            sort: SortField::default(),
            order: SortOrder::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchFilters {
    /// Filters for a free-text query with default sorting and page size
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tagged.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_min_score(mut self, min_score: Option<i64>) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_sort(mut self, sort: SortField) -> Self {
        self.sort = sort;
        self
    }

    /// Page size clamped to what the remote service accepts
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Check that the filters describe a meaningful search.
    pub fn validate(&self) -> Result<(), DomainError> {
        let has_text = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        let has_criteria = has_text(&self.query)
            || has_text(&self.title)
            || has_text(&self.body)
            || has_text(&self.url)
            || self.tagged.iter().any(|t| !t.trim().is_empty());
        if !has_criteria {
            return Err(DomainError::EmptySearch);
        }

        if let (Some(from), Some(to)) = (self.from_date, self.to_date) {
            if from > to {
                return Err(DomainError::InvalidDateRange { from, to });
            }
        }

        Ok(())
    }
}
