//! Knowledge gateway port
//!
//! Defines the interface for fetching questions, answers and comments from the
//! remote Q&A service.

use async_trait::async_trait;
use stackgate_domain::{Answer, Comment, PostId, Question, SearchFilters};
use thiserror::Error;

/// HTTP status the remote service uses to signal throttling
pub const THROTTLED_STATUS: u16 = 429;

/// Errors that can occur while fetching from the knowledge base
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The remote service failed, or kept throttling past the retry budget.
    ///
    /// `status` is absent for transport and decoding failures.
    #[error("Upstream request failed{}: {message}", status_suffix(.status))]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// The local request budget never freed up within the allowed waits
    #[error("Local rate limit exhausted after {attempts} wait attempts")]
    RateLimitExhausted { attempts: u32 },

    /// A direct question lookup returned no items
    #[error("Question with ID {0} not found")]
    NotFound(PostId),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

impl FetchError {
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        FetchError::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Upstream throttling (HTTP 429)
    pub fn throttled(message: impl Into<String>) -> Self {
        Self::upstream(Some(THROTTLED_STATUS), message)
    }

    /// Whether this is an upstream throttling response that may be retried
    pub fn is_throttled(&self) -> bool {
        self.status() == Some(THROTTLED_STATUS)
    }

    /// HTTP status attached to an upstream failure
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}

/// Gateway to the remote knowledge base
///
/// Implementations (adapters) live in the infrastructure layer. Every call is
/// independent; implementations hold no per-call state between calls.
#[async_trait]
pub trait KnowledgeGateway: Send + Sync {
    /// Search questions, sorted and paginated upstream.
    ///
    /// `filters.min_score` is applied to the fetched page, so fewer than
    /// `filters.page_size` questions may come back.
    async fn advanced_search(&self, filters: &SearchFilters) -> Result<Vec<Question>, FetchError>;

    /// Answers for one question, highest voted first
    async fn fetch_answers(&self, question_id: PostId) -> Result<Vec<Answer>, FetchError>;

    /// Comments on one post (question or answer), highest voted first
    async fn fetch_comments(&self, post_id: PostId) -> Result<Vec<Comment>, FetchError>;

    /// A single question by id, failing with [`FetchError::NotFound`] when absent
    async fn get_question(&self, question_id: PostId) -> Result<Question, FetchError>;
}
