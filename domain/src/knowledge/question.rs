//! Question entity

use super::PostId;
use serde::{Deserialize, Serialize};

/// A question post fetched from the knowledge base (Entity)
///
/// The identifier is assigned by the remote service and never changes once
/// fetched. `owner` is kept as opaque structured data because its shape varies
/// between response filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: PostId,
    pub title: String,
    /// Raw HTML body as returned upstream
    pub body: String,
    pub score: i64,
    pub answer_count: u64,
    pub is_answered: bool,
    pub accepted_answer_id: Option<PostId>,
    /// Seconds since the Unix epoch
    pub creation_date: i64,
    pub last_activity_date: Option<i64>,
    pub view_count: Option<u64>,
    pub tags: Vec<String>,
    pub link: String,
    pub is_closed: Option<bool>,
    pub owner: Option<serde_json::Value>,
}

impl Question {
    /// Whether the question has an accepted answer
    pub fn has_accepted_answer(&self) -> bool {
        self.accepted_answer_id.is_some()
    }

    /// Whether the question scores at least `min_score`
    pub fn meets_score(&self, min_score: Option<i64>) -> bool {
        min_score.is_none_or(|min| self.score >= min)
    }
}
