//! Comment entity

use super::PostId;
use serde::{Deserialize, Serialize};

/// A comment on a post (Entity)
///
/// Only the numeric parent id is tracked; whether the parent is a question or
/// an answer is known from where the comment was fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: PostId,
    pub post_id: PostId,
    pub score: i64,
    pub body: String,
    pub creation_date: i64,
    pub owner: Option<serde_json::Value>,
}
