//! Answer entity

use super::PostId;
use serde::{Deserialize, Serialize};

/// An answer to a single question (Entity)
///
/// At most one answer per question is accepted; that is enforced by the remote
/// service, not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer_id: PostId,
    /// Identifier of the question this answer belongs to
    pub question_id: PostId,
    pub score: i64,
    pub is_accepted: bool,
    pub body: String,
    pub creation_date: i64,
    pub last_activity_date: Option<i64>,
    pub link: String,
    pub owner: Option<serde_json::Value>,
}
