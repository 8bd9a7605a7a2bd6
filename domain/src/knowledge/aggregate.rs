//! Aggregate result: one question with its answers and comments

use super::PostId;
use super::answer::Answer;
use super::comment::Comment;
use super::question::Question;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Comments attached to a question and to each of its answers (Value Object)
///
/// `answers` is keyed by answer id. Keys are exactly the ids of the answers held
/// by the owning [`AggregateResult`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentBundle {
    pub question: Vec<Comment>,
    pub answers: BTreeMap<PostId, Vec<Comment>>,
}

impl CommentBundle {
    pub fn new(question: Vec<Comment>, answers: BTreeMap<PostId, Vec<Comment>>) -> Self {
        Self { question, answers }
    }

    /// Comments for one answer, empty when the answer has none
    pub fn for_answer(&self, answer_id: PostId) -> &[Comment] {
        self.answers
            .get(&answer_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// A question bundled with its fetched answers and optional comments
///
/// The aggregate is the sole owner of its answers; nothing is shared between
/// aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub question: Question,
    pub answers: Vec<Answer>,
    pub comments: Option<CommentBundle>,
}

impl AggregateResult {
    pub fn new(question: Question, answers: Vec<Answer>, comments: Option<CommentBundle>) -> Self {
        Self {
            question,
            answers,
            comments,
        }
    }

    /// The accepted answer, if it was among the fetched answers
    pub fn accepted_answer(&self) -> Option<&Answer> {
        self.answers.iter().find(|a| a.is_accepted)
    }

    /// Check the parent/child invariants of the tree.
    ///
    /// Every answer points at this question, every question comment points at
    /// this question, and the bundle has one entry per answer (and no others)
    /// whose comments point at that answer.
    pub fn is_consistent(&self) -> bool {
        let id = self.question.question_id;
        if self.answers.iter().any(|a| a.question_id != id) {
            return false;
        }

        let Some(bundle) = &self.comments else {
            return true;
        };

        if bundle.question.iter().any(|c| c.post_id != id) {
            return false;
        }

        let answer_ok = |answer: &Answer| {
            let comments = bundle.answers.get(&answer.answer_id);
            comments.is_some_and(|cs| cs.iter().all(|c| c.post_id == answer.answer_id))
        };
        bundle.answers.len() == self.answers.len() && self.answers.iter().all(answer_ok)
    }
}
