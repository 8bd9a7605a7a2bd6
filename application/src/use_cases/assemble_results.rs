//! Assemble results use case
//!
//! Expands matched questions into full result trees by fetching each
//! question's answers and, on request, the comments of the question and of
//! every answer.

use crate::ports::knowledge_gateway::{FetchError, KnowledgeGateway};
use stackgate_domain::{AggregateResult, Answer, CommentBundle, Question};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Fans out from questions to their answers and comments
///
/// Fetches run strictly one after another: answers, then question comments,
/// then each answer's comments in answer order. That keeps at most one upstream
/// request in flight per invocation and makes the admission order of the shared
/// rate limiter deterministic.
pub struct ResultAssembler {
    gateway: Arc<dyn KnowledgeGateway>,
}

impl ResultAssembler {
    pub fn new(gateway: Arc<dyn KnowledgeGateway>) -> Self {
        Self { gateway }
    }

    /// Build one [`AggregateResult`] per question, preserving input order.
    ///
    /// The first failing fetch aborts the whole batch; no partial results are
    /// returned.
    pub async fn assemble(
        &self,
        questions: Vec<Question>,
        include_comments: bool,
    ) -> Result<Vec<AggregateResult>, FetchError> {
        let mut results = Vec::with_capacity(questions.len());
        for question in questions {
            results.push(self.assemble_one(question, include_comments).await?);
        }
        Ok(results)
    }

    /// Expand a single question
    pub async fn assemble_one(
        &self,
        question: Question,
        include_comments: bool,
    ) -> Result<AggregateResult, FetchError> {
        let answers = self.gateway.fetch_answers(question.question_id).await?;
        debug!(
            "Question {} has {} answers (accepted: {})",
            question.question_id,
            answers.len(),
            question.has_accepted_answer()
        );

        let comments = if include_comments {
            Some(self.fetch_bundle(&question, &answers).await?)
        } else {
            None
        };

        Ok(AggregateResult::new(question, answers, comments))
    }

    /// Fetch all comments for a question and its answers.
    ///
    /// The bundle is only built once every per-answer fetch has completed.
    async fn fetch_bundle(
        &self,
        question: &Question,
        answers: &[Answer],
    ) -> Result<CommentBundle, FetchError> {
        let question_comments = self.gateway.fetch_comments(question.question_id).await?;

        let mut answer_comments = BTreeMap::new();
        for answer in answers {
            let comments = self.gateway.fetch_comments(answer.answer_id).await?;
            answer_comments.insert(answer.answer_id, comments);
        }

        Ok(CommentBundle::new(question_comments, answer_comments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{StubGateway, answer, comment, question};

    #[tokio::test]
    async fn test_preserves_order_without_comments() {
        let gateway = Arc::new(
            StubGateway::new()
                .with_answers(1, vec![answer(11, 1, false)])
                .with_answers(3, vec![answer(31, 3, true), answer(32, 3, false)]),
        );
        let assembler = ResultAssembler::new(gateway.clone());

        let results = assembler
            .assemble(vec![question(1), question(2), question(3)], false)
            .await
            .unwrap();

        let ids: Vec<_> = results.iter().map(|r| r.question.question_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(results.iter().all(|r| r.comments.is_none()));
        assert_eq!(results[2].answers.len(), 2);
        assert!(results[1].answers.is_empty());
        assert_eq!(
            gateway.calls(),
            vec!["answers:1", "answers:2", "answers:3"]
        );
    }

    #[tokio::test]
    async fn test_builds_comment_bundle_for_every_answer() {
        let gateway = Arc::new(
            StubGateway::new()
                .with_answers(1, vec![answer(10, 1, true), answer(20, 1, false)])
                .with_comments(1, vec![comment(100, 1)])
                .with_comments(20, vec![comment(200, 20), comment(201, 20)]),
        );
        let assembler = ResultAssembler::new(gateway.clone());

        let results = assembler.assemble(vec![question(1)], true).await.unwrap();
        assert_eq!(results.len(), 1);

        let bundle = results[0].comments.as_ref().unwrap();
        assert_eq!(bundle.question.len(), 1);
        assert_eq!(bundle.answers.len(), 2);
        let keys: Vec<_> = bundle.answers.keys().copied().collect();
        assert_eq!(keys, vec![10, 20]);
        assert_eq!(bundle.answers[&10].len(), 0);
        assert_eq!(bundle.answers[&20].len(), 2);
        assert!(results[0].is_consistent());

        assert_eq!(
            gateway.calls(),
            vec!["answers:1", "comments:1", "comments:10", "comments:20"]
        );
    }

    #[tokio::test]
    async fn test_failure_aborts_whole_batch() {
        let gateway = Arc::new(
            StubGateway::new()
                .with_answers(1, vec![answer(10, 1, false)])
                .with_answers(2, vec![answer(20, 2, false)])
                .failing_on("comments:20", FetchError::upstream(Some(500), "boom")),
        );
        let assembler = ResultAssembler::new(gateway.clone());

        let err = assembler
            .assemble(vec![question(1), question(2), question(3)], true)
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::upstream(Some(500), "boom"));
        // Question 3 is never touched once question 2 fails
        assert!(!gateway.calls().iter().any(|c| c.ends_with(":3")));
    }

    #[tokio::test]
    async fn test_answer_fetch_failure_propagates() {
        let gateway = Arc::new(
            StubGateway::new()
                .failing_on("answers:1", FetchError::RateLimitExhausted { attempts: 10 }),
        );
        let assembler = ResultAssembler::new(gateway);

        let err = assembler
            .assemble(vec![question(1)], false)
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::RateLimitExhausted { attempts: 10 });
    }

    #[tokio::test]
    async fn test_empty_input() {
        let gateway = Arc::new(StubGateway::new());
        let assembler = ResultAssembler::new(gateway.clone());

        let results = assembler.assemble(vec![], true).await.unwrap();
        assert!(results.is_empty());
        assert!(gateway.calls().is_empty());
    }
}
