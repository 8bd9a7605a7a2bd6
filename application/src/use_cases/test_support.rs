//! Recording stub gateway for tests of this crate and the crates above it
//!
//! Enabled outside this crate with the `test-support` feature.

use crate::ports::knowledge_gateway::{FetchError, KnowledgeGateway};
use async_trait::async_trait;
use stackgate_domain::{Answer, Comment, PostId, Question, SearchFilters};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub fn question(id: PostId) -> Question {
    Question {
        question_id: id,
        title: format!("Question {}", id),
        score: id as i64,
        link: format!("https://stackoverflow.com/q/{}", id),
        ..Default::default()
    }
}

pub fn answer(id: PostId, question_id: PostId, accepted: bool) -> Answer {
    Answer {
        answer_id: id,
        question_id,
        is_accepted: accepted,
        ..Default::default()
    }
}

pub fn comment(id: PostId, post_id: PostId) -> Comment {
    Comment {
        comment_id: id,
        post_id,
        ..Default::default()
    }
}

/// Serves canned data and records every call as `"<kind>:<id>"`
#[derive(Default)]
pub struct StubGateway {
    search_results: Vec<Question>,
    questions: HashMap<PostId, Question>,
    answers: HashMap<PostId, Vec<Answer>>,
    comments: HashMap<PostId, Vec<Comment>>,
    failures: HashMap<String, FetchError>,
    failure: Option<FetchError>,
    calls: Mutex<Vec<String>>,
    searches: Mutex<Vec<SearchFilters>>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_results(mut self, questions: Vec<Question>) -> Self {
        self.search_results = questions;
        self
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.insert(question.question_id, question);
        self
    }

    pub fn with_answers(mut self, question_id: PostId, answers: Vec<Answer>) -> Self {
        self.answers.insert(question_id, answers);
        self
    }

    pub fn with_comments(mut self, post_id: PostId, comments: Vec<Comment>) -> Self {
        self.comments.insert(post_id, comments);
        self
    }

    pub fn failing_on(mut self, call: &str, error: FetchError) -> Self {
        self.failures.insert(call.to_string(), error);
        self
    }

    /// Fail every call not covered by [`StubGateway::failing_on`]
    pub fn failing_all(mut self, error: FetchError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn searches(&self) -> Vec<SearchFilters> {
        lock(&self.searches).clone()
    }

    fn record(&self, call: String) -> Result<(), FetchError> {
        lock(&self.calls).push(call.clone());
        match self.failures.get(&call).or(self.failure.as_ref()) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl KnowledgeGateway for StubGateway {
    async fn advanced_search(&self, filters: &SearchFilters) -> Result<Vec<Question>, FetchError> {
        lock(&self.searches).push(filters.clone());
        self.record("search".to_string())?;
        Ok(self
            .search_results
            .iter()
            .take(filters.effective_page_size() as usize)
            .filter(|q| q.meets_score(filters.min_score))
            .cloned()
            .collect())
    }

    async fn fetch_answers(&self, question_id: PostId) -> Result<Vec<Answer>, FetchError> {
        self.record(format!("answers:{}", question_id))?;
        Ok(self.answers.get(&question_id).cloned().unwrap_or_default())
    }

    async fn fetch_comments(&self, post_id: PostId) -> Result<Vec<Comment>, FetchError> {
        self.record(format!("comments:{}", post_id))?;
        Ok(self.comments.get(&post_id).cloned().unwrap_or_default())
    }

    async fn get_question(&self, question_id: PostId) -> Result<Question, FetchError> {
        self.record(format!("question:{}", question_id))?;
        self.questions
            .get(&question_id)
            .cloned()
            .ok_or(FetchError::NotFound(question_id))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
