//! Stack Exchange API client

use super::http::{check_response, transport_error};
use super::params::{self, COMMENT_FILTER, POST_FILTER, QueryParams};
use super::records::{answer_from_record, comment_from_record, items, question_from_record};
use crate::throttle::RetryingExecutor;
use async_trait::async_trait;
use serde_json::Value;
use stackgate_application::{FetchError, KnowledgeGateway};
use stackgate_domain::{Answer, Comment, PostId, Question, SearchFilters};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Public Stack Exchange API root
pub const DEFAULT_BASE_URL: &str = "https://api.stackexchange.com/2.3";

/// Site queried when none is configured
pub const DEFAULT_SITE: &str = "stackoverflow";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("stackgate/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`StackExchangeClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub site: String,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            site: DEFAULT_SITE.to_string(),
            api_key: None,
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP client for the Stack Exchange API
///
/// Every request goes through the [`RetryingExecutor`], and therefore through
/// the rate limiter it shares with all other clients in the process.
pub struct StackExchangeClient {
    http: reqwest::Client,
    executor: RetryingExecutor,
    settings: ClientSettings,
}

impl StackExchangeClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns the underlying error if the HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialize).
    pub fn new(
        settings: ClientSettings,
        executor: RetryingExecutor,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()?;
        info!(
            "Stack Exchange client initialized (site={}, key={}, token={})",
            settings.site,
            settings.api_key.is_some(),
            settings.access_token.is_some()
        );
        Ok(Self {
            http,
            executor,
            settings,
        })
    }

    /// GET `path` with the common parameters and return the decoded body
    async fn fetch_page(&self, path: &str, mut query: QueryParams) -> Result<Value, FetchError> {
        query.push(("site", self.settings.site.clone()));
        if let Some(key) = &self.settings.api_key {
            query.push(("key", key.clone()));
        }
        if let Some(token) = &self.settings.access_token {
            query.push(("access_token", token.clone()));
        }

        let url = format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path);
        let url = url.as_str();
        let query = query.as_slice();
        debug!("GET {}", url);

        self.executor.execute(move || self.send(url, query)).await
    }

    /// One upstream round trip, no retries
    async fn send(&self, url: &str, query: &[(&'static str, String)]) -> Result<Value, FetchError> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;
        let resp = check_response(resp).await?;
        let body: Value = resp.json().await.map_err(transport_error)?;

        if let Some(remaining) = body.get("quota_remaining").and_then(Value::as_u64) {
            debug!("Upstream quota remaining: {}", remaining);
        }
        if let Some(backoff) = body.get("backoff").and_then(Value::as_u64) {
            warn!("Upstream asked for a {}s backoff ({})", backoff, url);
        }
        Ok(body)
    }
}

#[async_trait]
impl KnowledgeGateway for StackExchangeClient {
    async fn advanced_search(&self, filters: &SearchFilters) -> Result<Vec<Question>, FetchError> {
        let body = self
            .fetch_page("search/advanced", params::search_params(filters))
            .await?;
        let records = items(&body);
        let fetched = records.len();

        let questions: Vec<Question> = records
            .iter()
            .map(question_from_record)
            .filter(|q| q.meets_score(filters.min_score))
            .collect();

        if questions.len() < fetched {
            debug!(
                "min_score {:?} dropped {} of {} questions",
                filters.min_score,
                fetched - questions.len(),
                fetched
            );
        }
        Ok(questions)
    }

    async fn fetch_answers(&self, question_id: PostId) -> Result<Vec<Answer>, FetchError> {
        let path = format!("questions/{}/answers", question_id);
        let body = self
            .fetch_page(&path, params::listing_params(POST_FILTER))
            .await?;
        Ok(items(&body).iter().map(answer_from_record).collect())
    }

    async fn fetch_comments(&self, post_id: PostId) -> Result<Vec<Comment>, FetchError> {
        let path = format!("posts/{}/comments", post_id);
        let body = self
            .fetch_page(&path, params::listing_params(COMMENT_FILTER))
            .await?;
        Ok(items(&body).iter().map(comment_from_record).collect())
    }

    async fn get_question(&self, question_id: PostId) -> Result<Question, FetchError> {
        let path = format!("questions/{}", question_id);
        let body = self.fetch_page(&path, params::question_params()).await?;
        items(&body)
            .first()
            .map(question_from_record)
            .ok_or(FetchError::NotFound(question_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::throttle::{RateLimiter, RetryPolicy};
    use mockito::Matcher;
    use std::sync::Arc;

    fn client(base_url: &str) -> StackExchangeClient {
        let executor = RetryingExecutor::new(
            Arc::new(RateLimiter::default()),
            RetryPolicy {
                backoff: Duration::from_millis(1),
                ..RetryPolicy::default()
            },
        );
        let settings = ClientSettings {
            base_url: base_url.to_string(),
            api_key: Some("k".to_string()),
            ..ClientSettings::default()
        };
        StackExchangeClient::new(settings, executor).unwrap()
    }

    #[test]
    fn test_default_settings() {
        let settings = ClientSettings::default();
        assert_eq!(settings.base_url, "https://api.stackexchange.com/2.3");
        assert_eq!(settings.site, "stackoverflow");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(settings.api_key.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_upstream_failure() {
        // Port 9 (discard) on localhost refuses connections
        let client = client("http://127.0.0.1:9");
        let err = client.fetch_answers(1).await.unwrap_err();
        assert!(matches!(err, FetchError::Upstream { status: None, .. }));
        assert_eq!(client.executor.limiter().in_flight(), 1);
    }

    fn page(items: serde_json::Value) -> String {
        serde_json::json!({ "items": items, "quota_remaining": 9000 }).to_string()
    }

    #[tokio::test]
    async fn test_get_question_sends_common_params() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/questions/42")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("site".into(), "stackoverflow".into()),
                Matcher::UrlEncoded("key".into(), "k".into()),
                Matcher::UrlEncoded("filter".into(), POST_FILTER.into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(page(serde_json::json!([{ "question_id": 42, "title": "Why?" }])))
            .expect(1)
            .create_async()
            .await;

        let question = client(&server.url()).get_question(42).await.unwrap();
        assert_eq!(question.question_id, 42);
        assert_eq!(question.title, "Why?");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_question_without_items_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/questions/404")
            .match_query(Matcher::Any)
            .with_body(page(serde_json::json!([])))
            .create_async()
            .await;

        let err = client(&server.url()).get_question(404).await.unwrap_err();
        assert_eq!(err, FetchError::NotFound(404));
    }

    #[tokio::test]
    async fn test_search_applies_min_score_locally() {
        let mut server = mockito::Server::new_async().await;
        let records: Vec<_> = (1..=5)
            .map(|id| serde_json::json!({ "question_id": id, "score": id * 10 }))
            .collect();
        server
            .mock("GET", "/search/advanced")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "null pointer".into()),
                Matcher::UrlEncoded("tagged".into(), "java;spring".into()),
                Matcher::UrlEncoded("pagesize".into(), "5".into()),
            ]))
            .with_body(page(serde_json::Value::Array(records)))
            .create_async()
            .await;

        let client = client(&server.url());
        let filters = SearchFilters::query("null pointer").with_tags(["java", "spring"]);

        let all = client.advanced_search(&filters).await.unwrap();
        assert_eq!(all.len(), 5);

        let filtered = client
            .advanced_search(&filters.clone().with_min_score(Some(30)))
            .await
            .unwrap();
        assert_eq!(
            filtered.iter().map(|q| q.question_id).collect::<Vec<_>>(),
            vec![3, 4, 5]
        );

        let none = client
            .advanced_search(&filters.with_min_score(Some(100)))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_persistent_throttling_is_retried_then_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/posts/7/comments")
            .match_query(Matcher::Any)
            .with_status(429)
            .expect(4)
            .create_async()
            .await;

        let err = client(&server.url()).fetch_comments(7).await.unwrap_err();
        assert!(err.is_throttled());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/questions/9/answers")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"error_id":500,"error_name":"internal_error","error_message":"oops"}"#)
            .expect(1)
            .create_async()
            .await;

        let err = client(&server.url()).fetch_answers(9).await.unwrap_err();
        assert_eq!(err, FetchError::upstream(Some(500), "internal_error: oops"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_answers_and_comments_are_mapped() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/questions/1/answers")
            .match_query(Matcher::UrlEncoded("sort".into(), "votes".into()))
            .with_body(page(serde_json::json!([
                { "answer_id": 10, "question_id": 1, "is_accepted": true, "score": 5 },
                { "answer_id": 11, "question_id": 1, "score": "bad" }
            ])))
            .create_async()
            .await;
        server
            .mock("GET", "/posts/10/comments")
            .match_query(Matcher::UrlEncoded("filter".into(), COMMENT_FILTER.into()))
            .with_body(page(serde_json::json!([{ "comment_id": 100, "post_id": 10 }])))
            .create_async()
            .await;

        let client = client(&server.url());
        let answers = client.fetch_answers(1).await.unwrap();
        assert_eq!(answers.len(), 2);
        assert!(answers[0].is_accepted);
        assert_eq!(answers[1].score, 0);

        let comments = client.fetch_comments(10).await.unwrap();
        assert_eq!(comments[0].post_id, 10);
    }

    #[tokio::test]
    #[ignore] // requires network
    async fn live_search() {
        let client = client(DEFAULT_BASE_URL);
        let filters = SearchFilters::query("borrowed value does not live long enough")
            .with_tags(["rust"])
            .with_page_size(2);
        let questions = client.advanced_search(&filters).await.unwrap();
        for q in &questions {
            println!("[{}] {} ({})", q.score, q.title, q.link);
        }
    }

    #[tokio::test]
    #[ignore] // requires network
    async fn live_get_question_with_answers() {
        let client = client(DEFAULT_BASE_URL);
        let question = client.get_question(11227809).await.unwrap();
        assert_eq!(question.question_id, 11227809);
        let id = question.question_id;
        let answers = client.fetch_answers(id).await.unwrap();
        assert!(answers.iter().all(|a| a.question_id == id));
    }
}
