//! Query-string construction for Stack Exchange endpoints

use stackgate_domain::SearchFilters;

/// Response filter for questions and answers (includes bodies)
pub const POST_FILTER: &str = "!*MZqiDl8Y0c)yVzXS";

/// Response filter for comments (includes bodies)
pub const COMMENT_FILTER: &str = "!*Mg-gxeRLu";

pub type QueryParams = Vec<(&'static str, String)>;

/// Parameters for `/search/advanced`.
///
/// `min_score` has no upstream counterpart and is never sent.
pub fn search_params(filters: &SearchFilters) -> QueryParams {
    let mut params: QueryParams = vec![
        ("sort", filters.sort.as_str().to_string()),
        ("order", filters.order.as_str().to_string()),
        ("filter", POST_FILTER.to_string()),
        ("pagesize", filters.effective_page_size().to_string()),
    ];

    push_text(&mut params, "q", &filters.query);
    push_tags(&mut params, "tagged", &filters.tagged);
    push_tags(&mut params, "nottagged", &filters.not_tagged);
    push_text(&mut params, "title", &filters.title);
    push_text(&mut params, "body", &filters.body);
    push_text(&mut params, "url", &filters.url);
    push(&mut params, "answers", filters.min_answers);
    push(&mut params, "accepted", filters.accepted);
    push(&mut params, "views", filters.min_views);
    push(&mut params, "user", filters.user);
    push(&mut params, "closed", filters.closed);
    push(&mut params, "wiki", filters.wiki);
    push(&mut params, "migrated", filters.migrated);
    push(&mut params, "notice", filters.notice);
    push(&mut params, "fromdate", filters.from_date);
    push(&mut params, "todate", filters.to_date);

    params
}

/// Parameters for answer and comment listings, highest voted first
pub fn listing_params(filter: &'static str) -> QueryParams {
    vec![
        ("sort", "votes".to_string()),
        ("order", "desc".to_string()),
        ("filter", filter.to_string()),
    ]
}

/// Parameters for a direct question lookup
pub fn question_params() -> QueryParams {
    vec![("filter", POST_FILTER.to_string())]
}

fn push<T: ToString>(params: &mut QueryParams, key: &'static str, value: Option<T>) {
    if let Some(value) = value {
        params.push((key, value.to_string()));
    }
}

fn push_text(params: &mut QueryParams, key: &'static str, value: &Option<String>) {
    if let Some(text) = value.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        params.push((key, text.to_string()));
    }
}

fn push_tags(params: &mut QueryParams, key: &'static str, tags: &[String]) {
    let joined = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(";");
    if !joined.is_empty() {
        params.push((key, joined));
    }
}
