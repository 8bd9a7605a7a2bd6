//! Upstream record → entity conversion
//!
//! Each converter is total: a missing field, or a field of the wrong type,
//! takes its default instead of failing. Strings default to empty, integers
//! to 0, booleans to false, optional values to `None`.

use serde_json::Value;
use stackgate_domain::{Answer, Comment, Question};

/// The `items` array of a response wrapper, empty when absent
pub fn items(body: &Value) -> &[Value] {
    body.get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

pub fn question_from_record(record: &Value) -> Question {
    Question {
        question_id: uint(record, "question_id"),
        title: string(record, "title"),
        body: string(record, "body"),
        score: int(record, "score"),
        answer_count: uint(record, "answer_count"),
        is_answered: boolean(record, "is_answered"),
        accepted_answer_id: opt_uint(record, "accepted_answer_id"),
        creation_date: int(record, "creation_date"),
        last_activity_date: opt_int(record, "last_activity_date"),
        view_count: opt_uint(record, "view_count"),
        tags: string_list(record, "tags"),
        link: string(record, "link"),
        is_closed: closed_flag(record),
        owner: object(record, "owner"),
    }
}

pub fn answer_from_record(record: &Value) -> Answer {
    Answer {
        answer_id: uint(record, "answer_id"),
        question_id: uint(record, "question_id"),
        score: int(record, "score"),
        is_accepted: boolean(record, "is_accepted"),
        body: string(record, "body"),
        creation_date: int(record, "creation_date"),
        last_activity_date: opt_int(record, "last_activity_date"),
        link: string(record, "link"),
        owner: object(record, "owner"),
    }
}

pub fn comment_from_record(record: &Value) -> Comment {
    Comment {
        comment_id: uint(record, "comment_id"),
        post_id: uint(record, "post_id"),
        score: int(record, "score"),
        body: string(record, "body"),
        creation_date: int(record, "creation_date"),
        owner: object(record, "owner"),
    }
}

fn string(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn opt_int(record: &Value, key: &str) -> Option<i64> {
    let value = record.get(key)?;
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

fn int(record: &Value, key: &str) -> i64 {
    opt_int(record, key).unwrap_or_default()
}

fn opt_uint(record: &Value, key: &str) -> Option<u64> {
    opt_int(record, key).and_then(|v| u64::try_from(v).ok())
}

fn uint(record: &Value, key: &str) -> u64 {
    opt_uint(record, key).unwrap_or_default()
}

fn boolean(record: &Value, key: &str) -> bool {
    record.get(key).and_then(Value::as_bool).unwrap_or_default()
}

fn string_list(record: &Value, key: &str) -> Vec<String> {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn object(record: &Value, key: &str) -> Option<Value> {
    record.get(key).filter(|v| v.is_object()).cloned()
}

/// Closed questions carry `closed_date` or `closed_reason`; open ones carry neither
fn closed_flag(record: &Value) -> Option<bool> {
    let present = |key: &str| record.get(key).is_some_and(|v| !v.is_null());
    (present("closed_date") || present("closed_reason")).then_some(true)
}
