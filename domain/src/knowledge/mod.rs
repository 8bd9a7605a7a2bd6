//! Q&A knowledge-base entities.
//!
//! Entities are built once from upstream records and then only read:
//!
//! - [`question::Question`]: a question post with its metadata
//! - [`answer::Answer`]: an answer to exactly one question
//! - [`comment::Comment`]: a comment on a question or an answer (a "post")
//! - [`aggregate::AggregateResult`]: a question bundled with its answers and
//!   optional [`aggregate::CommentBundle`]

pub mod aggregate;
pub mod answer;
pub mod comment;
pub mod question;

/// Identifier of a post (question or answer) as assigned by the remote service.
pub type PostId = u64;
