//! Domain layer for stackgate
//!
//! This crate contains the entities and value objects of the Q&A knowledge
//! base. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Result tree
//!
//! A search produces questions; each question is expanded into an
//! [`AggregateResult`] holding its answers and, on request, a
//! [`CommentBundle`] with the comments of the question and of every answer.
//!
//! ## Search filters
//!
//! [`SearchFilters`] describes an advanced search. All filters except the
//! minimum score are evaluated by the remote service.

pub mod config;
pub mod core;
pub mod knowledge;
pub mod search;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::error::DomainError;
pub use knowledge::{
    PostId,
    aggregate::{AggregateResult, CommentBundle},
    answer::Answer,
    comment::Comment,
    question::Question,
};
pub use search::filters::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SearchFilters, SortField, SortOrder};
