//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod assemble_results;
pub mod query_knowledge;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
