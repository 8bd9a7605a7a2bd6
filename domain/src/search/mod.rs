//! Search filter value objects.

pub mod filters;
