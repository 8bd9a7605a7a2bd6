//! Stack Exchange API adapter
//!
//! Implements the [`KnowledgeGateway`](stackgate_application::KnowledgeGateway)
//! port over the public `api.stackexchange.com` REST API.

mod client;
mod http;
pub mod params;
pub mod records;

pub use client::{
    ClientSettings, DEFAULT_BASE_URL, DEFAULT_SITE, DEFAULT_TIMEOUT, StackExchangeClient,
};
