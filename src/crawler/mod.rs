//! Crawler module for page fetching and crawl tree building
//!
//! This module contains:
//! - HTTP fetching with status and content-type validation
//! - the [`Page`] data model with its tree-query operations
//! - the depth-bounded, cycle-safe crawl tree builder

mod fetcher;
mod page;

pub use fetcher::{build_http_client, fetch_url, FetchOutcome};
pub use page::{Crawler, Page};
