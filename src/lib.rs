//! Pagewatch: a web page change watcher
//!
//! This crate watches one or more web pages for content changes and notifies
//! the operator when a change is detected. It combines a tolerant structural
//! HTML parser, a depth-limited link-following crawler, and a snapshot differ
//! that locates the first semantic difference between two captures of the
//! same page.

pub mod config;
pub mod crawler;
pub mod diff;
pub mod parser;
pub mod url;
pub mod watch;

use thiserror::Error;

/// Main error type for pagewatch operations
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("crawl aborted: {0}")]
    Crawl(#[from] CrawlError),

    #[error("unable to reach/read {url}: {status}")]
    RootUnreachable { url: String, status: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Fatal structural violations raised while parsing a document
///
/// These only surface when the configured tolerance forbids the anomaly;
/// otherwise the anomaly is counted on the page and parsing continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("misplaced <{tag}> section at line {line}")]
    MisplacedSection { tag: String, line: u64 },

    #[error("mismatched closing tag </{tag}> at line {line}")]
    MismatchedClose { tag: String, line: u64 },
}

/// Errors that abort an initial crawl
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("sub-page {url} failed: {status}")]
    SubPageFailed { url: String, status: String },
}

/// Result type alias for pagewatch operations
pub type Result<T> = std::result::Result<T, WatchError>;

// Re-export commonly used types
pub use config::WatchConfig;
pub use crawler::{Crawler, Page};
pub use diff::{first_difference, pages_match, PageDiff};
pub use parser::{parse_page, ParsedPage, Tolerance};
pub use watch::{WatchOutcome, Watcher};
