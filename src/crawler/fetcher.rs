//! HTTP fetcher
//!
//! One GET per page, redirects followed, bounded by the configured timeout.
//! A fetch never returns an error: every way it can go wrong is a
//! [`FetchOutcome`] variant that the caller turns into a page status.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of a single fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// Status 200 with an HTML content type
    Success { body: String },

    /// Reachable, but the status code was not 200
    BadStatus { code: u16 },

    /// Reachable, but the content type is not `text/html`
    NotHtml { content_type: String },

    /// Network-level failure (timeout, DNS, connection refused)
    Failed { error: String },
}

/// Builds the HTTP client shared by all fetches of one watcher
pub fn build_http_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en"));

    Client::builder()
        .user_agent(concat!("pagewatch/", env!("CARGO_PKG_VERSION")))
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and validates status and content type
///
/// Success requires HTTP 200 and a content type starting with `text/html`.
pub async fn fetch_url(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(error) => {
            return FetchOutcome::Failed {
                error: describe_error(&error),
            }
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        return FetchOutcome::BadStatus {
            code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !content_type.starts_with("text/html") {
        return FetchOutcome::NotHtml { content_type };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Success { body },
        Err(error) => FetchOutcome::Failed {
            error: describe_error(&error),
        },
    }
}

/// Classifies a reqwest error into a short status message
fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    }
}
