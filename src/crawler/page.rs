//! Page model and crawl tree builder
//!
//! A [`Page`] is the result of fetching and parsing one URL. The
//! [`Crawler`] expands a root URL into a tree of pages with an explicit
//! breadth-first work queue, bounded by the configured depth and guarded by
//! a per-run visited set so cyclic link graphs cannot cause re-fetching.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use reqwest::Client;
use serde::Serialize;

use super::fetcher::{build_http_client, fetch_url, FetchOutcome};
use crate::config::WatchConfig;
use crate::parser::{parse_page, Tolerance};
use crate::url::{ensure_scheme, is_ignored, network_location};
use crate::{CrawlError, WatchError};

/// Result of fetching and parsing one URL
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Normalized URL, always carrying a scheme
    pub url: String,

    /// `host[:port]`, empty when the URL does not parse
    pub network_location: String,

    /// True iff the fetch succeeded and parsing had no fatal error
    pub valid: bool,

    /// Human-readable outcome message
    pub status: String,

    /// Structural anomalies tolerated during parsing
    pub problem_count: u32,

    /// First text inside `<title>` within the head
    pub title: Option<String>,

    /// Ordered non-blank text fragments from visible body elements
    pub content: Vec<String>,

    /// Link hops from the root; 0 for the root itself
    pub depth: u32,

    /// Sub-pages discovered by crawling, in link order
    pub children: Vec<Page>,
}

impl Page {
    /// Pre-order search for the first invalid page in the tree
    pub fn first_failing(&self) -> Option<&Page> {
        if !self.valid {
            return Some(self);
        }
        self.children.iter().find_map(Page::first_failing)
    }

    /// True when every page in the tree is valid
    pub fn all_valid(&self) -> bool {
        self.first_failing().is_none()
    }

    /// Number of pages in the tree, this one included
    pub fn page_count(&self) -> usize {
        1 + self.children.iter().map(Page::page_count).sum::<usize>()
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.depth {
            write!(f, "  ")?;
        }
        writeln!(f, "-> {} [{}]", self.url, self.status)?;
        for child in &self.children {
            child.fmt_node(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f)
    }
}

/// Depth-bounded breadth-first crawl tree builder
pub struct Crawler {
    client: Client,
    max_depth: u32,
    tolerance: Tolerance,
    ignore: Vec<String>,
}

struct QueueItem {
    url: String,
    depth: u32,
    parent: Option<usize>,
}

impl Crawler {
    pub fn new(config: &WatchConfig) -> Result<Self, WatchError> {
        let client = build_http_client(config.timeout_secs)?;
        Ok(Self {
            client,
            max_depth: config.max_depth,
            tolerance: config.tolerance,
            ignore: config.ignore.clone(),
        })
    }

    /// Builds the full crawl tree for a root URL
    ///
    /// The visited set lives for exactly one call, so the crawler is
    /// reentrant across repeated runs in the same process. URLs are marked
    /// visited when enqueued, before their fetch completes. A non-root page
    /// that fails to fetch or parse aborts the whole crawl.
    pub async fn crawl(&self, url: &str) -> Result<Page, CrawlError> {
        let root = ensure_scheme(url);
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(root.clone());

        let mut queue: VecDeque<QueueItem> = VecDeque::new();
        queue.push_back(QueueItem {
            url: root,
            depth: 0,
            parent: None,
        });

        let mut nodes: Vec<Page> = Vec::new();
        let mut child_indices: Vec<Vec<usize>> = Vec::new();

        while let Some(item) = queue.pop_front() {
            let follow_links = item.depth < self.max_depth;
            let (page, links) = self.build_page(&item.url, item.depth, follow_links).await;

            if !page.valid && item.depth > 0 {
                return Err(CrawlError::SubPageFailed {
                    url: page.url,
                    status: page.status,
                });
            }

            let index = nodes.len();
            if let Some(parent) = item.parent {
                child_indices[parent].push(index);
            }
            let expand = follow_links && page.valid;
            nodes.push(page);
            child_indices.push(Vec::new());

            if !expand {
                continue;
            }
            for link in links {
                let host = network_location(&link).unwrap_or_default();
                if is_ignored(&host, &self.ignore) {
                    tracing::debug!(url = %link, "skipping ignored host");
                    continue;
                }
                if visited.insert(link.clone()) {
                    queue.push_back(QueueItem {
                        url: link,
                        depth: item.depth + 1,
                        parent: Some(index),
                    });
                }
            }
        }

        Ok(assemble_tree(nodes, child_indices))
    }

    /// Fetches and parses the root URL alone, without following links
    pub async fn check(&self, url: &str) -> Page {
        let target = ensure_scheme(url);
        self.build_page(&target, 0, false).await.0
    }

    /// Fetches and parses one URL into a page plus its candidate links
    async fn build_page(&self, url: &str, depth: u32, follow_links: bool) -> (Page, Vec<String>) {
        let netloc = network_location(url).unwrap_or_default();
        let mut page = Page {
            url: url.to_string(),
            network_location: netloc.clone(),
            valid: false,
            status: String::new(),
            problem_count: 0,
            title: None,
            content: Vec::new(),
            depth,
            children: Vec::new(),
        };

        tracing::debug!(url = %page.url, depth, "fetching");
        match fetch_url(&self.client, &page.url).await {
            FetchOutcome::Success { body } => {
                page.status = "fetched, awaiting parse".to_string();
                match parse_page(&body, &netloc, self.tolerance, follow_links) {
                    Ok(parsed) => {
                        page.valid = true;
                        page.problem_count = parsed.problem_count;
                        page.title = parsed.title;
                        page.content = parsed.content;
                        page.status = if parsed.problem_count == 0 {
                            "parsed cleanly".to_string()
                        } else {
                            format!(
                                "parsed with {} structural problem(s)",
                                parsed.problem_count
                            )
                        };
                        return (page, parsed.links);
                    }
                    Err(error) => page.status = error.to_string(),
                }
            }
            FetchOutcome::BadStatus { code } => {
                page.status = format!("unexpected status code {}", code);
            }
            FetchOutcome::NotHtml { content_type } => {
                page.status = format!("not an HTML page (content type: {})", content_type);
            }
            FetchOutcome::Failed { error } => page.status = error,
        }
        (page, Vec::new())
    }
}

/// Folds the breadth-first arena into a nested tree
///
/// Children always carry a larger index than their parent, so walking the
/// arena backwards moves every completed subtree into place.
fn assemble_tree(nodes: Vec<Page>, child_indices: Vec<Vec<usize>>) -> Page {
    let mut slots: Vec<Option<Page>> = nodes.into_iter().map(Some).collect();
    for index in (0..slots.len()).rev() {
        let children: Vec<Page> = child_indices[index]
            .iter()
            .map(|&child| {
                slots[child]
                    .take()
                    .expect("crawl arena child taken twice")
            })
            .collect();
        slots[index]
            .as_mut()
            .expect("crawl arena parent missing")
            .children = children;
    }
    slots[0].take().expect("crawl arena has no root")
}
