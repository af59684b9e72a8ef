//! Snapshot differ
//!
//! Given two captures of the same page, locates the first point of
//! divergence: the title, a changed content line, or a line present in only
//! one of the captures. Callers must only ask for a difference when the
//! snapshots are actually unequal; comparing snapshots of different URLs is
//! a programming error.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::crawler::Page;

/// First point of divergence between two snapshots of one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PageDiff {
    TitleChanged {
        old: Option<String>,
        new: Option<String>,
    },
    LineChanged {
        index: usize,
        old: String,
        new: String,
    },
    LineAdded {
        line: String,
    },
    LineRemoved {
        line: String,
    },
}

impl fmt::Display for PageDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TitleChanged { old, new } => write!(
                f,
                "title changed from \"{}\" to \"{}\"",
                title_text(old),
                title_text(new)
            ),
            Self::LineChanged { index, old, new } => write!(
                f,
                "line {} changed from \"{}\" to \"{}\"",
                index + 1,
                old,
                new
            ),
            Self::LineAdded { line } => write!(f, "a line was added: \"{}\"", line),
            Self::LineRemoved { line } => write!(f, "a line was removed: \"{}\"", line),
        }
    }
}

fn title_text(title: &Option<String>) -> &str {
    title.as_deref().unwrap_or("(no title)")
}

/// Whether two snapshots of the same URL are equal
///
/// Equality is equal titles and equal content sequences. Snapshots of
/// different URLs must never be compared.
pub fn pages_match(old: &Page, new: &Page) -> bool {
    assert_eq!(
        old.url, new.url,
        "snapshots of different urls are not comparable"
    );
    old.title == new.title && old.content == new.content
}

/// Locates the first divergence between two unequal snapshots
///
/// Checks run in order: title, then paired content lines, then a length
/// difference. Calling this on equal snapshots is an invariant violation.
pub fn first_difference(old: &Page, new: &Page) -> PageDiff {
    assert!(
        !pages_match(old, new),
        "first_difference requires unequal snapshots"
    );

    if old.title != new.title {
        return PageDiff::TitleChanged {
            old: old.title.clone(),
            new: new.title.clone(),
        };
    }

    for (index, (old_line, new_line)) in old.content.iter().zip(&new.content).enumerate() {
        if old_line != new_line {
            return PageDiff::LineChanged {
                index,
                old: old_line.clone(),
                new: new_line.clone(),
            };
        }
    }

    match old.content.len().cmp(&new.content.len()) {
        Ordering::Greater => PageDiff::LineRemoved {
            line: old.content[new.content.len()].clone(),
        },
        Ordering::Less => PageDiff::LineAdded {
            line: new.content[old.content.len()].clone(),
        },
        Ordering::Equal => unreachable!("unequal snapshots with no located difference"),
    }
}
