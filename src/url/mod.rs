//! URL handling for pagewatch
//!
//! This module covers the three URL concerns the watcher has:
//! - scheme normalization (`http://` is assumed when none is given)
//! - network-location extraction (`host[:port]`), used for self-reference
//!   resolution and ignore-list matching
//! - href eligibility filtering for discovered anchor links

mod matcher;
mod normalize;

pub use matcher::is_ignored;
pub use normalize::{ensure_scheme, network_location, resolve_href};
