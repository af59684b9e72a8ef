//! Configuration module for pagewatch
//!
//! Configuration comes from command-line flags; this module holds the
//! assembled [`WatchConfig`] and its validation rules.

mod types;
mod validation;

// Re-export types
pub use types::{
    WatchConfig, DEFAULT_DELAY_SECS, DEFAULT_IGNORED_HOSTS, DEFAULT_TIMEOUT_SECS,
};

// Re-export validation
pub use validation::validate;
