use crate::parser::Tolerance;

/// Hosts ignored by default when following links
pub const DEFAULT_IGNORED_HOSTS: &[&str] = &["facebook", "google", "twitter", "youtube"];

/// Default delay between checks, in seconds
pub const DEFAULT_DELAY_SECS: u64 = 5;

/// Default fetch timeout, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Complete watcher configuration
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Target URL; a missing scheme is normalized to `http://`
    pub url: String,

    /// Crawl depth bound; 0 watches only the target itself
    pub max_depth: u32,

    /// Delay between checks, in seconds
    pub delay_secs: u64,

    /// Fetch timeout, in seconds; must be strictly positive
    pub timeout_secs: u64,

    /// Suppress routine per-cycle status lines
    pub quiet: bool,

    /// Terminate when a watched page becomes unreachable
    pub crash: bool,

    /// Hosts to ignore when following links
    pub ignore: Vec<String>,

    /// Structural tolerance for the HTML parser
    pub tolerance: Tolerance,
}

impl WatchConfig {
    /// Creates a configuration for a target URL with default settings
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            max_depth: 0,
            delay_secs: DEFAULT_DELAY_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            quiet: false,
            crash: false,
            ignore: DEFAULT_IGNORED_HOSTS
                .iter()
                .map(|host| host.to_string())
                .collect(),
            tolerance: Tolerance::default(),
        }
    }
}
