//! Watch loop
//!
//! Builds the baseline snapshot with one full crawl at startup, then
//! re-fetches the root page on every cycle and compares it against the
//! baseline until a difference or (in crash mode) a fetch failure ends the
//! run.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Duration;

use crate::config::{validate, WatchConfig};
use crate::crawler::{Crawler, Page};
use crate::diff::{first_difference, pages_match, PageDiff};
use crate::url::ensure_scheme;
use crate::WatchError;

/// How a watch run ended
#[derive(Debug, Serialize)]
pub enum WatchOutcome {
    /// The watched page diverged from the baseline snapshot
    Changed {
        url: String,
        difference: PageDiff,
        at: DateTime<Local>,
    },

    /// Crash mode: a check failed to fetch or parse
    Unreachable {
        url: String,
        status: String,
        at: DateTime<Local>,
    },
}

/// Periodic page watcher
pub struct Watcher {
    config: WatchConfig,
    crawler: Crawler,
}

impl Watcher {
    /// Validates the configuration and prepares the crawler
    pub fn new(config: WatchConfig) -> Result<Self, WatchError> {
        validate(&config)?;
        let crawler = Crawler::new(&config)?;
        Ok(Self { config, crawler })
    }

    /// Runs until a change is detected or, in crash mode, a check fails
    ///
    /// The initial crawl is the only one that follows links; a failure
    /// anywhere in it is fatal. Later cycles re-fetch the root page alone.
    pub async fn run(&self) -> Result<WatchOutcome, WatchError> {
        let target = ensure_scheme(&self.config.url);
        println!("Pinging {} ...", target);

        let baseline = self.crawler.crawl(&target).await?;
        if !baseline.valid {
            return Err(WatchError::RootUnreachable {
                url: baseline.url,
                status: baseline.status,
            });
        }
        self.announce(&baseline);

        loop {
            tokio::time::sleep(Duration::from_secs(self.config.delay_secs)).await;
            if !self.config.quiet {
                println!("\nChecking...");
            }

            let current = self.crawler.check(&baseline.url).await;
            if !current.valid {
                if self.config.crash {
                    return Ok(WatchOutcome::Unreachable {
                        url: current.url,
                        status: current.status,
                        at: Local::now(),
                    });
                }
                tracing::warn!(url = %current.url, status = %current.status, "check failed, retrying next cycle");
                if !self.config.quiet {
                    println!("\t{} -> {}, will retry", current.url, current.status);
                }
                continue;
            }

            if pages_match(&baseline, &current) {
                if !self.config.quiet {
                    println!("\t{} -> no change", current.url);
                }
                continue;
            }

            let difference = first_difference(&baseline, &current);
            return Ok(WatchOutcome::Changed {
                url: current.url,
                difference,
                at: Local::now(),
            });
        }
    }

    fn announce(&self, baseline: &Page) {
        let cadence = match self.config.delay_secs {
            0 => "continuously".to_string(),
            1 => "every second".to_string(),
            seconds => format!("every {} seconds", seconds),
        };
        println!(
            "Checking {} page(s) {}:",
            baseline.page_count(),
            cadence
        );
        print!("{}", baseline);
    }
}
