//! Pagewatch main entry point
//!
//! This is the command-line interface for the pagewatch change watcher.

use anyhow::Context;
use clap::Parser;
use pagewatch::config::{WatchConfig, DEFAULT_IGNORED_HOSTS};
use pagewatch::parser::Tolerance;
use pagewatch::watch::{WatchOutcome, Watcher};
use tracing_subscriber::EnvFilter;

/// Pagewatch: a web page change watcher
///
/// Pagewatch checks a website continuously for updates and notifies the
/// user when one occurs. At higher checking levels it also follows the
/// page's links once at startup and watches the discovered tree's root.
#[derive(Parser, Debug)]
#[command(name = "pagewatch")]
#[command(version)]
#[command(about = "Checks a website continuously for updates", long_about = None)]
struct Cli {
    /// The URL of the website to check (scheme optional)
    url: String,

    /// Checking level: 0 watches only the supplied URL, 1 also fetches the
    /// pages it links to, and so on
    #[arg(short, long, default_value_t = 0)]
    level: u32,

    /// Delay, in seconds, after every check
    #[arg(short, long, default_value_t = 5)]
    delay: u64,

    /// Fetch timeout, in seconds
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Notify the user only about/when a change occurs
    #[arg(short, long)]
    quiet: bool,

    /// Terminate if a website is unreachable during watching
    #[arg(short, long)]
    crash: bool,

    /// Websites to ignore when following links
    #[arg(short, long, num_args = 1.., default_values_t = DEFAULT_IGNORED_HOSTS.iter().map(|host| host.to_string()))]
    ignore: Vec<String>,

    /// Structural tolerance: 0 strict, 1 auto-close, 2 lenient
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=2))]
    tolerance: u8,

    /// Print the final outcome as JSON
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = WatchConfig {
        url: cli.url,
        max_depth: cli.level,
        delay_secs: cli.delay,
        timeout_secs: cli.timeout,
        quiet: cli.quiet,
        crash: cli.crash,
        ignore: cli.ignore,
        tolerance: Tolerance::from_level(cli.tolerance)
            .expect("tolerance range enforced by clap"),
    };

    let watcher = Watcher::new(config).context("failed to start watching")?;
    let outcome = watcher.run().await?;
    report_outcome(&outcome, cli.json)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagewatch=info,warn"),
            1 => EnvFilter::new("pagewatch=debug,info"),
            2 => EnvFilter::new("pagewatch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Prints the final outcome and returns the process result
fn report_outcome(outcome: &WatchOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    match outcome {
        WatchOutcome::Changed {
            url,
            difference,
            at,
        } => {
            // terminal bell, then the change report
            println!("\x07");
            println!(
                "\nA change occurred at {} in {}:",
                at.format("%Y-%m-%d %I:%M:%S %p"),
                url
            );
            println!("\t{}", difference);
            println!("Terminating");
        }
        WatchOutcome::Unreachable { url, status, at } => {
            println!("\n{} -> {}", url, status);
            println!("\nTerminated at {}", at.format("%Y-%m-%d %I:%M:%S %p"));
        }
    }
    Ok(())
}
