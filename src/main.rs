//! # Reddit Movie Posts
//!
//! Collects Reddit discussion posts about a fixed set of movies, keeps the
//! relevant English ones, and writes a deduplicated dataset plus coverage
//! statistics.
//!
//! ## Usage
//!
//! ```sh
//! reddit_movie_posts -c collector.yaml -o ./data
//! ```
//!
//! ## Architecture
//!
//! The run is a strictly sequential pipeline:
//! 1. **Fetching**: page each subreddit's search results per topic, newest
//!    first, until they predate the topic start
//! 2. **Filtering**: time window, title/body relevance, negative keywords,
//!    English check
//! 3. **Aggregation**: dedupe by post id and by `(movie, id)`, sort
//! 4. **Output**: dataset TSV and coverage summary (skipped when empty)

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod aggregate;
mod api;
mod cli;
mod collect;
mod config;
mod coverage;
mod fetcher;
mod filter;
mod language;
mod models;
mod outputs;
mod registry;
#[cfg(test)]
mod testing;
mod utils;

use api::RedditSearchClient;
use cli::Cli;
use config::Settings;
use language::WhatlangDetector;
use utils::{check_writable_dir, now_utc_seconds};

/// Exit status when no post survived collection.
const EXIT_NOTHING_COLLECTED: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("reddit_movie_posts starting up");

    let args = Cli::parse();
    debug!(?args.config, ?args.output_dir, "Parsed CLI arguments");

    let settings = Settings::load(args.config.as_deref()).await?;
    let registry = settings.registry()?;
    if registry.is_empty() {
        error!("Settings define no topics; nothing to collect");
        return Err("no topics configured".into());
    }
    info!(
        topics = registry.len(),
        subreddits = ?settings.subreddits,
        request_delay_ms = settings.request_delay_ms,
        "Topic registry ready"
    );

    // Early check: fail before spending minutes on requests
    if let Err(e) = check_writable_dir(&args.output_dir) {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let client = RedditSearchClient::new(&settings)?;
    let detector = WhatlangDetector;

    let outcome = collect::run(&client, &detector, &settings, &registry).await;
    let wrote = outputs::write_all(&outcome, &registry, now_utc_seconds(), &args.output_paths()).await?;
    if !wrote {
        warn!(elapsed_secs = start_time.elapsed().as_secs(), "Exiting without output");
        return Ok(ExitCode::from(EXIT_NOTHING_COLLECTED));
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(ExitCode::SUCCESS)
}
