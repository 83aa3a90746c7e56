//! Coverage summary file.
//!
//! Two labeled comma-separated sections:
//!
//! ```text
//! # counts_by_movie_with_rates
//! movie,count,days_since_start,posts_per_day_since_start
//! barbie,25,10,2.5
//!
//! # counts_by_movie_and_subreddit
//! movie,subreddit,count
//! barbie,movies,25
//! ```

use crate::coverage::CoverageSummary;
use crate::utils::quote_field;
use std::error::Error;
use std::fmt::Write;
use tokio::fs;
use tracing::{info, instrument};

const RATES_HEADING: &str = "# counts_by_movie_with_rates";
const SUBREDDIT_HEADING: &str = "# counts_by_movie_and_subreddit";

fn csv(field: &str) -> String {
    quote_field(field, ',')
}

/// Render the summary text. Rates always carry a decimal point (`2.0`).
pub fn summary_to_text(summary: &CoverageSummary) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{RATES_HEADING}");
    let _ = writeln!(out, "movie,count,days_since_start,posts_per_day_since_start");
    for m in &summary.by_movie {
        let _ = writeln!(
            out,
            "{},{},{},{:?}",
            csv(&m.movie),
            m.count,
            m.days_since_start,
            m.posts_per_day_since_start
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{SUBREDDIT_HEADING}");
    let _ = writeln!(out, "movie,subreddit,count");
    for s in &summary.by_movie_and_subreddit {
        let _ = writeln!(out, "{},{},{}", csv(&s.movie), csv(&s.subreddit), s.count);
    }
    out
}

/// Write the summary to `path`, replacing any previous file.
#[instrument(level = "info", skip_all, fields(%path))]
pub async fn write_summary(summary: &CoverageSummary, path: &str) -> Result<(), Box<dyn Error>> {
    fs::write(path, summary_to_text(summary)).await?;
    info!(
        movies = summary.by_movie.len(),
        movie_subreddits = summary.by_movie_and_subreddit.len(),
        "Wrote coverage summary"
    );
    Ok(())
}
