//! Output files written at the end of a successful run.
//!
//! # Submodules
//!
//! - [`tsv`]: the dataset, one tab-separated line per kept post
//! - [`summary`]: per-movie and per-subreddit coverage tables
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── reddit_movie_posts_full.tsv
//! └── coverage_summary.csv
//! ```
//!
//! Nothing is written, and the directory is not created, when the run
//! collected no rows.

pub mod summary;
pub mod tsv;

use crate::collect::RunOutcome;
use crate::coverage;
use crate::registry::TopicRegistry;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Where the run's files go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub dir: String,
    pub dataset: String,
    pub summary: String,
}

/// Write the dataset and its coverage summary for a finished run.
///
/// # Arguments
///
/// * `outcome` - Result of the collection run
/// * `registry` - Topics the run used; supplies each movie's start time
/// * `now` - Epoch seconds the coverage rates are computed against
/// * `paths` - Output directory and file paths
///
/// # Returns
///
/// `true` when both files were written, `false` for
/// [`RunOutcome::NothingCollected`], in which case the file system is left
/// untouched.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be
/// written.
#[instrument(level = "info", skip_all, fields(dir = %paths.dir))]
pub async fn write_all(
    outcome: &RunOutcome,
    registry: &TopicRegistry,
    now: i64,
    paths: &OutputPaths,
) -> Result<bool, Box<dyn Error>> {
    let RunOutcome::Collected(dataset) = outcome else {
        warn!("Nothing collected; no output files written");
        return Ok(false);
    };

    fs::create_dir_all(&paths.dir).await?;
    tsv::write_dataset(dataset, &paths.dataset).await?;
    info!(path = %paths.dataset, rows = dataset.len(), "Wrote: {}", paths.dataset);

    let coverage = coverage::summarize(dataset, registry, now);
    summary::write_summary(&coverage, &paths.summary).await?;
    info!(path = %paths.summary, "Wrote: {}", paths.summary);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::merge;
    use crate::models::Row;
    use crate::registry::default_topics;
    use crate::testing::post;
    use std::path::Path;

    fn paths_under(dir: &Path) -> OutputPaths {
        let out = dir.join("run/out");
        OutputPaths {
            dir: out.to_str().unwrap().to_string(),
            dataset: out.join("posts.tsv").to_str().unwrap().to_string(),
            summary: out.join("summary.csv").to_str().unwrap().to_string(),
        }
    }

    fn registry() -> TopicRegistry {
        TopicRegistry::from_configs(&default_topics()).unwrap()
    }

    #[tokio::test]
    async fn test_nothing_collected_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_under(dir.path());

        let wrote = write_all(&RunOutcome::NothingCollected, &registry(), 1_700_000_000, &paths)
            .await
            .unwrap();

        assert!(!wrote);
        assert!(!Path::new(&paths.dataset).exists());
        assert!(!Path::new(&paths.summary).exists());
        assert!(!Path::new(&paths.dir).exists());
    }

    #[tokio::test]
    async fn test_collected_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_under(dir.path());
        let dataset = merge(vec![Row::from_post(
            "barbie",
            &post("b1", "movies", 1_690_000_000, "Barbie review", ""),
            "https://www.reddit.com",
        )]);

        let wrote = write_all(&RunOutcome::Collected(dataset.clone()), &registry(), 1_700_000_000, &paths)
            .await
            .unwrap();

        assert!(wrote);
        assert_eq!(
            std::fs::read_to_string(&paths.dataset).unwrap(),
            tsv::dataset_to_tsv(&dataset)
        );
        let summary_text = std::fs::read_to_string(&paths.summary).unwrap();
        assert!(summary_text.contains("\nbarbie,1,"));
        assert!(summary_text.contains("\nbarbie,movies,1\n"));
    }
}
