//! Command-line interface definitions.
//!
//! Collection behaviour (topics, subreddits, delays) lives in the settings
//! file; the command line only chooses that file and where outputs go.

use crate::outputs::OutputPaths;
use clap::Parser;

/// Command-line arguments for the collector.
///
/// # Examples
///
/// ```sh
/// # Built-in topics, outputs in the current directory
/// reddit_movie_posts
///
/// # Custom settings and output directory
/// reddit_movie_posts -c collector.yaml -o ./data
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory the dataset and summary are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// File name of the tab-separated dataset
    #[arg(long, default_value = "reddit_movie_posts_full.tsv")]
    pub dataset_file: String,

    /// File name of the coverage summary
    #[arg(long, default_value = "coverage_summary.csv")]
    pub summary_file: String,
}

impl Cli {
    pub fn dataset_path(&self) -> String {
        format!("{}/{}", self.output_dir.trim_end_matches('/'), self.dataset_file)
    }

    pub fn summary_path(&self) -> String {
        format!("{}/{}", self.output_dir.trim_end_matches('/'), self.summary_file)
    }

    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths {
            dir: self.output_dir.clone(),
            dataset: self.dataset_path(),
            summary: self.summary_path(),
        }
    }
}
