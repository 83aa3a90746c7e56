//! Tab-separated dataset file.
//!
//! One header row with the [`Row::COLUMNS`] names, then one line per row in
//! dataset order. Fields containing tabs, quotes or line breaks are quoted.

use crate::aggregate::Dataset;
use crate::models::Row;
use crate::utils::quote_field;
use std::error::Error;
use std::fmt::Write;
use tokio::fs;
use tracing::{info, instrument};

/// Render `dataset` as TSV text.
pub fn dataset_to_tsv(dataset: &Dataset) -> String {
    let mut out = String::new();
    out.push_str(&Row::COLUMNS.join("\t"));
    out.push('\n');
    for row in dataset.rows() {
        let line = row
            .fields()
            .iter()
            .map(|f| quote_field(f, '\t'))
            .collect::<Vec<_>>()
            .join("\t");
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{line}");
    }
    out
}

/// Write `dataset` to `path`, replacing any previous file.
#[instrument(level = "info", skip_all, fields(%path, rows = dataset.len()))]
pub async fn write_dataset(dataset: &Dataset, path: &str) -> Result<(), Box<dyn Error>> {
    fs::write(path, dataset_to_tsv(dataset)).await?;
    info!("Wrote dataset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::merge;
    use crate::testing::post;

    fn dataset() -> Dataset {
        merge(vec![
            Row::from_post(
                "oppenheimer",
                &post("o1", "movies", 20, "Oppenheimer", "Line one\nline \"two\""),
                "https://www.reddit.com",
            ),
            Row::from_post("barbie", &post("b1", "flicks", 10, "Barbie\ttrailer", ""), "https://www.reddit.com"),
        ])
    }

    #[test]
    fn test_header_only_for_empty_dataset() {
        assert_eq!(
            dataset_to_tsv(&Dataset::default()),
            "movie\tsubreddit\tid\tcreated_utc\ttitle\ttext\tpermalink\turl\n"
        );
    }

    #[test]
    fn test_rows_in_dataset_order_with_quoting() {
        let tsv = dataset_to_tsv(&dataset());
        let expected = concat!(
            "movie\tsubreddit\tid\tcreated_utc\ttitle\ttext\tpermalink\turl\n",
            "barbie\tflicks\tb1\t10\t\"Barbie\ttrailer\"\t\t/r/flicks/comments/b1/\thttps://www.reddit.com/r/flicks/comments/b1/\n",
            "oppenheimer\tmovies\to1\t20\tOppenheimer\t\"Line one\nline \"\"two\"\"\"\t/r/movies/comments/o1/\thttps://www.reddit.com/r/movies/comments/o1/\n",
        );
        assert_eq!(tsv, expected);
    }

    #[tokio::test]
    async fn test_write_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.tsv");
        let path = path.to_str().unwrap();
        write_dataset(&dataset(), path).await.unwrap();
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, dataset_to_tsv(&dataset()));
    }
}
