//! Small helpers shared across the pipeline.
//!
//! - Wall-clock access in epoch seconds
//! - String truncation for log previews
//! - Delimited-field quoting for the output tables
//! - Writability check for the output directory

use chrono::{DateTime, Utc};
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tracing::{info, instrument};

/// Current time in whole epoch seconds (UTC).
pub fn now_utc_seconds() -> i64 {
    Utc::now().timestamp()
}

/// Render epoch seconds as an RFC 3339 timestamp for logs.
pub fn epoch_to_rfc3339(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at the last character boundary within `max` bytes
/// and suffixed with the number of bytes dropped.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Quote a field for a delimited table.
///
/// Fields containing the delimiter, a double quote, or a line break are
/// wrapped in double quotes with embedded quotes doubled; anything else is
/// written as is.
pub fn quote_field(field: &str, delimiter: char) -> String {
    let needs_quoting = field
        .chars()
        .any(|c| c == delimiter || c == '"' || c == '\n' || c == '\r');
    if needs_quoting {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Check that files could be written under `path` without creating anything.
///
/// When `path` does not exist yet, its nearest existing ancestor is probed
/// instead, since that is where the directory would be created.
///
/// # Arguments
///
/// * `path` - The output directory, which may not exist yet
///
/// # Errors
///
/// Returns an error when the nearest existing path is not a directory, or
/// when a scratch file cannot be created in it.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub fn check_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    let existing = Path::new(path)
        .ancestors()
        .map(|p| if p.as_os_str().is_empty() { Path::new(".") } else { p })
        .find(|p| p.exists())
        .ok_or("no existing ancestor directory")?;
    if !existing.is_dir() {
        return Err(format!("{} is not a directory", existing.display()).into());
    }
    let probe_path = existing.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!(probed = %existing.display(), "Output directory is writable");
    Ok(())
}
