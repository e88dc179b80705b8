//! Output naming for compression jobs

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::defaults::OUTPUT_PREFIX;

/// Timestamp token identifying one request, e.g. `20240131_142502_123456`
pub fn job_stamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S_%6f").to_string()
}

/// Output path `compressed_<stamp>_<file name>`, placed in `output_dir` or
/// next to the input.
///
/// Candidate files are derived from this name, so a distinct stamp per
/// request keeps concurrent jobs apart.
pub fn compressed_output_path(input: &Path, output_dir: Option<&Path>, stamp: &str) -> PathBuf {
    let file_name = input
        .file_name()
        .unwrap_or_else(|| OsStr::new("document.pdf"))
        .to_string_lossy();
    let name = format!("{}{}_{}", OUTPUT_PREFIX, stamp, file_name);

    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// True for paths ending in `.pdf`, ignoring case
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
