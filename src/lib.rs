pub mod analyzer;
pub mod backend;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod paths;

pub use analyzer::{DocumentAnalyzer, PdfAnalyzer};
pub use backend::{find_ghostscript, CompressionBackend, DownsampleParams, Ghostscript};
pub use config::Settings;
pub use engine::{CompressionEngine, DocumentProfile};
pub use error::{CompressError, ConfigError};
pub use model::{CompressionResult, DocumentStats, Method, Preset};

use std::path::Path;

/// Compress one PDF with Ghostscript using default settings.
///
/// This is the simplest entry point for library consumers: files at or
/// below `target_size` bytes are copied to `output` unchanged, larger ones
/// are rewritten with both presets and the smaller result is kept.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// let result = pdf_squeeze::compress_file(
///     Path::new("scan.pdf"),
///     Path::new("scan-small.pdf"),
///     25 * 1024 * 1024,
/// )
/// .unwrap();
///
/// println!("{} ({:.1}% smaller)", result.method, result.reduction_percentage);
/// ```
pub fn compress_file(
    input: &Path,
    output: &Path,
    target_size: u64,
) -> Result<CompressionResult, CompressError> {
    let mut settings = Settings::default().with_target_size(target_size);
    if let Some(gs) = find_ghostscript() {
        settings = settings.with_ghostscript(gs);
    }
    let engine = CompressionEngine::from_settings(settings)?;
    engine.compress(input, output)
}
