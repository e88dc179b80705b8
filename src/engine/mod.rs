//! Dual-strategy compression engine
//!
//! Files already at or below the target size are copied untouched. Larger
//! files are analyzed, classified for the log, and then rewritten with both
//! presets; the smaller output is renamed into place and the other removed.

pub mod job;
pub mod strategy;

use std::fs;
use std::path::Path;

use crate::analyzer::{DocumentAnalyzer, PdfAnalyzer};
use crate::backend::{CompressionBackend, DownsampleParams, Ghostscript};
use crate::config::Settings;
use crate::error::{CompressError, ConfigError, Result};
use crate::model::{format_bytes, CompressionResult, Preset};

pub use job::{CandidateFile, CompressionJob};
pub use strategy::DocumentProfile;

/// Stateless compression engine. One instance can serve concurrent jobs as
/// long as each job uses its own output path.
#[derive(Debug)]
pub struct CompressionEngine<B = Ghostscript, A = PdfAnalyzer> {
    settings: Settings,
    backend: B,
    analyzer: A,
    params: DownsampleParams,
}

impl CompressionEngine {
    /// Engine using Ghostscript and the lopdf analyzer
    pub fn from_settings(settings: Settings) -> Result<Self, ConfigError> {
        let backend = Ghostscript::from_settings(&settings);
        Self::new(settings, backend, PdfAnalyzer::new())
    }
}

impl<B: CompressionBackend, A: DocumentAnalyzer> CompressionEngine<B, A> {
    pub fn new(settings: Settings, backend: B, analyzer: A) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            settings,
            backend,
            analyzer,
            params: DownsampleParams::default(),
        })
    }

    pub fn with_downsample_params(mut self, params: DownsampleParams) -> Self {
        self.params = params;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Compress `input` into `output` using the configured target size
    pub fn compress(&self, input: &Path, output: &Path) -> Result<CompressionResult> {
        self.compress_with_target(input, output, self.settings.target_size)
    }

    /// Compress `input` into `output` unless it is already at or below
    /// `target_size` bytes, in which case it is copied verbatim.
    ///
    /// `input` is never modified. `output` must not exist yet. On error no
    /// file is left at `output` and every candidate file has been removed.
    pub fn compress_with_target(
        &self,
        input: &Path,
        output: &Path,
        target_size: u64,
    ) -> Result<CompressionResult> {
        if output.exists() {
            return Err(CompressError::OutputExists(output.to_path_buf()));
        }

        let original_size = fs::metadata(input)
            .map_err(|e| CompressError::io(input, e))?
            .len();

        if original_size <= target_size {
            copy_verbatim(input, output)?;
            log::info!(
                "{} is {} (target {}), copied without compression",
                input.display(),
                format_bytes(original_size),
                format_bytes(target_size)
            );
            return Ok(CompressionResult::uncompressed(original_size));
        }

        let stats = self.analyzer.analyze(input)?;
        let profile = DocumentProfile::classify(&stats);
        log::info!(
            "PDF analysis: {} pages, {} chars ({:.1}/page), {} images ({:.2}/page)",
            stats.total_pages,
            stats.total_text_chars,
            stats.avg_text_per_page(),
            stats.image_count,
            stats.image_ratio()
        );
        log::info!(
            "Document looks {}, would prefer the {} preset; trying both",
            profile,
            profile.preferred_preset()
        );

        let mut job = CompressionJob::new(input, output);
        for preset in Preset::all() {
            let size = job.run_variant(&self.backend, preset, &self.params)?;
            log::info!("{} variant: {} bytes", preset, size);
        }

        let (winner, compressed_size) = job.finish()?;
        let result = CompressionResult::compressed(original_size, compressed_size, winner.into());
        log::info!(
            "Kept {} variant: {} -> {} ({:.1}% reduction)",
            winner,
            format_bytes(original_size),
            format_bytes(compressed_size),
            result.reduction_percentage
        );

        Ok(result)
    }
}

/// Byte-for-byte copy; a partial copy is removed on failure
fn copy_verbatim(input: &Path, output: &Path) -> Result<()> {
    if let Err(e) = fs::copy(input, output) {
        let _ = fs::remove_file(output);
        return Err(CompressError::io(output, e));
    }
    Ok(())
}
