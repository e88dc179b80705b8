//! External recompression backends

pub mod ghostscript;

use std::path::Path;

use crate::config::defaults::DEFAULT_DOWNSAMPLE_DPI;
use crate::error::Result;
use crate::model::Preset;

pub use ghostscript::{find_ghostscript, Ghostscript};

/// Image downsampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownsampleType {
    Bicubic,
    Subsample,
}

impl DownsampleType {
    pub fn as_pdf_name(&self) -> &'static str {
        match self {
            DownsampleType::Bicubic => "/Bicubic",
            DownsampleType::Subsample => "/Subsample",
        }
    }
}

/// Image downsampling parameters shared by every preset so that the
/// variants differ only in their quality setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownsampleParams {
    pub color_type: DownsampleType,
    pub color_dpi: u32,
    pub gray_type: DownsampleType,
    pub gray_dpi: u32,
    pub mono_type: DownsampleType,
    pub mono_dpi: u32,
}

impl Default for DownsampleParams {
    fn default() -> Self {
        Self {
            color_type: DownsampleType::Bicubic,
            color_dpi: DEFAULT_DOWNSAMPLE_DPI,
            gray_type: DownsampleType::Bicubic,
            gray_dpi: DEFAULT_DOWNSAMPLE_DPI,
            mono_type: DownsampleType::Subsample,
            mono_dpi: DEFAULT_DOWNSAMPLE_DPI,
        }
    }
}

impl DownsampleParams {
    /// Default filters with every image class resampled to `dpi`
    pub fn at_resolution(dpi: u32) -> Self {
        Self {
            color_dpi: dpi,
            gray_dpi: dpi,
            mono_dpi: dpi,
            ..Self::default()
        }
    }

    /// Ghostscript `-d` switches for these parameters
    pub fn to_args(&self) -> Vec<String> {
        vec![
            format!("-dColorImageDownsampleType={}", self.color_type.as_pdf_name()),
            format!("-dColorImageResolution={}", self.color_dpi),
            format!("-dGrayImageDownsampleType={}", self.gray_type.as_pdf_name()),
            format!("-dGrayImageResolution={}", self.gray_dpi),
            format!("-dMonoImageDownsampleType={}", self.mono_type.as_pdf_name()),
            format!("-dMonoImageResolution={}", self.mono_dpi),
        ]
    }
}

/// A process that rewrites a PDF with a given preset
pub trait CompressionBackend: Send + Sync {
    /// Write a recompressed copy of `input` to `output` and return its size
    /// in bytes.
    ///
    /// Fails with `CompressError::BackendExecutionFailed` when the backend
    /// cannot be started or does not finish successfully.
    fn invoke(
        &self,
        input: &Path,
        output: &Path,
        preset: Preset,
        params: &DownsampleParams,
    ) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_args() {
        let args = DownsampleParams::default().to_args();
        assert_eq!(
            args,
            vec![
                "-dColorImageDownsampleType=/Bicubic",
                "-dColorImageResolution=72",
                "-dGrayImageDownsampleType=/Bicubic",
                "-dGrayImageResolution=72",
                "-dMonoImageDownsampleType=/Subsample",
                "-dMonoImageResolution=72",
            ]
        );
    }

    #[test]
    fn test_at_resolution_keeps_filters() {
        let params = DownsampleParams::at_resolution(150);
        assert_eq!(params.color_dpi, 150);
        assert_eq!(params.gray_dpi, 150);
        assert_eq!(params.mono_dpi, 150);
        assert_eq!(params.mono_type, DownsampleType::Subsample);
        assert_eq!(params.color_type, DownsampleType::Bicubic);
    }
}
