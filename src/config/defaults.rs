/// Default target size in bytes (25 MiB)
pub const DEFAULT_TARGET_SIZE: u64 = 25 * 1024 * 1024;

/// Average characters per page above which a document may be text-heavy
pub const TEXT_HEAVY_MIN_AVG_CHARS: f64 = 500.0;

/// Images per page below which a document may be text-heavy
pub const TEXT_HEAVY_MAX_IMAGE_RATIO: f64 = 0.2;

/// Default Ghostscript executable
pub const DEFAULT_GHOSTSCRIPT: &str = "gs";

/// PDF compatibility level requested from the backend
pub const PDF_COMPATIBILITY_LEVEL: &str = "1.4";

/// Downsampling resolution for all image channels in DPI
pub const DEFAULT_DOWNSAMPLE_DPI: u32 = 72;

/// Prefix for compressed output file names
pub const OUTPUT_PREFIX: &str = "compressed_";
