use super::method::Method;

/// Warning attached when the source was already small enough
pub const ALREADY_UNDER_TARGET: &str = "already under target size";

/// Outcome of one compression job
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionResult {
    pub success: bool,
    pub original_size: u64,
    pub compressed_size: u64,
    pub reduction_percentage: f64,
    pub method: Method,
    pub warning: Option<String>,
}

impl CompressionResult {
    /// Result for a source that was copied without compression
    pub fn uncompressed(original_size: u64) -> Self {
        Self {
            success: true,
            original_size,
            compressed_size: original_size,
            reduction_percentage: 0.0,
            method: Method::None,
            warning: Some(ALREADY_UNDER_TARGET.to_string()),
        }
    }

    /// Result for a compressed variant. `original_size` must be non-zero.
    ///
    /// A backend that enlarged the file yields a negative percentage.
    pub fn compressed(original_size: u64, compressed_size: u64, method: Method) -> Self {
        debug_assert!(original_size > 0);
        let saved = original_size as f64 - compressed_size as f64;
        Self {
            success: true,
            original_size,
            compressed_size,
            reduction_percentage: saved / original_size as f64 * 100.0,
            method,
            warning: None,
        }
    }

    /// Bytes saved; negative when the output grew
    pub fn bytes_saved(&self) -> i64 {
        self.original_size as i64 - self.compressed_size as i64
    }
}

/// Format a byte count with binary units, e.g. `25.0 MiB`
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = "B";
    for next in UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{:.1} {}", value, unit)
}
