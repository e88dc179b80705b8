pub mod method;
pub mod result;
pub mod stats;

pub use method::{Method, Preset};
pub use result::{format_bytes, CompressionResult, ALREADY_UNDER_TARGET};
pub use stats::DocumentStats;
