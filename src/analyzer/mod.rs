//! Document content inspection

pub mod pdf;

use std::path::Path;

use crate::error::Result;
use crate::model::DocumentStats;

pub use pdf::PdfAnalyzer;

/// Read-only inspection of a document's text and image content
pub trait DocumentAnalyzer: Send + Sync {
    /// Count pages, extracted text characters and image references.
    ///
    /// Fails with `CompressError::UnreadableDocument` when the file cannot
    /// be opened or parsed.
    fn analyze(&self, path: &Path) -> Result<DocumentStats>;
}
