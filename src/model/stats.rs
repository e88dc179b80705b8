/// Content statistics gathered from one pass over a document.
///
/// Image references are counted per page, so an image drawn on several
/// pages is counted once for each of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    pub total_pages: usize,
    pub total_text_chars: usize,
    pub image_count: usize,
}

impl DocumentStats {
    pub fn new(total_pages: usize, total_text_chars: usize, image_count: usize) -> Self {
        Self {
            total_pages,
            total_text_chars,
            image_count,
        }
    }

    /// Average extracted characters per page (0.0 for an empty document)
    pub fn avg_text_per_page(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        self.total_text_chars as f64 / self.total_pages as f64
    }

    /// Image references per page (0.0 for an empty document)
    pub fn image_ratio(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        self.image_count as f64 / self.total_pages as f64
    }
}
