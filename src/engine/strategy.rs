use std::fmt;

use crate::config::defaults::{TEXT_HEAVY_MAX_IMAGE_RATIO, TEXT_HEAVY_MIN_AVG_CHARS};
use crate::model::{DocumentStats, Preset};

/// Coarse content classification of a document.
///
/// Only reported in logs; both presets always run and the smaller output wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentProfile {
    TextHeavy,
    ImageHeavyOrMixed,
}

impl DocumentProfile {
    pub fn classify(stats: &DocumentStats) -> Self {
        if stats.avg_text_per_page() > TEXT_HEAVY_MIN_AVG_CHARS
            && stats.image_ratio() < TEXT_HEAVY_MAX_IMAGE_RATIO
        {
            DocumentProfile::TextHeavy
        } else {
            DocumentProfile::ImageHeavyOrMixed
        }
    }

    /// Preset this profile would favour on its own
    pub fn preferred_preset(&self) -> Preset {
        match self {
            DocumentProfile::TextHeavy => Preset::Standard,
            DocumentProfile::ImageHeavyOrMixed => Preset::Aggressive,
        }
    }
}

impl fmt::Display for DocumentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentProfile::TextHeavy => write!(f, "text-heavy"),
            DocumentProfile::ImageHeavyOrMixed => write!(f, "image-heavy or mixed"),
        }
    }
}
