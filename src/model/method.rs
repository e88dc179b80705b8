use std::fmt;

/// Ghostscript quality preset used for one compression variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Conservative, ebook-like output
    Standard,
    /// Screen-like output, smallest images
    Aggressive,
}

impl Preset {
    /// Both presets in the order they are run
    pub fn all() -> [Preset; 2] {
        [Preset::Standard, Preset::Aggressive]
    }

    /// Value for Ghostscript's `-dPDFSETTINGS`
    pub fn pdf_settings(&self) -> &'static str {
        match self {
            Preset::Standard => "/ebook",
            Preset::Aggressive => "/screen",
        }
    }

    /// File name suffix for this variant's candidate file
    pub fn candidate_suffix(&self) -> &'static str {
        match self {
            Preset::Standard => ".std.pdf",
            Preset::Aggressive => ".agg.pdf",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Standard => "standard",
            Preset::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How the final output file was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Source copied verbatim
    None,
    Standard,
    Aggressive,
}

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Method::None => "none",
            Method::Standard => "standard",
            Method::Aggressive => "aggressive",
        }
    }
}

impl From<Preset> for Method {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Standard => Method::Standard,
            Preset::Aggressive => Method::Aggressive,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
