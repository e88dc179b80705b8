//! Per-request compression state and candidate file ownership

use std::io;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::backend::{CompressionBackend, DownsampleParams};
use crate::error::{CompressError, Result};
use crate::model::Preset;

/// A backend output file owned by a job.
///
/// Created exclusively under a fresh name in the output's directory, so it
/// never aliases the input or any existing file. Removed on drop unless it
/// has been promoted.
#[derive(Debug)]
pub struct CandidateFile {
    file: NamedTempFile,
}

impl CandidateFile {
    pub fn create(output: &Path, preset: Preset) -> Result<Self> {
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let prefix = format!(".{}.", stem);

        let file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(preset.candidate_suffix())
            .tempfile_in(dir)
            .map_err(|e| CompressError::io(dir, e))?;
        log::debug!("Created candidate {}", file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Atomically move the candidate to `dest`, failing if `dest` exists
    pub fn promote(self, dest: &Path) -> Result<()> {
        let from = self.file.path().to_path_buf();
        self.file.persist_noclobber(dest).map_err(|e| {
            if e.error.kind() == io::ErrorKind::AlreadyExists {
                CompressError::OutputExists(dest.to_path_buf())
            } else {
                CompressError::io(dest, e.error)
            }
        })?;
        log::debug!("Promoted {} to {}", from.display(), dest.display());
        Ok(())
    }
}

/// A finished variant waiting for comparison
#[derive(Debug)]
struct Candidate {
    preset: Preset,
    size: u64,
    file: CandidateFile,
}

/// Lower rank wins ties
fn tie_rank(preset: Preset) -> u8 {
    match preset {
        Preset::Standard => 0,
        Preset::Aggressive => 1,
    }
}

/// State for compressing one input into one output.
///
/// Every candidate the job creates is either promoted to the output path
/// or removed by the time the job is dropped.
#[derive(Debug)]
pub struct CompressionJob<'a> {
    input: &'a Path,
    output: &'a Path,
    variants_tried: Vec<Preset>,
    candidates: Vec<Candidate>,
}

impl<'a> CompressionJob<'a> {
    pub fn new(input: &'a Path, output: &'a Path) -> Self {
        Self {
            input,
            output,
            variants_tried: Vec::new(),
            candidates: Vec::new(),
        }
    }

    pub fn variants_tried(&self) -> &[Preset] {
        &self.variants_tried
    }

    /// Run the backend for one preset and keep its output as a candidate
    pub fn run_variant<B: CompressionBackend + ?Sized>(
        &mut self,
        backend: &B,
        preset: Preset,
        params: &DownsampleParams,
    ) -> Result<u64> {
        // Guard exists before the backend starts so partial output is removed too
        let file = CandidateFile::create(self.output, preset)?;
        self.variants_tried.push(preset);

        let size = backend.invoke(self.input, file.path(), preset, params)?;
        self.candidates.push(Candidate { preset, size, file });
        Ok(size)
    }

    /// Keep the smallest candidate (standard on ties), delete the others and
    /// move the winner to the output path
    pub fn finish(mut self) -> Result<(Preset, u64)> {
        let winner_index = self
            .candidates
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| (c.size, tie_rank(c.preset)))
            .map(|(i, _)| i)
            .ok_or_else(|| {
                CompressError::io(
                    self.output,
                    io::Error::new(io::ErrorKind::NotFound, "no compression variant produced"),
                )
            })?;

        let winner = self.candidates.swap_remove(winner_index);
        // Losers are removed before the winner is renamed into place
        self.candidates.clear();

        let Candidate { preset, size, file } = winner;
        file.promote(self.output)?;
        Ok((preset, size))
    }
}
