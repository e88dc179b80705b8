use clap::Parser;
use std::path::PathBuf;

use crate::parser::parse_target_size;
use crate::paths::{compressed_output_path, is_pdf};

#[derive(Parser, Debug)]
#[command(name = "pdf-squeeze")]
#[command(
    author,
    version,
    about = "Shrink PDFs below a target size by trying two Ghostscript presets"
)]
pub struct Args {
    /// Input PDF file paths
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path (single input only)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for generated output files (defaults to each input's directory)
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,

    /// Files at or below this size are copied untouched (e.g. "25MiB", "10MB")
    #[arg(short, long, default_value = "25MiB", value_parser = parse_target_size)]
    pub target_size: u64,

    /// Ghostscript executable (searched on PATH when omitted)
    #[arg(long)]
    pub gs: Option<String>,

    /// Kill a Ghostscript run after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Resample images to this resolution (default 72 DPI)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub dpi: Option<u32>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Reject argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.output.is_some() && self.inputs.len() > 1 {
            return Err("--output can only be used with a single input".to_string());
        }
        if let Some(bad) = self.inputs.iter().find(|p| !is_pdf(p)) {
            return Err(format!("Only PDF files are supported: {}", bad.display()));
        }
        Ok(())
    }

    /// Output path for one input: the explicit `--output`, or a
    /// `compressed_<stamp>_<name>` file
    pub fn output_path(&self, input: &std::path::Path, stamp: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| compressed_output_path(input, self.output_dir.as_deref(), stamp))
    }
}
