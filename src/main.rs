use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::thread;

use pdf_squeeze::cli::Args;
use pdf_squeeze::config::Settings;
use pdf_squeeze::model::format_bytes;
use pdf_squeeze::paths::job_stamp;
use pdf_squeeze::{
    find_ghostscript, CompressError, CompressionEngine, CompressionResult, DownsampleParams,
};

fn print_result(input: &Path, output: &Path, result: &CompressionResult) {
    println!("{}", input.display());
    println!("  Original size:   {}", format_bytes(result.original_size));
    println!("  Compressed size: {}", format_bytes(result.compressed_size));
    println!(
        "  Reduction:       {:.1}% ({} bytes saved)",
        result.reduction_percentage,
        result.bytes_saved()
    );
    println!("  Method:          {}", result.method);
    if let Some(ref warning) = result.warning {
        println!("  Note:            {}", warning);
    }
    println!("  Output:          {}", output.display());
}

fn report_error(input: &Path, err: &CompressError) {
    log::error!("Error processing {}: {}", input.display(), err);
    if err.is_client_error() {
        eprintln!("Rejected {}: {}", input.display(), err);
    } else {
        eprintln!("Failed to compress {}: {}", input.display(), err);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    args.validate()
        .map_err(|e| anyhow::anyhow!("Invalid arguments: {}", e))?;

    let mut settings = Settings::from_args(&args);
    if args.gs.is_none() {
        match find_ghostscript() {
            Some(gs) => settings = settings.with_ghostscript(gs),
            None => log::warn!(
                "Ghostscript not found on PATH, trying '{}'",
                settings.ghostscript
            ),
        }
    }

    let mut engine = CompressionEngine::from_settings(settings).context("Invalid settings")?;
    if let Some(dpi) = args.dpi {
        engine = engine.with_downsample_params(DownsampleParams::at_resolution(dpi));
    }

    // One stamp per run; jobs in the same run get an index suffix
    let stamp = job_stamp();
    let jobs: Vec<(PathBuf, PathBuf)> = args
        .inputs
        .iter()
        .enumerate()
        .map(|(i, input)| {
            let job_stamp = if args.inputs.len() > 1 {
                format!("{}_{}", stamp, i)
            } else {
                stamp.clone()
            };
            (input.clone(), args.output_path(input, &job_stamp))
        })
        .collect();

    log::info!("Processing {} file(s)", jobs.len());

    // Each job runs on its own thread; the engine holds no shared mutable state
    let outcomes: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = jobs
            .iter()
            .map(|(input, output)| {
                let engine = &engine;
                scope.spawn(move || engine.compress(input, output))
            })
            .collect();
        handles.into_iter().map(|h| h.join()).collect()
    });

    let mut failures = 0;
    for ((input, output), outcome) in jobs.iter().zip(outcomes) {
        match outcome {
            Ok(Ok(result)) => print_result(input, output, &result),
            Ok(Err(err)) => {
                failures += 1;
                report_error(input, &err);
            }
            Err(_) => {
                failures += 1;
                eprintln!("Worker for {} panicked", input.display());
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} file(s) failed", failures, jobs.len());
    }

    Ok(())
}
