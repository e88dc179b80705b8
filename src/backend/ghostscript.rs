//! Ghostscript `pdfwrite` backend

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::defaults::{DEFAULT_GHOSTSCRIPT, PDF_COMPATIBILITY_LEVEL};
use crate::config::Settings;
use crate::error::{CompressError, Result};
use crate::model::Preset;

use super::{CompressionBackend, DownsampleParams};

/// How often a running process is polled when a timeout is set
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Maximum number of stderr characters carried into an error message
const STDERR_TAIL_CHARS: usize = 400;

/// Executable names probed by [`find_ghostscript`]
const GHOSTSCRIPT_NAMES: [&str; 3] = ["gs", "gswin64c", "gswin32c"];

/// Runs Ghostscript as a subprocess, one call per variant
#[derive(Debug, Clone)]
pub struct Ghostscript {
    binary: String,
    timeout: Option<Duration>,
}

impl Default for Ghostscript {
    fn default() -> Self {
        Self::new(DEFAULT_GHOSTSCRIPT)
    }
}

impl Ghostscript {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            binary: settings.ghostscript.clone(),
            timeout: settings.backend_timeout,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Full argument list for one invocation. Presets differ only in the
    /// `-dPDFSETTINGS` switch.
    pub fn command_args(
        input: &Path,
        output: &Path,
        preset: Preset,
        params: &DownsampleParams,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-sDEVICE=pdfwrite".into(),
            format!("-dCompatibilityLevel={}", PDF_COMPATIBILITY_LEVEL).into(),
            format!("-dPDFSETTINGS={}", preset.pdf_settings()).into(),
        ];
        args.extend(params.to_args().into_iter().map(OsString::from));
        args.extend(["-dNOPAUSE", "-dQUIET", "-dBATCH"].map(OsString::from));

        let mut output_arg = OsString::from("-sOutputFile=");
        output_arg.push(output);
        args.push(output_arg);
        args.push(input.into());
        args
    }

    fn failed(preset: Preset, message: impl Into<String>) -> CompressError {
        CompressError::BackendExecutionFailed {
            preset,
            message: message.into(),
        }
    }

    /// Wait for the child, killing it once `limit` has passed.
    /// Returns `None` on timeout.
    fn wait_with_timeout(child: &mut Child, limit: Duration) -> io::Result<Option<ExitStatus>> {
        let deadline = Instant::now() + limit;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl CompressionBackend for Ghostscript {
    fn invoke(
        &self,
        input: &Path,
        output: &Path,
        preset: Preset,
        params: &DownsampleParams,
    ) -> Result<u64> {
        let args = Self::command_args(input, output, preset, params);
        log::info!(
            "Running Ghostscript: {} {}",
            self.binary,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Self::failed(preset, format!("cannot start {}: {}", self.binary, e)))?;

        // Drain stderr concurrently so a chatty process cannot fill the pipe
        let stderr = child.stderr.take();
        let reader = thread::spawn(move || {
            let mut text = String::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut text);
            }
            text
        });

        let status = match self.timeout {
            Some(limit) => Self::wait_with_timeout(&mut child, limit),
            None => child.wait().map(Some),
        }
        .map_err(|e| Self::failed(preset, format!("failed waiting for {}: {}", self.binary, e)))?;

        let status = match status {
            Some(status) => status,
            None => {
                // A surviving grandchild may still hold stderr open; leave the
                // reader detached instead of joining it
                drop(reader);
                let limit = self.timeout.unwrap_or_default();
                return Err(Self::failed(
                    preset,
                    format!("timed out after {}s", limit.as_secs_f64()),
                ));
            }
        };

        let stderr_text = reader.join().unwrap_or_default();

        if !status.success() {
            return Err(Self::failed(
                preset,
                format!("{} ({})", status, stderr_tail(&stderr_text)),
            ));
        }

        match fs::metadata(output) {
            Ok(meta) if meta.len() > 0 => Ok(meta.len()),
            Ok(_) => Err(Self::failed(
                preset,
                format!("empty output written to {}", output.display()),
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Self::failed(
                preset,
                format!("no output written to {}", output.display()),
            )),
            Err(e) => Err(CompressError::io(output, e)),
        }
    }
}

/// Last few hundred characters of a process's stderr, trimmed
fn stderr_tail(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        return "no stderr output".to_string();
    }
    let count = trimmed.chars().count();
    trimmed
        .chars()
        .skip(count.saturating_sub(STDERR_TAIL_CHARS))
        .collect()
}

/// Search `PATH` for a Ghostscript executable that answers `--version`
pub fn find_ghostscript() -> Option<String> {
    GHOSTSCRIPT_NAMES.iter().find_map(|&name| {
        Command::new(name)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .ok()
            .filter(|status| status.success())
            .map(|_| name.to_string())
    })
}
