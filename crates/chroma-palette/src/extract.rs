//! Raw color extraction from images.
//!
//! The generator only depends on the [`Extractor`] trait. [`Magick`] is the
//! production implementation: it runs ImageMagick's histogram output and
//! parses it with [`parse_histogram`].

use std::ffi::OsString;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::LazyLock;
use std::thread;
use std::time::Duration;

use chroma_color::Hex;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Error produced while extracting raw colors.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("extraction tool '{program}' not found; is ImageMagick installed?")]
    ToolNotFound { program: String },
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("extraction timed out after {0:?}")]
    TimedOut(Duration),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Parameters of one extraction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractRequest<'a> {
    /// Source image.
    pub image: &'a Path,
    /// Edge length, in pixels, the image is resized and cropped to.
    pub size: u32,
    /// Bits per channel used when quantizing.
    pub depth: u32,
    /// Maximum number of colors to return.
    pub max_colors: usize,
}

/// Source of raw colors for the generator.
///
/// Implementations return colors most significant first. For the same request
/// the order must be stable.
pub trait Extractor {
    /// # Errors
    /// Returns an [`ExtractError`] if the colors cannot be produced.
    fn extract(&self, request: &ExtractRequest<'_>) -> Result<Vec<Hex>, ExtractError>;
}

impl<F> Extractor for F
where
    F: Fn(&ExtractRequest<'_>) -> Result<Vec<Hex>, ExtractError>,
{
    fn extract(&self, request: &ExtractRequest<'_>) -> Result<Vec<Hex>, ExtractError> {
        self(request)
    }
}

/// Settings of the [`Magick`] adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagickOptions {
    /// Program to run, looked up on `PATH` when not a path.
    pub program: String,
    /// Kill the process after this many seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for MagickOptions {
    fn default() -> Self {
        Self {
            program: "magick".to_string(),
            timeout_secs: None,
        }
    }
}

/// Extracts colors with ImageMagick's `histogram:info:` output.
#[derive(Debug, Clone, Default)]
pub struct Magick {
    options: MagickOptions,
}

impl Magick {
    pub fn new(options: MagickOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MagickOptions {
        &self.options
    }

    /// Arguments passed to the program for a request. The image path is
    /// passed through untouched, so it need not be UTF-8.
    pub fn args(request: &ExtractRequest<'_>) -> Vec<OsString> {
        let size = request.size;
        let mut args = vec![request.image.as_os_str().to_owned()];
        args.extend(
            [
                "-resize".to_string(),
                format!("{size}x{size}^"),
                "-gravity".into(),
                "center".into(),
                "-extent".into(),
                format!("{size}x{size}"),
                "-format".into(),
                "%c".into(),
                "-depth".into(),
                request.depth.to_string(),
                "histogram:info:-".into(),
            ]
            .map(OsString::from),
        );
        args
    }

    fn run(&self, request: &ExtractRequest<'_>) -> Result<String, ExtractError> {
        let program = &self.options.program;
        debug!(
            program = %program,
            image = %request.image.display(),
            size = request.size,
            "running extractor"
        );

        let mut child = Command::new(program)
            .args(Self::args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ExtractError::ToolNotFound {
                    program: program.clone(),
                },
                _ => ExtractError::Io(e),
            })?;

        // The child blocks once a pipe fills, so both are read while it runs.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.options.timeout_secs.map(Duration::from_secs) {
            Some(timeout) => match child.wait_timeout(timeout)? {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!(program = %program, ?timeout, "extractor timed out");
                    return Err(ExtractError::TimedOut(timeout));
                }
            },
            None => child.wait()?,
        };

        let stdout = join(stdout)?;
        let stderr = join(stderr)?;

        if !status.success() {
            return Err(ExtractError::ExtractionFailed(format!(
                "{program} exited with {status}: {}",
                stderr.trim()
            )));
        }
        if !stderr.trim().is_empty() {
            warn!(program = %program, stderr = %stderr.trim(), "extractor reported errors");
        }
        Ok(stdout)
    }
}

impl Extractor for Magick {
    fn extract(&self, request: &ExtractRequest<'_>) -> Result<Vec<Hex>, ExtractError> {
        let stdout = self.run(request)?;
        parse_histogram(&stdout, request.max_colors)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<io::Result<String>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    })
}

fn join(handle: thread::JoinHandle<io::Result<String>>) -> Result<String, ExtractError> {
    handle
        .join()
        .map_err(|_| ExtractError::ExtractionFailed("output reader panicked".into()))?
        .map_err(ExtractError::Io)
}

static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("#[0-9A-Fa-f]{6}").expect("color regex"));

/// Parses `histogram:info:` text into colors, most frequent first.
///
/// Each line looks like `  1234: (255,0,0) #FF0000 red`. Lines are ordered by
/// their pixel count, descending; equal counts keep their input order. At
/// most `max_colors` lines are used. Lines without a `#rrggbb` color are
/// skipped with a warning.
///
/// # Errors
/// Returns [`ExtractError::ExtractionFailed`] if no color could be read.
pub fn parse_histogram(text: &str, max_colors: usize) -> Result<Vec<Hex>, ExtractError> {
    let mut lines: Vec<(u64, &str)> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| (pixel_count(line), line))
        .collect();
    lines.sort_by(|a, b| b.0.cmp(&a.0));

    let mut colors = Vec::with_capacity(lines.len().min(max_colors));
    for (_, line) in lines.into_iter().take(max_colors) {
        match COLOR_RE.find(line).map(|m| Hex::parse(m.as_str())) {
            Some(Ok(hex)) => colors.push(hex),
            _ => warn!(line = %line, "no color found in histogram line"),
        }
    }

    if colors.is_empty() {
        return Err(ExtractError::ExtractionFailed(
            "histogram contained no colors".into(),
        ));
    }
    debug!(count = colors.len(), "parsed histogram");
    Ok(colors)
}

fn pixel_count(line: &str) -> u64 {
    line.split_once(':')
        .and_then(|(count, _)| count.trim().parse().ok())
        .unwrap_or(0)
}
