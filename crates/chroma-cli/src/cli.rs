//! Command-line interface for `chroma`.
//!
//! # Examples
//!
//! ```bash
//! # Print a Lua palette for a wallpaper
//! chroma generate ~/wall.png
//!
//! # Write JSON, with a larger first extraction pass
//! chroma generate ~/wall.png --size 512 -o colors.json
//!
//! # Inspect the rule table and how a color is classified
//! chroma rules --format json
//! chroma classify '#1a1a1a'
//! ```

use std::path::PathBuf;

use chroma_color::Space;
use chroma_palette::PaletteFormat;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

/// Generate terminal color themes from images.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "chroma",
    author,
    version,
    about = "Generate terminal color themes from images",
    long_about = "Extracts an image's colors with ImageMagick, sorts them into named \
                  slots by HSL rules, and derives whatever the image does not provide."
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    ///
    /// `RUST_LOG` takes precedence when set
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate a palette from an image
    Generate(GenerateArgs),

    /// Print the rule table
    Rules(RulesArgs),

    /// Convert a hex color to another space
    Convert(ConvertArgs),

    /// Print the slot a color is classified into
    Classify(ClassifyArgs),
}

/// Arguments for `chroma generate`.
#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    /// Source image
    pub image: PathBuf,

    /// Configuration file (`.toml` or `.json`)
    #[arg(long, short = 'c', env = "CHROMA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the palette here instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Output format; inferred from --output's extension, else lua
    #[arg(long, short = 'f', value_enum)]
    pub format: Option<OutputFormat>,

    /// Edge length the image is resized to on the first pass
    #[arg(long)]
    pub size: Option<u32>,

    /// Bits per channel
    #[arg(long)]
    pub depth: Option<u32>,

    /// Colors read on the first pass
    #[arg(long)]
    pub max_colors: Option<usize>,

    /// Extraction passes before giving up
    #[arg(long)]
    pub attempts: Option<u32>,

    /// ImageMagick program
    #[arg(long, env = "CHROMA_MAGICK")]
    pub magick: Option<String>,

    /// Kill the extraction after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the generation report as JSON to stderr
    #[arg(long)]
    pub report: bool,
}

/// Arguments for `chroma rules`.
#[derive(Parser, Debug, Clone)]
pub struct RulesArgs {
    /// Print the rules of this configuration instead of the defaults
    #[arg(long, short = 'c', env = "CHROMA_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, short = 'f', value_enum, default_value = "toml")]
    pub format: RulesFormat,
}

/// Arguments for `chroma convert`.
#[derive(Parser, Debug, Clone)]
pub struct ConvertArgs {
    /// Hex color, with or without `#`
    pub color: String,

    /// Target space
    #[arg(long, short = 't', value_enum)]
    pub to: Target,

    /// Print integer components (degrees, percent, 0-255)
    #[arg(long, conflicts_with = "normalize")]
    pub denormalize: bool,

    /// Print unit-interval components
    #[arg(long)]
    pub normalize: bool,
}

/// Arguments for `chroma classify`.
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Hex color, with or without `#`
    pub color: String,

    /// Classify against this configuration's rules
    #[arg(long, short = 'c', env = "CHROMA_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Palette output formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lua module returning a table
    Lua,
    Json,
    Toml,
}

impl From<OutputFormat> for PaletteFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Lua => Self::Lua,
            OutputFormat::Json => Self::Json,
            OutputFormat::Toml => Self::Toml,
        }
    }
}

/// Rule table output formats.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RulesFormat {
    #[default]
    Toml,
    Json,
}

/// Color spaces accepted by `convert --to`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Hex,
    Rgb,
    Hsl,
}

impl From<Target> for Space {
    fn from(target: Target) -> Self {
        match target {
            Target::Hex => Self::Hex,
            Target::Rgb => Self::Rgb,
            Target::Hsl => Self::Hsl,
        }
    }
}

impl Cli {
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Log level for the verbosity count.
    #[must_use]
    pub const fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
