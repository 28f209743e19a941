//! Subcommand implementations.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chroma_color::{Color, Space};
use chroma_palette::{
    ChromaConfig, ConditionMap, Magick, PaletteFormat, classify, render_palette,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{ClassifyArgs, Cli, Command, ConvertArgs, GenerateArgs, RulesArgs, RulesFormat};

/// Runs the parsed command, writing results to `out`.
///
/// # Errors
///
/// Returns an error if the command fails.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Command::Generate(args) => generate(args, out),
        Command::Rules(args) => rules(args, out),
        Command::Convert(args) => convert(args, out),
        Command::Classify(args) => classify_color(args, out),
    }
}

/// Loads a configuration file, or the defaults when none is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&Path>) -> Result<ChromaConfig> {
    match path {
        Some(path) => ChromaConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ChromaConfig::default()),
    }
}

/// Applies command-line overrides on top of the loaded configuration.
pub fn apply_overrides(config: &mut ChromaConfig, args: &GenerateArgs) {
    let generator = &mut config.generator;
    if let Some(size) = args.size {
        generator.image_size = size;
    }
    if let Some(depth) = args.depth {
        generator.depth = depth;
    }
    if let Some(max_colors) = args.max_colors {
        generator.max_colors = max_colors;
    }
    if let Some(attempts) = args.attempts {
        generator.max_attempts = attempts;
    }
    if let Some(program) = &args.magick {
        config.extractor.program.clone_from(program);
    }
    if args.timeout.is_some() {
        config.extractor.timeout_secs = args.timeout;
    }
}

fn generate(args: &GenerateArgs, out: &mut impl Write) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, args);
    config.validate().context("invalid generator options")?;

    let image = &args.image;
    if !image.is_file() {
        bail!("image not found: {}", image.display());
    }

    let magick = Magick::new(config.extractor.clone());
    let generation = config
        .generator()
        .generate(&magick, image)
        .with_context(|| format!("failed to generate a palette from {}", image.display()))?;

    if args.report {
        let report = serde_json::to_string_pretty(&generation.report)?;
        eprintln!("{report}");
    }

    let format = args
        .format
        .map(PaletteFormat::from)
        .or_else(|| args.output.as_deref().and_then(PaletteFormat::from_path))
        .unwrap_or_default();
    let text = render_palette(&generation.palette, format)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), %format, slots = generation.palette.len(), "wrote palette");
        }
        None => out.write_all(text.as_bytes())?,
    }
    Ok(())
}

/// The `[[rule]]` table of a configuration file.
#[derive(Serialize)]
struct RuleTable<'a> {
    rule: &'a ConditionMap,
}

fn rules(args: &RulesArgs, out: &mut impl Write) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let table = RuleTable {
        rule: &config.rules,
    };
    let text = match args.format {
        RulesFormat::Toml => toml::to_string(&table)?,
        RulesFormat::Json => {
            let mut json = serde_json::to_string_pretty(&table)?;
            json.push('\n');
            json
        }
    };
    out.write_all(text.as_bytes())?;
    Ok(())
}

fn convert(args: &ConvertArgs, out: &mut impl Write) -> Result<()> {
    let color = Color::parse(&args.color)
        .with_context(|| format!("invalid color '{}'", args.color))?;
    let mut converted = color.convert(args.to.into());
    if converted.space() != Space::Hex {
        if args.denormalize {
            converted = converted.denormalize()?;
        } else if args.normalize {
            converted = converted.normalize()?;
        }
    }
    debug!(from = %args.color, to = ?converted, "converted");
    writeln!(out, "{}", describe(&converted))?;
    Ok(())
}

fn classify_color(args: &ClassifyArgs, out: &mut impl Write) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let color = Color::parse(&args.color)
        .with_context(|| format!("invalid color '{}'", args.color))?;
    let slot = classify(&color, &config.rules, &HashSet::new());
    writeln!(out, "{}", slot.unwrap_or("none"))?;
    Ok(())
}

/// One-line description of a color in its own space and scale.
pub fn describe(color: &Color) -> String {
    match color {
        Color::Hex(hex) => hex.to_string(),
        Color::Rgb(rgb) => {
            let [r, g, b] = rgb.components();
            format!("rgb({r}, {g}, {b})")
        }
        Color::NormalizedRgb(rgb) => {
            let [r, g, b] = rgb.components();
            format!("rgb({r:.4}, {g:.4}, {b:.4})")
        }
        Color::Hsl(hsl) => {
            let [h, s, l] = hsl.components();
            format!("hsl({h}, {s}, {l})")
        }
        Color::NormalizedHsl(hsl) => {
            let [h, s, l] = hsl.components();
            format!("hsl({h:.4}, {s:.4}, {l:.4})")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("chroma").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        run(&cli, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn convert_to_rgb_is_denormalized() {
        assert_eq!(
            run_args(&["convert", "#3366cc", "--to", "rgb"]).unwrap(),
            "rgb(51, 102, 204)\n"
        );
    }

    #[test]
    fn convert_to_hsl_is_normalized_unless_asked() {
        assert_eq!(
            run_args(&["convert", "ff0000", "--to", "hsl"]).unwrap(),
            "hsl(0.0000, 1.0000, 0.5000)\n"
        );
        assert_eq!(
            run_args(&["convert", "ff0000", "--to", "hsl", "--denormalize"]).unwrap(),
            "hsl(0, 100, 50)\n"
        );
    }

    #[test]
    fn convert_to_hex_ignores_scale_flags() {
        assert_eq!(
            run_args(&["convert", "3366CC", "--to", "hex", "--normalize"]).unwrap(),
            "#3366cc\n"
        );
    }

    #[test]
    fn convert_rejects_bad_color() {
        let err = run_args(&["convert", "#12345", "--to", "rgb"]).unwrap_err();
        assert!(err.to_string().contains("invalid color"));
    }

    #[test]
    fn classify_prints_slot_or_none() {
        assert_eq!(run_args(&["classify", "#1a1a1a"]).unwrap(), "black\n");
        assert_eq!(run_args(&["classify", "#ff2222"]).unwrap(), "accent\n");
        assert_eq!(run_args(&["classify", "#808080"]).unwrap(), "none\n");
    }

    #[test]
    fn rules_round_trip_through_config() {
        let text = run_args(&["rules"]).unwrap();
        let config = ChromaConfig::from_toml(&text).unwrap();
        assert_eq!(config.rules, ConditionMap::default());

        let json = run_args(&["rules", "--format", "json"]).unwrap();
        let config = ChromaConfig::from_json(&json).unwrap();
        assert_eq!(config.rules, ConditionMap::default());
    }

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::try_parse_from([
            "chroma", "generate", "a.png", "--size", "300", "--magick", "convert", "--timeout",
            "9",
        ])
        .unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("Expected Generate command");
        };
        let mut config = ChromaConfig::default();
        apply_overrides(&mut config, &args);
        assert_eq!(config.generator.image_size, 300);
        assert_eq!(config.generator.depth, 8);
        assert_eq!(config.extractor.program, "convert");
        assert_eq!(config.extractor.timeout_secs, Some(9));
    }

    #[test]
    fn generate_rejects_missing_image() {
        let err = run_args(&["generate", "/nonexistent/wall.png"]).unwrap_err();
        assert!(err.to_string().contains("image not found"));
    }

    #[test]
    fn generate_rejects_invalid_overrides() {
        let err = run_args(&["generate", "a.png", "--attempts", "0"]).unwrap_err();
        assert!(err.to_string().contains("invalid generator options"));
    }
}
