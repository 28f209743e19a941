//! Palette generation: extract, classify, derive, retry.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use chroma_color::{Color, Hex};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extract::{ExtractError, ExtractRequest, Extractor};
use crate::matcher::classify;
use crate::palette::Palette;
use crate::recipes::{DeriveContext, SlotPlan};
use crate::rules::ConditionMap;

/// Minimum foreground/background contrast before a warning is raised (WCAG AA).
pub const MIN_CONTRAST: f64 = 4.5;

/// Slot that never survives into a finished palette.
const TRANSIENT_SLOT: &str = "bright_accent";

/// Extraction parameters and the retry policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Edge length the image is resized to on the first attempt.
    pub image_size: u32,
    /// Bits per channel.
    pub depth: u32,
    /// Colors read from the histogram on the first attempt.
    pub max_colors: usize,
    /// Extraction passes before giving up. `0` is treated as `1`;
    /// [`ChromaConfig::validate`](crate::ChromaConfig::validate) rejects it.
    pub max_attempts: u32,
    /// Factor applied to `image_size` after a failed attempt.
    pub size_growth: f64,
    /// Factor applied to `max_colors` after a failed attempt.
    pub colors_growth: f64,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            image_size: 256,
            depth: 8,
            max_colors: 1024,
            max_attempts: 5,
            size_growth: 1.1,
            colors_growth: 1.5,
        }
    }
}

/// Error produced by [`Generator::generate`].
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Extraction(#[from] ExtractError),
    #[error(
        "could not fill {} slot(s) after {attempts} attempt(s) (last image size {image_size}, max colors {max_colors}): {}",
        missing.len(),
        missing.join(", ")
    )]
    Exhausted {
        attempts: u32,
        missing: Vec<String>,
        image_size: u32,
        max_colors: usize,
    },
}

/// A non-fatal observation made while generating.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationWarning {
    /// No extracted color was saturated and light enough; the first was used.
    NoProminentColor { fallback: Hex },
    /// An attempt left slots unfilled and was retried with wider parameters.
    IncompleteAttempt { attempt: u32, missing: Vec<String> },
    /// Foreground and background contrast below [`MIN_CONTRAST`].
    LowContrast {
        foreground: Hex,
        background: Hex,
        ratio: f64,
    },
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoProminentColor { fallback } => {
                write!(f, "no prominent color found, using {fallback}")
            }
            Self::IncompleteAttempt { attempt, missing } => write!(
                f,
                "attempt {attempt} left {} slot(s) unfilled: {}",
                missing.len(),
                missing.join(", ")
            ),
            Self::LowContrast {
                foreground,
                background,
                ratio,
            } => write!(
                f,
                "foreground {foreground} on background {background} has contrast {ratio:.2}:1"
            ),
        }
    }
}

/// How a generation went.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Extraction passes used, including the successful one.
    pub attempts: u32,
    /// Image size of the successful pass.
    pub image_size: u32,
    /// Max colors of the successful pass.
    pub max_colors: usize,
    pub prominent: Hex,
    /// Slots filled from the image, in the order they were found.
    pub classified: Vec<String>,
    /// Slots filled by a derivation, in plan order.
    pub derived: Vec<String>,
    pub warnings: Vec<GenerationWarning>,
}

/// A finished palette and its report.
#[derive(Debug, Clone)]
pub struct Generation {
    pub palette: Palette,
    pub report: GenerationReport,
}

/// The outcome of one deterministic pass over a raw color list.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Required slots in plan order, then other classified slots.
    pub palette: Palette,
    pub prominent: Hex,
    /// `true` if no color qualified and the first raw color was used.
    pub prominent_fallback: bool,
    pub classified: Vec<String>,
    pub derived: Vec<String>,
    /// Required slots left empty.
    pub missing: Vec<String>,
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Builds palettes from images.
///
/// # Example
///
/// ```rust
/// use chroma_color::Hex;
/// use chroma_palette::{ConditionMap, Generator, GeneratorOptions};
///
/// let generator = Generator::new(GeneratorOptions::default(), ConditionMap::default());
/// let raw = [Hex::parse("#1a1a1a").unwrap(), Hex::parse("#3366cc").unwrap()];
/// let resolution = generator.resolve(&raw).unwrap();
/// assert!(resolution.is_complete());
/// assert_eq!(resolution.palette.get("black").unwrap().as_str(), "#1a1a1a");
/// ```
#[derive(Debug)]
pub struct Generator {
    options: GeneratorOptions,
    conditions: ConditionMap,
    plan: SlotPlan,
}

impl Generator {
    /// A generator for the standard slot plan.
    pub fn new(options: GeneratorOptions, conditions: ConditionMap) -> Self {
        Self {
            options,
            conditions,
            plan: SlotPlan::standard(),
        }
    }

    /// Replaces the slot plan.
    #[must_use]
    pub fn with_plan(mut self, plan: SlotPlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn conditions(&self) -> &ConditionMap {
        &self.conditions
    }

    pub fn plan(&self) -> &SlotPlan {
        &self.plan
    }

    /// Extracts colors from `image` and builds a complete palette, widening the
    /// extraction after each incomplete attempt.
    ///
    /// # Errors
    /// * [`GenerateError::Extraction`] if the extractor fails or returns nothing.
    /// * [`GenerateError::Exhausted`] if slots are still missing after
    ///   `max_attempts` passes (at least one pass always runs, and the
    ///   reported `attempts` is the number actually run).
    pub fn generate<E>(&self, extractor: &E, image: &Path) -> Result<Generation, GenerateError>
    where
        E: Extractor + ?Sized,
    {
        let max_attempts = self.options.max_attempts.max(1);
        let mut size = self.options.image_size;
        let mut max_colors = self.options.max_colors;
        let mut warnings = Vec::new();
        let mut missing = Vec::new();

        for attempt in 1..=max_attempts {
            let request = ExtractRequest {
                image,
                size,
                depth: self.options.depth,
                max_colors,
            };
            info!(attempt, size, max_colors, image = %image.display(), "extracting colors");
            let raw = extractor.extract(&request)?;
            let resolution = self.resolve(&raw)?;

            if resolution.is_complete() {
                if resolution.prominent_fallback {
                    warnings.push(GenerationWarning::NoProminentColor {
                        fallback: resolution.prominent.clone(),
                    });
                }
                warnings.extend(contrast_warning(&resolution.palette));
                for warning in &warnings {
                    warn!(%warning, "generation warning");
                }
                info!(
                    attempt,
                    slots = resolution.palette.len(),
                    classified = resolution.classified.len(),
                    derived = resolution.derived.len(),
                    "palette complete"
                );
                return Ok(Generation {
                    palette: resolution.palette,
                    report: GenerationReport {
                        attempts: attempt,
                        image_size: size,
                        max_colors,
                        prominent: resolution.prominent,
                        classified: resolution.classified,
                        derived: resolution.derived,
                        warnings,
                    },
                });
            }

            missing = resolution.missing;
            warnings.push(GenerationWarning::IncompleteAttempt {
                attempt,
                missing: missing.clone(),
            });
            if attempt < max_attempts {
                size = grow(size, self.options.size_growth);
                max_colors = grow_usize(max_colors, self.options.colors_growth);
                debug!(size, max_colors, "widening extraction");
            }
        }

        Err(GenerateError::Exhausted {
            attempts: max_attempts,
            missing,
            image_size: size,
            max_colors,
        })
    }

    /// Runs one pass over an already extracted color list: prominent color
    /// selection, classification, then derivation of the remaining slots.
    ///
    /// # Errors
    /// Returns [`GenerateError::Extraction`] if `raw` is empty.
    pub fn resolve(&self, raw: &[Hex]) -> Result<Resolution, GenerateError> {
        let (prominent, prominent_fallback) = select_prominent(raw).ok_or_else(|| {
            ExtractError::ExtractionFailed("extractor returned no colors".into())
        })?;
        debug!(%prominent, fallback = prominent_fallback, "selected prominent color");

        let mut working = Palette::new();
        let mut assigned: HashSet<String> = HashSet::new();
        let mut classified = Vec::new();

        for hex in raw {
            let color = Color::Hex(hex.clone());
            let Some(name) = classify(&color, &self.conditions, &assigned) else {
                continue;
            };
            debug!(slot = %name, color = %hex, "classified");
            working.insert(name, hex.clone());
            assigned.insert(name.to_string());
            classified.push(name.to_string());

            if name != "accent" {
                let bright_name = format!("bright_{name}");
                let bright = color.lighten(0.1).to_hex();
                debug!(slot = %bright_name, color = %bright, "brightened classified slot");
                working.insert(bright_name.clone(), bright);
                assigned.insert(bright_name);
            }
        }

        let mut derived = Vec::new();
        let mut missing = Vec::new();
        for slot in &self.plan {
            if working.contains(slot.name()) {
                continue;
            }
            let value = {
                let ctx = DeriveContext::new(&prominent, &working, &self.conditions);
                slot.derive(&ctx)
            };
            match value {
                Some(color) => {
                    let hex = color.to_hex();
                    debug!(slot = %slot.name(), color = %hex, "derived");
                    working.insert(slot.name(), hex);
                    derived.push(slot.name().to_string());
                }
                None => {
                    debug!(slot = %slot.name(), "slot could not be filled");
                    missing.push(slot.name().to_string());
                }
            }
        }

        working.remove(TRANSIENT_SLOT);

        let mut palette = Palette::new();
        for name in self.plan.names() {
            if let Some(hex) = working.get(name) {
                palette.insert(name, hex.clone());
            }
        }
        for (name, hex) in working.iter() {
            if !palette.contains(name) {
                palette.insert(name, hex.clone());
            }
        }

        Ok(Resolution {
            palette,
            prominent,
            prominent_fallback,
            classified,
            derived,
            missing,
        })
    }
}

/// First color with normalized saturation above 0.4 and lightness above 0.25,
/// else the first color. The flag is `true` for the fallback.
pub fn select_prominent(raw: &[Hex]) -> Option<(Hex, bool)> {
    let found = raw.iter().find(|hex| {
        let hsl = Color::Hex((*hex).clone()).to_hsl();
        hsl.s() > 0.4 && hsl.l() > 0.25
    });
    match found {
        Some(hex) => Some((hex.clone(), false)),
        None => raw.first().map(|hex| (hex.clone(), true)),
    }
}

fn contrast_warning(palette: &Palette) -> Option<GenerationWarning> {
    let foreground = palette.get("foreground")?;
    let background = palette.get("background")?;
    let ratio = Color::Hex(foreground.clone()).contrast_ratio(&Color::Hex(background.clone()));
    (ratio < MIN_CONTRAST).then(|| GenerationWarning::LowContrast {
        foreground: foreground.clone(),
        background: background.clone(),
        ratio,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn grow(value: u32, factor: f64) -> u32 {
    (f64::from(value) * factor) as u32
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn grow_usize(value: usize, factor: f64) -> usize {
    (value as f64 * factor) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Hex {
        Hex::parse(s).unwrap()
    }

    #[test]
    fn test_defaults() {
        let opts = GeneratorOptions::default();
        assert_eq!(opts.image_size, 256);
        assert_eq!(opts.depth, 8);
        assert_eq!(opts.max_colors, 1024);
        assert_eq!(opts.max_attempts, 5);
    }

    #[test]
    fn test_growth_truncates() {
        assert_eq!(grow(256, 1.1), 281);
        assert_eq!(grow_usize(1024, 1.5), 1536);
        assert_eq!(grow_usize(3, 1.5), 4);
    }

    #[test]
    fn test_select_prominent() {
        let raw = [hex("#1a1a1a"), hex("#3366cc"), hex("#ff0000")];
        assert_eq!(select_prominent(&raw), Some((hex("#3366cc"), false)));

        let dull = [hex("#1a1a1a"), hex("#f0f0f0")];
        assert_eq!(select_prominent(&dull), Some((hex("#1a1a1a"), true)));

        assert_eq!(select_prominent(&[]), None);
    }

    #[test]
    fn test_resolve_empty_is_extraction_error() {
        let generator = Generator::new(GeneratorOptions::default(), ConditionMap::default());
        assert!(matches!(
            generator.resolve(&[]),
            Err(GenerateError::Extraction(ExtractError::ExtractionFailed(_)))
        ));
    }

    #[test]
    fn test_resolve_drops_bright_accent() {
        let plan = SlotPlan::new()
            .required("accent")
            .derived("bright_accent", |ctx| Some(ctx.prominent().lighten(0.1)));
        let generator = Generator::new(GeneratorOptions::default(), ConditionMap::default())
            .with_plan(plan);
        let resolution = generator.resolve(&[hex("#ff2222")]).unwrap();
        assert!(resolution.palette.contains("accent"));
        assert_eq!(resolution.derived, ["bright_accent"]);
        assert!(!resolution.palette.contains("bright_accent"));
    }

    #[test]
    fn test_resolve_reports_missing_required() {
        let generator = Generator::new(GeneratorOptions::default(), ConditionMap::default())
            .with_plan(SlotPlan::new().required("pink"));
        let resolution = generator.resolve(&[hex("#808080")]).unwrap();
        assert_eq!(resolution.missing, ["pink"]);
        assert!(!resolution.is_complete());
    }

    #[test]
    fn test_warning_display() {
        let w = GenerationWarning::IncompleteAttempt {
            attempt: 2,
            missing: vec!["red".into(), "blue".into()],
        };
        assert_eq!(w.to_string(), "attempt 2 left 2 slot(s) unfilled: red, blue");
    }

    #[test]
    fn test_contrast_warning() {
        let palette: Palette = [("foreground", hex("#777777")), ("background", hex("#666666"))]
            .into_iter()
            .collect();
        assert!(matches!(
            contrast_warning(&palette),
            Some(GenerationWarning::LowContrast { .. })
        ));

        let palette: Palette = [("foreground", hex("#ffffff")), ("background", hex("#000000"))]
            .into_iter()
            .collect();
        assert_eq!(contrast_warning(&palette), None);
    }
}
