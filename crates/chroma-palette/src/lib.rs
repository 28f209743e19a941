#![forbid(unsafe_code)]
// Allow these clippy lints for palette generation code
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::new_without_default)]
#![allow(clippy::float_cmp)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

//! # Chroma Palette
//!
//! Derives a terminal color theme from an image.
//!
//! Generation runs in one pass per attempt:
//! 1. An [`Extractor`] lists the image's colors, most frequent first.
//! 2. The first saturated, reasonably light color becomes the prominent color.
//! 3. Each color is [`classify`]'d against a [`ConditionMap`]; the first rule
//!    it satisfies names its slot.
//! 4. Slots still empty are built by the [`SlotPlan`]'s derivations from the
//!    prominent color and earlier slots, then [`coerce`]d into their rule.
//!
//! If a required slot is still empty, extraction is retried with a larger
//! image and more colors.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use chroma_palette::{ChromaConfig, Magick, PaletteFormat, render_palette};
//!
//! let config = ChromaConfig::default();
//! let magick = Magick::new(config.extractor.clone());
//! let generation = config.generator().generate(&magick, Path::new("wall.png"))?;
//! print!("{}", render_palette(&generation.palette, PaletteFormat::Lua)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Testing without ImageMagick
//!
//! Any `Fn(&ExtractRequest) -> Result<Vec<Hex>, ExtractError>` is an
//! [`Extractor`]:
//!
//! ```rust
//! use std::path::Path;
//! use chroma_color::Hex;
//! use chroma_palette::{ChromaConfig, ExtractError, ExtractRequest};
//!
//! let fixed = |_: &ExtractRequest<'_>| -> Result<Vec<Hex>, ExtractError> {
//!     Ok(vec![Hex::parse("#3366cc").unwrap()])
//! };
//! let generation = ChromaConfig::default()
//!     .generator()
//!     .generate(&fixed, Path::new("unused.png"))
//!     .unwrap();
//! assert_eq!(generation.palette.len(), 29);
//! ```

pub mod config;
pub mod extract;
pub mod generator;
pub mod matcher;
pub mod palette;
pub mod recipes;
pub mod render;
pub mod rules;

pub use config::{ChromaConfig, ConfigError, ValidationError};
pub use extract::{
    ExtractError, ExtractRequest, Extractor, Magick, MagickOptions, parse_histogram,
};
pub use generator::{
    GenerateError, Generation, GenerationReport, GenerationWarning, Generator, GeneratorOptions,
    MIN_CONTRAST, Resolution, select_prominent,
};
pub use matcher::{classify, coerce};
pub use palette::Palette;
pub use recipes::{DeriveContext, Derivation, HUE_SEEDS, Slot, SlotPlan};
pub use render::{PaletteFormat, RenderError, render_palette};
pub use rules::{Band, Channel, ConditionMap, Field, HslCondition, Rule, RuleError};
