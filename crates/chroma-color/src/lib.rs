#![forbid(unsafe_code)]
// Allow these clippy lints for numeric color code
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]

//! # Chroma Color
//!
//! Color values in three representations: canonical hex strings, RGB, and HSL.
//!
//! RGB and HSL carry their scale in the type. `Rgb` and `Hsl` hold integer
//! components (0..=255 for RGB, degrees and percent for HSL); `Rgb<Normalized>`
//! and `Hsl<Normalized>` hold floats in `[0.0, 1.0]`. The [`Color`] enum ties
//! the five concrete forms together and provides the tonal operations used by
//! palette generation.
//!
//! ## Quick Start
//!
//! ```rust
//! use chroma_color::{Color, Space};
//!
//! let base = Color::parse("1A1A1A").unwrap();
//! let bright = base.lighten(0.1);
//! assert_eq!(bright.render().unwrap(), "#333333");
//!
//! // Conversions never lose information at integer precision.
//! let back = base.convert(Space::Hsl).convert(Space::Hex);
//! assert_eq!(back, base);
//! ```
//!
//! ## Blending
//!
//! `blend` mixes in RGB and always returns the left operand's encoding:
//!
//! ```rust
//! use chroma_color::Color;
//!
//! let black = Color::parse("#000000").unwrap();
//! let white = Color::parse("#ffffff").unwrap();
//! assert_eq!(black.blend(&white, 0.5).render().unwrap(), "#7f7f7f");
//! ```

pub mod color;
pub mod error;
pub mod hex;
pub mod hsl;
pub mod rgb;
pub mod scale;

pub use color::{Color, Encoding, Space};
pub use error::{ColorError, Result};
pub use hex::Hex;
pub use hsl::{HUE_MAX, Hsl, PERCENT_MAX};
pub use rgb::{RGB_MAX, Rgb};
pub use scale::{Component, Denormalized, Normalized, Scale};
