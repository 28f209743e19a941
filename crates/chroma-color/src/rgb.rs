//! RGB triples.

use crate::error::Result;
use crate::hex::Hex;
use crate::hsl::Hsl;
use crate::scale::{
    Denormalized, Normalized, Scale, check_int, check_unit, clamp_unit, denormalize_channel,
    normalize_channel,
};

/// Maximum of a denormalized RGB channel.
pub const RGB_MAX: u16 = 255;

/// An RGB color in either scale.
///
/// `Rgb` (the default, [`Denormalized`]) holds integer channels in `0..=255`;
/// `Rgb<Normalized>` holds float channels in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb<S: Scale = Denormalized> {
    r: S::Value,
    g: S::Value,
    b: S::Value,
}

impl<S: Scale> Rgb<S> {
    /// Red channel.
    pub fn r(&self) -> S::Value {
        self.r
    }

    /// Green channel.
    pub fn g(&self) -> S::Value {
        self.g
    }

    /// Blue channel.
    pub fn b(&self) -> S::Value {
        self.b
    }

    /// All three channels.
    pub fn components(&self) -> [S::Value; 3] {
        [self.r, self.g, self.b]
    }

    /// Whether this triple holds float channels.
    pub fn is_normalized(&self) -> bool {
        S::NORMALIZED
    }
}

impl Rgb<Denormalized> {
    /// Creates a denormalized color.
    ///
    /// # Errors
    /// Returns `OutOfRange` if any channel exceeds 255.
    pub fn new(r: u16, g: u16, b: u16) -> Result<Self> {
        Ok(Self {
            r: check_int("r", r, RGB_MAX)?,
            g: check_int("g", g, RGB_MAX)?,
            b: check_int("b", b, RGB_MAX)?,
        })
    }

    /// Creates a denormalized color from bytes; always in range.
    pub fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: u16::from(r),
            g: u16::from(g),
            b: u16::from(b),
        }
    }

    /// Divides each channel by 255.
    pub fn normalize(self) -> Rgb<Normalized> {
        Rgb {
            r: normalize_channel(self.r, RGB_MAX),
            g: normalize_channel(self.g, RGB_MAX),
            b: normalize_channel(self.b, RGB_MAX),
        }
    }

    /// Already denormalized; returns `self`.
    pub fn denormalize(self) -> Self {
        self
    }

    /// Formats the channels as `#rrggbb`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_hex(&self) -> Hex {
        // Channels are validated to 0..=255 at construction.
        Hex::from_bytes(self.r as u8, self.g as u8, self.b as u8)
    }
}

impl Rgb<Normalized> {
    /// Creates a normalized color.
    ///
    /// # Errors
    /// Returns `OutOfRange` if any channel is outside `[0.0, 1.0]` or NaN.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Result<Self> {
        Ok(Self {
            r: check_unit("r", r)?,
            g: check_unit("g", g)?,
            b: check_unit("b", b)?,
        })
    }

    /// Builds a triple, clamping each channel into `[0.0, 1.0]`.
    pub(crate) fn clamped(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: clamp_unit(r),
            g: clamp_unit(g),
            b: clamp_unit(b),
        }
    }

    /// Already normalized; returns `self`.
    pub fn normalize(self) -> Self {
        self
    }

    /// Multiplies each channel by 255 and truncates.
    pub fn denormalize(self) -> Rgb<Denormalized> {
        Rgb {
            r: denormalize_channel(self.r, RGB_MAX),
            g: denormalize_channel(self.g, RGB_MAX),
            b: denormalize_channel(self.b, RGB_MAX),
        }
    }

    /// Converts to normalized HSL with the standard cylindrical transform.
    #[allow(clippy::many_single_char_names)]
    pub fn to_hsl(&self) -> Hsl<Normalized> {
        let (r, g, b) = (self.r, self.g, self.b);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = f64::midpoint(max, min);

        if max == min {
            return Hsl::clamped(0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l <= 0.5 {
            d / (max + min)
        } else {
            d / (2.0 - max - min)
        };

        let h = if max == r {
            (g - b) / d
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl::clamped((h / 6.0).rem_euclid(1.0), s, l)
    }

    /// Linear interpolation toward `other`: `(1 - ratio) * self + ratio * other`.
    pub fn mix(&self, other: &Self, ratio: f64) -> Self {
        let lerp = |a: f64, b: f64| (1.0 - ratio).mul_add(a, ratio * b);
        Self::clamped(
            lerp(self.r, other.r),
            lerp(self.g, other.g),
            lerp(self.b, other.b),
        )
    }

    /// WCAG relative luminance.
    pub fn relative_luminance(&self) -> f64 {
        fn linear(c: f64) -> f64 {
            if c <= 0.039_28 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126f64.mul_add(
            linear(self.r),
            0.7152f64.mul_add(linear(self.g), 0.0722 * linear(self.b)),
        )
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::from_bytes(r, g, b)
    }
}
