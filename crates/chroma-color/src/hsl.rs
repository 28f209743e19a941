//! HSL triples.

use crate::error::Result;
use crate::rgb::Rgb;
use crate::scale::{
    Denormalized, Normalized, Scale, check_int, check_unit, clamp_unit, denormalize_channel,
    normalize_channel,
};

/// Maximum denormalized hue, in degrees.
pub const HUE_MAX: u16 = 360;

/// Maximum denormalized saturation and lightness, in percent.
pub const PERCENT_MAX: u16 = 100;

/// An HSL color in either scale.
///
/// Denormalized hue is in degrees (`0..=360`), saturation and lightness in
/// percent (`0..=100`). The normalized form maps all three into `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl<S: Scale = Denormalized> {
    h: S::Value,
    s: S::Value,
    l: S::Value,
}

impl<S: Scale> Hsl<S> {
    /// Hue.
    pub fn h(&self) -> S::Value {
        self.h
    }

    /// Saturation.
    pub fn s(&self) -> S::Value {
        self.s
    }

    /// Lightness.
    pub fn l(&self) -> S::Value {
        self.l
    }

    /// `[h, s, l]`.
    pub fn components(&self) -> [S::Value; 3] {
        [self.h, self.s, self.l]
    }

    pub fn is_normalized(&self) -> bool {
        S::NORMALIZED
    }
}

impl Hsl<Denormalized> {
    /// Creates a denormalized color.
    ///
    /// # Errors
    /// Returns `OutOfRange` if hue exceeds 360 or saturation/lightness exceed 100.
    pub fn new(h: u16, s: u16, l: u16) -> Result<Self> {
        Ok(Self {
            h: check_int("h", h, HUE_MAX)?,
            s: check_int("s", s, PERCENT_MAX)?,
            l: check_int("l", l, PERCENT_MAX)?,
        })
    }

    /// Creates a denormalized color, clamping each component to its bound.
    pub fn saturating(h: u16, s: u16, l: u16) -> Self {
        Self {
            h: h.min(HUE_MAX),
            s: s.min(PERCENT_MAX),
            l: l.min(PERCENT_MAX),
        }
    }

    pub fn normalize(self) -> Hsl<Normalized> {
        Hsl {
            h: normalize_channel(self.h, HUE_MAX),
            s: normalize_channel(self.s, PERCENT_MAX),
            l: normalize_channel(self.l, PERCENT_MAX),
        }
    }

    pub fn denormalize(self) -> Self {
        self
    }
}

impl Hsl<Normalized> {
    /// Creates a normalized color.
    ///
    /// # Errors
    /// Returns `OutOfRange` if any component is outside `[0.0, 1.0]` or NaN.
    pub fn from_unit(h: f64, s: f64, l: f64) -> Result<Self> {
        Ok(Self {
            h: check_unit("h", h)?,
            s: check_unit("s", s)?,
            l: check_unit("l", l)?,
        })
    }

    pub(crate) fn clamped(h: f64, s: f64, l: f64) -> Self {
        Self {
            h: clamp_unit(h),
            s: clamp_unit(s),
            l: clamp_unit(l),
        }
    }

    pub fn normalize(self) -> Self {
        self
    }

    /// Scales back to degrees and percent, truncating.
    pub fn denormalize(self) -> Hsl<Denormalized> {
        Hsl {
            h: denormalize_channel(self.h, HUE_MAX),
            s: denormalize_channel(self.s, PERCENT_MAX),
            l: denormalize_channel(self.l, PERCENT_MAX),
        }
    }

    /// Returns a copy with the hue replaced, clamped into `[0.0, 1.0]`.
    #[must_use]
    pub fn with_hue(self, h: f64) -> Self {
        Self::clamped(h, self.s, self.l)
    }

    /// Returns a copy with the saturation replaced, clamped into `[0.0, 1.0]`.
    #[must_use]
    pub fn with_saturation(self, s: f64) -> Self {
        Self::clamped(self.h, s, self.l)
    }

    /// Returns a copy with the lightness replaced, clamped into `[0.0, 1.0]`.
    #[must_use]
    pub fn with_lightness(self, l: f64) -> Self {
        Self::clamped(self.h, self.s, l)
    }

    /// Converts to normalized RGB with the standard cylindrical transform.
    pub fn to_rgb(&self) -> Rgb<Normalized> {
        let (h, s, l) = (self.h, self.s, self.l);
        if s == 0.0 {
            return Rgb::clamped(l, l, l);
        }

        let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let m1 = 2.0f64.mul_add(l, -m2);

        Rgb::clamped(
            hue_channel(m1, m2, h + 1.0 / 3.0),
            hue_channel(m1, m2, h),
            hue_channel(m1, m2, h - 1.0 / 3.0),
        )
    }
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        (m2 - m1).mul_add(hue * 6.0, m1)
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        (m2 - m1).mul_add((2.0 / 3.0 - hue) * 6.0, m1)
    } else {
        m1
    }
}
