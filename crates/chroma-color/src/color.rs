//! The [`Color`] sum type and the operations shared by every representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ColorError, Result};
use crate::hex::Hex;
use crate::hsl::{HUE_MAX, Hsl, PERCENT_MAX};
use crate::rgb::{RGB_MAX, Rgb};
use crate::scale::{Component, Normalized, Triple, narrow};

/// A color space a [`Color`] can be declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Space {
    Hex,
    Rgb,
    Hsl,
}

impl Space {
    /// All spaces, in declaration order.
    pub const ALL: [Self; 3] = [Self::Hex, Self::Rgb, Self::Hsl];

    /// Lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Rgb => "rgb",
            Self::Hsl => "hsl",
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Space {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|space| space.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ColorError::UnsupportedConversion(s.to_string()))
    }
}

/// The declared space and scale of a color.
///
/// Tonal operations compute in normalized HSL or RGB and hand their result
/// back in the encoding of the color they were called on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Encoding {
    pub space: Space,
    /// Meaningless for [`Space::Hex`], which is always `false`.
    pub normalized: bool,
}

/// A color in one of the supported representations.
///
/// # Example
///
/// ```rust
/// use chroma_color::{Color, Space};
///
/// let accent = Color::parse("#3b82f6").unwrap();
/// let darker = accent.darken(0.2);
/// assert_eq!(darker.space(), Space::Hex);
///
/// let hsl = accent.convert(Space::Hsl);
/// assert!(hsl.is_normalized());
/// assert!(hsl.render().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    Hex(Hex),
    Rgb(Rgb),
    NormalizedRgb(Rgb<Normalized>),
    Hsl(Hsl),
    NormalizedHsl(Hsl<Normalized>),
}

impl Color {
    /// Parses a hex color.
    ///
    /// # Errors
    /// Returns [`ColorError::InvalidFormat`] for anything but six hex digits
    /// with an optional leading `#`.
    pub fn parse(s: &str) -> Result<Self> {
        Hex::parse(s).map(Self::Hex)
    }

    /// Builds an RGB or HSL color from a dynamically typed triple.
    ///
    /// Integer triples produce the denormalized form and float triples the
    /// normalized one.
    ///
    /// # Errors
    /// * [`ColorError::InconsistentComponents`] if ints and floats are mixed.
    /// * [`ColorError::OutOfRange`] if a component exceeds its channel bound.
    /// * [`ColorError::UnsupportedConversion`] for [`Space::Hex`].
    pub fn from_components(space: Space, components: [Component; 3]) -> Result<Self> {
        let triple = Triple::from_components(components)?;
        match (space, triple) {
            (Space::Hex, _) => Err(ColorError::UnsupportedConversion(space.to_string())),
            (Space::Rgb, Triple::Int([r, g, b])) => Ok(Self::Rgb(Rgb::new(
                narrow("r", r, RGB_MAX)?,
                narrow("g", g, RGB_MAX)?,
                narrow("b", b, RGB_MAX)?,
            )?)),
            (Space::Rgb, Triple::Float([r, g, b])) => {
                Ok(Self::NormalizedRgb(Rgb::from_unit(r, g, b)?))
            }
            (Space::Hsl, Triple::Int([h, s, l])) => Ok(Self::Hsl(Hsl::new(
                narrow("h", h, HUE_MAX)?,
                narrow("s", s, PERCENT_MAX)?,
                narrow("l", l, PERCENT_MAX)?,
            )?)),
            (Space::Hsl, Triple::Float([h, s, l])) => {
                Ok(Self::NormalizedHsl(Hsl::from_unit(h, s, l)?))
            }
        }
    }

    pub const fn space(&self) -> Space {
        match self {
            Self::Hex(_) => Space::Hex,
            Self::Rgb(_) | Self::NormalizedRgb(_) => Space::Rgb,
            Self::Hsl(_) | Self::NormalizedHsl(_) => Space::Hsl,
        }
    }

    pub const fn is_normalized(&self) -> bool {
        matches!(self, Self::NormalizedRgb(_) | Self::NormalizedHsl(_))
    }

    pub const fn encoding(&self) -> Encoding {
        Encoding {
            space: self.space(),
            normalized: self.is_normalized(),
        }
    }

    /// Converts to another space.
    ///
    /// Hex to RGB parses digit pairs into denormalized RGB. RGB and HSL convert
    /// into the normalized form of the target. Converting to hex denormalizes
    /// first. Converting to the current space returns an equal value.
    #[must_use]
    pub fn convert(&self, target: Space) -> Self {
        if self.space() == target {
            return self.clone();
        }
        match (self, target) {
            (Self::Hex(hex), Space::Rgb) => Self::Rgb(hex.to_rgb()),
            (_, Space::Hex) => Self::Hex(self.to_hex()),
            (_, Space::Rgb) => Self::NormalizedRgb(self.to_rgb()),
            (_, Space::Hsl) => Self::NormalizedHsl(self.to_hsl()),
        }
    }

    /// Moves an RGB or HSL color to its normalized form.
    ///
    /// # Errors
    /// Returns [`ColorError::UnsupportedOperation`] for hex colors.
    pub fn normalize(&self) -> Result<Self> {
        match self {
            Self::Hex(_) => Err(ColorError::UnsupportedOperation {
                operation: "normalize",
                space: Space::Hex,
            }),
            Self::Rgb(rgb) => Ok(Self::NormalizedRgb(rgb.normalize())),
            Self::Hsl(hsl) => Ok(Self::NormalizedHsl(hsl.normalize())),
            Self::NormalizedRgb(_) | Self::NormalizedHsl(_) => Ok(self.clone()),
        }
    }

    /// Moves an RGB or HSL color to its denormalized form, truncating.
    ///
    /// # Errors
    /// Returns [`ColorError::UnsupportedOperation`] for hex colors.
    pub fn denormalize(&self) -> Result<Self> {
        match self {
            Self::Hex(_) => Err(ColorError::UnsupportedOperation {
                operation: "denormalize",
                space: Space::Hex,
            }),
            Self::NormalizedRgb(rgb) => Ok(Self::Rgb(rgb.denormalize())),
            Self::NormalizedHsl(hsl) => Ok(Self::Hsl(hsl.denormalize())),
            Self::Rgb(_) | Self::Hsl(_) => Ok(self.clone()),
        }
    }

    /// Canonical hex form of this color.
    pub fn to_hex(&self) -> Hex {
        match self {
            Self::Hex(hex) => hex.clone(),
            Self::Rgb(rgb) => rgb.to_hex(),
            Self::NormalizedRgb(rgb) => rgb.denormalize().to_hex(),
            Self::Hsl(_) | Self::NormalizedHsl(_) => self.to_rgb().denormalize().to_hex(),
        }
    }

    /// Normalized RGB form of this color.
    pub fn to_rgb(&self) -> Rgb<Normalized> {
        match self {
            Self::Hex(hex) => hex.to_rgb().normalize(),
            Self::Rgb(rgb) => rgb.normalize(),
            Self::NormalizedRgb(rgb) => *rgb,
            Self::Hsl(hsl) => hsl.normalize().to_rgb(),
            Self::NormalizedHsl(hsl) => hsl.to_rgb(),
        }
    }

    /// Normalized HSL form of this color.
    pub fn to_hsl(&self) -> Hsl<Normalized> {
        match self {
            Self::Hsl(hsl) => hsl.normalize(),
            Self::NormalizedHsl(hsl) => *hsl,
            _ => self.to_rgb().to_hsl(),
        }
    }

    /// Re-expresses this color in the given encoding.
    #[must_use]
    pub fn with_encoding(&self, encoding: Encoding) -> Self {
        if self.encoding() == encoding {
            return self.clone();
        }
        match self {
            Self::Hsl(_) | Self::NormalizedHsl(_) => Self::from_hsl(self.to_hsl(), encoding),
            _ => Self::from_rgb(self.to_rgb(), encoding),
        }
    }

    fn from_hsl(hsl: Hsl<Normalized>, encoding: Encoding) -> Self {
        match (encoding.space, encoding.normalized) {
            (Space::Hsl, true) => Self::NormalizedHsl(hsl),
            (Space::Hsl, false) => Self::Hsl(hsl.denormalize()),
            _ => Self::from_rgb(hsl.to_rgb(), encoding),
        }
    }

    fn from_rgb(rgb: Rgb<Normalized>, encoding: Encoding) -> Self {
        match (encoding.space, encoding.normalized) {
            (Space::Hex, _) => Self::Hex(rgb.denormalize().to_hex()),
            (Space::Rgb, true) => Self::NormalizedRgb(rgb),
            (Space::Rgb, false) => Self::Rgb(rgb.denormalize()),
            (Space::Hsl, true) => Self::NormalizedHsl(rgb.to_hsl()),
            (Space::Hsl, false) => Self::Hsl(rgb.to_hsl().denormalize()),
        }
    }

    fn map_hsl(&self, f: impl FnOnce(Hsl<Normalized>) -> Hsl<Normalized>) -> Self {
        Self::from_hsl(f(self.to_hsl()), self.encoding())
    }

    /// Lowers normalized lightness by `amount`, clamped at 0.
    #[must_use]
    pub fn darken(&self, amount: f64) -> Self {
        self.map_hsl(|hsl| hsl.with_lightness(hsl.l() - amount))
    }

    /// Raises normalized lightness by `amount`, clamped at 1.
    #[must_use]
    pub fn lighten(&self, amount: f64) -> Self {
        self.map_hsl(|hsl| hsl.with_lightness(hsl.l() + amount))
    }

    #[must_use]
    pub fn saturate(&self, amount: f64) -> Self {
        self.map_hsl(|hsl| hsl.with_saturation(hsl.s() + amount))
    }

    #[must_use]
    pub fn desaturate(&self, amount: f64) -> Self {
        self.map_hsl(|hsl| hsl.with_saturation(hsl.s() - amount))
    }

    /// Mixes toward `other` in normalized RGB.
    ///
    /// `ratio = 0.0` yields `self`, `1.0` yields `other`. The result is always
    /// in `self`'s encoding, whatever space `other` was declared in.
    #[must_use]
    pub fn blend(&self, other: &Self, ratio: f64) -> Self {
        let mixed = self.to_rgb().mix(&other.to_rgb(), ratio);
        Self::from_rgb(mixed, self.encoding())
    }

    /// String form of a hex color.
    ///
    /// # Errors
    /// Returns [`ColorError::UnsupportedOperation`] for RGB and HSL colors;
    /// convert to hex first.
    pub fn render(&self) -> Result<String> {
        match self {
            Self::Hex(hex) => Ok(hex.to_string()),
            _ => Err(ColorError::UnsupportedOperation {
                operation: "render",
                space: self.space(),
            }),
        }
    }

    /// WCAG relative luminance in `[0.0, 1.0]`.
    pub fn relative_luminance(&self) -> f64 {
        self.to_rgb().relative_luminance()
    }

    /// WCAG contrast ratio, between 1 and 21.
    pub fn contrast_ratio(&self, other: &Self) -> f64 {
        let a = self.relative_luminance();
        let b = other.relative_luminance();
        (a.max(b) + 0.05) / (a.min(b) + 0.05)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Hex> for Color {
    fn from(hex: Hex) -> Self {
        Self::Hex(hex)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

impl From<Rgb<Normalized>> for Color {
    fn from(rgb: Rgb<Normalized>) -> Self {
        Self::NormalizedRgb(rgb)
    }
}

impl From<Hsl> for Color {
    fn from(hsl: Hsl) -> Self {
        Self::Hsl(hsl)
    }
}

impl From<Hsl<Normalized>> for Color {
    fn from(hsl: Hsl<Normalized>) -> Self {
        Self::NormalizedHsl(hsl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Color {
        Color::parse(s).unwrap()
    }

    #[test]
    fn test_space_from_str() {
        assert_eq!("HSL".parse::<Space>().unwrap(), Space::Hsl);
        assert_eq!("rgb".parse::<Space>().unwrap(), Space::Rgb);
        assert!(matches!(
            "lab".parse::<Space>(),
            Err(ColorError::UnsupportedConversion(name)) if name == "lab"
        ));
    }

    #[test]
    fn test_convert_hex_to_rgb_is_denormalized() {
        let rgb = hex("#ff8800").convert(Space::Rgb);
        assert_eq!(rgb, Color::Rgb(Rgb::new(255, 136, 0).unwrap()));
    }

    #[test]
    fn test_convert_rgb_to_hsl_is_normalized() {
        let hsl = Color::Rgb(Rgb::new(255, 0, 0).unwrap()).convert(Space::Hsl);
        assert_eq!(hsl, Color::NormalizedHsl(Hsl::from_unit(0.0, 1.0, 0.5).unwrap()));
    }

    #[test]
    fn test_convert_same_space_is_identity() {
        let c = Color::Hsl(Hsl::new(12, 34, 56).unwrap());
        assert_eq!(c.convert(Space::Hsl), c);
    }

    #[test]
    fn test_convert_round_trip() {
        let start = hex("#1a2b3c");
        let back = start
            .convert(Space::Rgb)
            .convert(Space::Hsl)
            .convert(Space::Rgb)
            .convert(Space::Hex);
        assert_eq!(back, start);
    }

    #[test]
    fn test_normalize_hex_unsupported() {
        assert!(matches!(
            hex("#000000").normalize(),
            Err(ColorError::UnsupportedOperation { space: Space::Hex, .. })
        ));
        assert!(hex("#000000").denormalize().is_err());
    }

    #[test]
    fn test_normalize_then_denormalize() {
        let c = Color::Rgb(Rgb::new(10, 20, 30).unwrap());
        let n = c.normalize().unwrap();
        assert!(n.is_normalized());
        assert_eq!(n.normalize().unwrap(), n);
        assert_eq!(n.denormalize().unwrap(), c);
    }

    fn ints(c: [i64; 3]) -> [Component; 3] {
        c.map(Component::Int)
    }

    #[test]
    fn test_from_components() {
        let c = Color::from_components(Space::Rgb, ints([255, 0, 0])).unwrap();
        assert_eq!(c.to_hex().as_str(), "#ff0000");

        let c = Color::from_components(Space::Hsl, [0.5, 0.5, 0.5].map(Component::Float)).unwrap();
        assert!(c.is_normalized());

        let mixed = [Component::Int(255), Component::Float(0.0), Component::Int(0)];
        assert_eq!(
            Color::from_components(Space::Rgb, mixed),
            Err(ColorError::InconsistentComponents)
        );
        assert!(matches!(
            Color::from_components(Space::Hsl, ints([361, 0, 0])),
            Err(ColorError::OutOfRange { channel: "h", .. })
        ));
        assert!(matches!(
            Color::from_components(Space::Rgb, ints([-1, 0, 0])),
            Err(ColorError::OutOfRange { channel: "r", .. })
        ));
        assert!(matches!(
            Color::from_components(Space::Hex, ints([0, 0, 0])),
            Err(ColorError::UnsupportedConversion(_))
        ));
    }

    #[test]
    fn test_darken_and_lighten_preserve_encoding() {
        let c = hex("#808080");
        assert_eq!(c.darken(0.1).space(), Space::Hex);

        let rgb = Color::Rgb(Rgb::new(128, 64, 32).unwrap());
        let lighter = rgb.lighten(0.1);
        assert_eq!(lighter.encoding(), rgb.encoding());
    }

    #[test]
    fn test_darken_clamps_to_black() {
        let c = hex("#3b82f6");
        assert_eq!(c.darken(1.0).to_hsl().l(), 0.0);
        assert_eq!(c.darken(1.0), hex("#000000"));
        assert_eq!(c.lighten(1.0), hex("#ffffff"));
    }

    #[test]
    fn test_darken_normalized_hsl_exact() {
        let c = Color::NormalizedHsl(Hsl::from_unit(0.5, 0.5, 0.5).unwrap());
        let Color::NormalizedHsl(d) = c.darken(0.25) else {
            panic!("encoding changed");
        };
        assert_eq!(d.l(), 0.25);
    }

    #[test]
    fn test_saturate_clamps() {
        let c = Color::NormalizedHsl(Hsl::from_unit(0.1, 0.9, 0.5).unwrap());
        assert_eq!(c.saturate(0.5).to_hsl().s(), 1.0);
        assert_eq!(c.desaturate(2.0).to_hsl().s(), 0.0);
    }

    #[test]
    fn test_blend_inherits_left_encoding() {
        let left = hex("#000000");
        let right = Color::NormalizedHsl(Hsl::from_unit(0.0, 0.0, 1.0).unwrap());
        let mixed = left.blend(&right, 0.5);
        assert_eq!(mixed, hex("#7f7f7f"));

        let flipped = right.blend(&left, 0.5);
        assert_eq!(flipped.space(), Space::Hsl);
        assert!(flipped.is_normalized());
    }

    #[test]
    fn test_blend_endpoints() {
        let a = hex("#123456");
        let b = hex("#fedcba");
        assert_eq!(a.blend(&b, 0.0), a);
        assert_eq!(a.blend(&b, 1.0), b);
    }

    #[test]
    fn test_render() {
        assert_eq!(hex("ABCDEF").render().unwrap(), "#abcdef");
        let err = hex("#abcdef").convert(Space::Rgb).render().unwrap_err();
        assert_eq!(err.to_string(), "render is not supported for rgb colors");
    }

    #[test]
    fn test_contrast_ratio() {
        let ratio = hex("#000000").contrast_ratio(&hex("#ffffff"));
        assert!((ratio - 21.0).abs() < 1e-9);
        assert!((hex("#777777").contrast_ratio(&hex("#777777")) - 1.0).abs() < 1e-12);
    }
}
