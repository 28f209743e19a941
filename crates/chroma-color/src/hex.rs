//! Canonical `#rrggbb` hex colors.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ColorError, Result};
use crate::rgb::Rgb;

/// A hex color in canonical form: `#` followed by six lowercase hex digits.
///
/// Input is accepted with or without the leading `#` and in any case.
///
/// # Example
///
/// ```rust
/// use chroma_color::Hex;
///
/// let hex: Hex = "FF8800".parse().unwrap();
/// assert_eq!(hex.to_string(), "#ff8800");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hex(String);

impl Hex {
    /// Parse a six digit hex string with an optional leading `#`.
    ///
    /// # Errors
    /// Returns [`ColorError::InvalidFormat`] if the string does not match
    /// `^#?[0-9A-Fa-f]{6}$`.
    pub fn parse(s: &str) -> Result<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidFormat(s.to_string()));
        }
        Ok(Self(format!("#{}", digits.to_ascii_lowercase())))
    }

    /// Builds the hex form of an 8-bit RGB triple.
    pub fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        Self(format!("#{r:02x}{g:02x}{b:02x}"))
    }

    /// The canonical string, including the `#`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The six digits without the `#`.
    pub fn digits(&self) -> &str {
        &self.0[1..]
    }

    /// Splits the digit pairs into an 8-bit triple.
    pub fn to_bytes(&self) -> (u8, u8, u8) {
        let pair = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or_default();
        (pair(1), pair(3), pair(5))
    }

    /// Converts to denormalized RGB by parsing digit pairs.
    pub fn to_rgb(&self) -> Rgb {
        let (r, g, b) = self.to_bytes();
        Rgb::from_bytes(r, g, b)
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Hex {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Hex {
    type Error = ColorError;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for Hex {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Hex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Hex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_str(HexVisitor)
    }
}

struct HexVisitor;

impl Visitor<'_> for HexVisitor {
    type Value = Hex;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a 6 digit hex color string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
        Hex::parse(v).map_err(E::custom)
    }
}
