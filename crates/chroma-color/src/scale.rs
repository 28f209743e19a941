//! Normalized and denormalized component scales.
//!
//! RGB and HSL triples exist in two states: integer components bounded by a
//! per-channel maximum (255 for RGB, 360/100/100 for HSL), or float components
//! in `[0.0, 1.0]`. The state is carried in the type through a [`Scale`]
//! marker, so moving between the two is always an explicit call to
//! `normalize()` or `denormalize()`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ColorError, Result};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Normalized {}
    impl Sealed for super::Denormalized {}
}

/// Marker trait for the component scale of a color triple.
pub trait Scale: sealed::Sealed + Copy + fmt::Debug + Default + PartialEq + 'static {
    /// Component type for this scale.
    type Value: Copy + fmt::Debug + fmt::Display + PartialEq + PartialOrd;

    /// Whether components are floats in `[0.0, 1.0]`.
    const NORMALIZED: bool;
}

/// Float components in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Normalized;

/// Integer components bounded by the channel maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Denormalized;

impl Scale for Normalized {
    type Value = f64;
    const NORMALIZED: bool = true;
}

impl Scale for Denormalized {
    type Value = u16;
    const NORMALIZED: bool = false;
}

/// Absorbs float noise so that `n / max * max` truncates back to `n`.
const TRUNCATION_GUARD: f64 = 1e-9;

/// Scales a denormalized component into `[0.0, 1.0]`.
pub(crate) fn normalize_channel(value: u16, max: u16) -> f64 {
    f64::from(value) / f64::from(max)
}

/// Scales a normalized component back to `0..=max`, truncating.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn denormalize_channel(value: f64, max: u16) -> u16 {
    let scaled = (clamp_unit(value) * f64::from(max) + TRUNCATION_GUARD).trunc();
    (scaled as u16).min(max)
}

/// Clamps into `[0.0, 1.0]`. NaN clamps to `0.0`.
pub(crate) fn clamp_unit(value: f64) -> f64 {
    value.max(0.0).min(1.0)
}

/// Validates a denormalized channel.
pub(crate) fn check_int(channel: &'static str, value: u16, max: u16) -> Result<u16> {
    if value > max {
        return Err(ColorError::OutOfRange {
            channel,
            value: value.to_string(),
            max: max.to_string(),
        });
    }
    Ok(value)
}

/// Validates a normalized channel.
pub(crate) fn check_unit(channel: &'static str, value: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ColorError::OutOfRange {
            channel,
            value: value.to_string(),
            max: "1.0".into(),
        });
    }
    Ok(value)
}

/// A single untyped component, as read from configuration or user input.
///
/// Integers deserialize to [`Component::Int`] and floats to
/// [`Component::Float`], so `[255, 0, 0]` and `[1.0, 0.0, 0.0]` are both
/// accepted while `[255, 0.0, 0]` is rejected by
/// [`Color::from_components`](crate::Color::from_components).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Component {
    /// Denormalized integer component.
    Int(i64),
    /// Normalized float component.
    Float(f64),
}

impl From<i64> for Component {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Component {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// A component triple that was found to share one numeric kind.
pub(crate) enum Triple {
    Int([i64; 3]),
    Float([f64; 3]),
}

impl Triple {
    pub(crate) fn from_components(c: [Component; 3]) -> Result<Self> {
        match c {
            [Component::Int(a), Component::Int(b), Component::Int(c)] => Ok(Self::Int([a, b, c])),
            [Component::Float(a), Component::Float(b), Component::Float(c)] => {
                Ok(Self::Float([a, b, c]))
            }
            _ => Err(ColorError::InconsistentComponents),
        }
    }
}

/// Narrows an integer component to `u16`, reporting out of range values.
pub(crate) fn narrow(channel: &'static str, value: i64, max: u16) -> Result<u16> {
    u16::try_from(value)
        .ok()
        .filter(|v| *v <= max)
        .ok_or_else(|| ColorError::OutOfRange {
            channel,
            value: value.to_string(),
            max: max.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denormalize_channel_truncates() {
        assert_eq!(denormalize_channel(0.5, 255), 127);
        assert_eq!(denormalize_channel(0.999, 100), 99);
        assert_eq!(denormalize_channel(1.0, 360), 360);
    }

    #[test]
    fn test_denormalize_channel_absorbs_float_noise() {
        let v = normalize_channel(200, 255);
        let noisy = v - 1e-14;
        assert_eq!(denormalize_channel(noisy, 255), 200);
    }

    #[test]
    fn test_clamp_unit_handles_nan() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(-0.5), 0.0);
        assert_eq!(clamp_unit(1.5), 1.0);
    }

    #[test]
    fn test_triple_rejects_mixed_kinds() {
        let mixed = [Component::Int(0), Component::Float(0.0), Component::Int(0)];
        assert!(matches!(
            Triple::from_components(mixed),
            Err(ColorError::InconsistentComponents)
        ));
    }

    #[test]
    fn test_component_deserialize_kinds() {
        let c: Vec<Component> = serde_json::from_str("[255, 0.5, 0]").expect("parse");
        assert_eq!(
            c,
            vec![Component::Int(255), Component::Float(0.5), Component::Int(0)]
        );
    }

    #[test]
    fn test_narrow_rejects_negative() {
        assert!(narrow("r", -1, 255).is_err());
        assert!(narrow("r", 256, 255).is_err());
        assert_eq!(narrow("r", 255, 255), Ok(255));
    }
}
