//! Declarative HSL range rules.
//!
//! A [`ConditionMap`] is an ordered list of named [`HslCondition`]s. Each
//! condition constrains the denormalized hue (degrees), saturation and
//! lightness (percent) of a color with a [`Field`]: either [`Field::Any`] or a
//! list of inclusive [`Band`]s, any one of which may match.
//!
//! In TOML the map is an array of tables:
//!
//! ```toml
//! [[rule]]
//! name = "red"
//! hue = [[0, 35], [325, 360]]
//! saturation = [40, 90]
//! lightness = [30, 90]
//!
//! [[rule]]
//! name = "black"
//! lightness = [5, 20]
//! ```
//!
//! Omitted fields are [`Field::Any`].

use std::fmt;

use chroma_color::{HUE_MAX, Hsl, PERCENT_MAX};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error building or validating rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("band [{min}, {max}] is inverted")]
    InvertedBand { min: u16, max: u16 },
    #[error("unknown field keyword '{0}', expected \"any\" or a list of bands")]
    UnknownKeyword(String),
    #[error("rule name cannot be empty")]
    EmptyName,
    #[error("rule '{0}' is declared more than once")]
    DuplicateName(String),
    #[error("rule '{rule}': {channel} band ends at {value}, above the maximum {max}")]
    BandOutOfRange {
        rule: String,
        channel: Channel,
        value: u16,
        max: u16,
    },
}

/// One of the three HSL channels a [`Field`] constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Hue,
    Saturation,
    Lightness,
}

impl Channel {
    /// Largest denormalized value of the channel.
    pub const fn max(self) -> u16 {
        match self {
            Self::Hue => HUE_MAX,
            Self::Saturation | Self::Lightness => PERCENT_MAX,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Lightness => "lightness",
        })
    }
}

/// Inclusive `[min, max]` range of denormalized values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u16; 2]", into = "[u16; 2]")]
pub struct Band {
    min: u16,
    max: u16,
}

impl Band {
    /// # Errors
    /// Returns [`RuleError::InvertedBand`] if `min > max`.
    pub fn new(min: u16, max: u16) -> Result<Self, RuleError> {
        if min > max {
            return Err(RuleError::InvertedBand { min, max });
        }
        Ok(Self { min, max })
    }

    pub const fn min(&self) -> u16 {
        self.min
    }

    pub const fn max(&self) -> u16 {
        self.max
    }

    pub const fn contains(&self, value: u16) -> bool {
        self.min <= value && value <= self.max
    }
}

impl TryFrom<[u16; 2]> for Band {
    type Error = RuleError;

    fn try_from([min, max]: [u16; 2]) -> Result<Self, RuleError> {
        Self::new(min, max)
    }
}

impl From<Band> for [u16; 2] {
    fn from(band: Band) -> Self {
        [band.min, band.max]
    }
}

/// Constraint on a single channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldRepr", into = "FieldRepr")]
pub enum Field {
    /// Every value passes.
    #[default]
    Any,
    /// The value must fall in at least one band. An empty list never passes.
    Within(Vec<Band>),
}

impl Field {
    /// A field with a single band.
    ///
    /// # Errors
    /// Returns [`RuleError::InvertedBand`] if `min > max`.
    pub fn range(min: u16, max: u16) -> Result<Self, RuleError> {
        Ok(Self::Within(vec![Band::new(min, max)?]))
    }

    pub fn matches(&self, value: u16) -> bool {
        match self {
            Self::Any => true,
            Self::Within(bands) => bands.iter().any(|band| band.contains(value)),
        }
    }

    /// The band endpoint closest to `value`, in declaration order on ties.
    ///
    /// `None` for [`Field::Any`] and for an empty band list.
    pub fn nearest(&self, value: u16) -> Option<u16> {
        let Self::Within(bands) = self else {
            return None;
        };
        let mut best: Option<u16> = None;
        for endpoint in bands.iter().flat_map(|b| [b.min, b.max]) {
            let closer = best.is_none_or(|b| endpoint.abs_diff(value) < b.abs_diff(value));
            if closer {
                best = Some(endpoint);
            }
        }
        best
    }

    /// Largest endpoint declared, if any.
    fn upper(&self) -> Option<u16> {
        match self {
            Self::Any => None,
            Self::Within(bands) => bands.iter().map(Band::max).max(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FieldRepr {
    Keyword(String),
    Single(Band),
    Multiple(Vec<Band>),
}

impl TryFrom<FieldRepr> for Field {
    type Error = RuleError;

    fn try_from(repr: FieldRepr) -> Result<Self, RuleError> {
        match repr {
            FieldRepr::Keyword(word) if word.eq_ignore_ascii_case("any") => Ok(Self::Any),
            FieldRepr::Keyword(word) => Err(RuleError::UnknownKeyword(word)),
            FieldRepr::Single(band) => Ok(Self::Within(vec![band])),
            FieldRepr::Multiple(bands) => Ok(Self::Within(bands)),
        }
    }
}

impl From<Field> for FieldRepr {
    fn from(field: Field) -> Self {
        match field {
            Field::Any => Self::Keyword("any".into()),
            Field::Within(bands) if bands.len() == 1 => Self::Single(bands[0]),
            Field::Within(bands) => Self::Multiple(bands),
        }
    }
}

/// Hue, saturation and lightness constraints for one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HslCondition {
    pub hue: Field,
    pub saturation: Field,
    pub lightness: Field,
}

impl HslCondition {
    /// A condition that matches every color.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn field(&self, channel: Channel) -> &Field {
        match channel {
            Channel::Hue => &self.hue,
            Channel::Saturation => &self.saturation,
            Channel::Lightness => &self.lightness,
        }
    }

    /// Whether every channel of a denormalized HSL color passes.
    pub fn matches(&self, hsl: &Hsl) -> bool {
        self.hue.matches(hsl.h())
            && self.saturation.matches(hsl.s())
            && self.lightness.matches(hsl.l())
    }
}

/// A named condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    #[serde(flatten)]
    pub condition: HslCondition,
}

impl Rule {
    pub fn new(name: impl Into<String>, condition: HslCondition) -> Self {
        Self {
            name: name.into(),
            condition,
        }
    }
}

/// Ordered map from slot name to condition. Classification returns the first
/// rule that matches, so order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionMap {
    rules: Vec<Rule>,
}

impl ConditionMap {
    /// An empty map.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&HslCondition> {
        self.rules
            .iter()
            .find(|rule| rule.name == name)
            .map(|rule| &rule.condition)
    }

    /// Adds a rule at the end, or replaces an existing rule of the same name
    /// in place.
    pub fn insert(&mut self, name: impl Into<String>, condition: HslCondition) {
        let name = name.into();
        match self.rules.iter_mut().find(|rule| rule.name == name) {
            Some(rule) => rule.condition = condition,
            None => self.rules.push(Rule { name, condition }),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<HslCondition> {
        let index = self.rules.iter().position(|rule| rule.name == name)?;
        Some(self.rules.remove(index).condition)
    }

    /// Checks names and band bounds.
    ///
    /// # Errors
    /// Returns the first [`RuleError`] found, in rule order.
    pub fn validate(&self) -> Result<(), RuleError> {
        let mut seen = std::collections::HashSet::new();
        for rule in &self.rules {
            if rule.name.trim().is_empty() {
                return Err(RuleError::EmptyName);
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(RuleError::DuplicateName(rule.name.clone()));
            }
            for channel in [Channel::Hue, Channel::Saturation, Channel::Lightness] {
                if let Some(value) = rule.condition.field(channel).upper() {
                    if value > channel.max() {
                        return Err(RuleError::BandOutOfRange {
                            rule: rule.name.clone(),
                            channel,
                            value,
                            max: channel.max(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for ConditionMap {
    /// The reference rule table.
    fn default() -> Self {
        let any = Field::Any;
        let within = |bands: &[(u16, u16)]| {
            Field::Within(bands.iter().map(|&(min, max)| Band { min, max }).collect())
        };
        let rule = |name: &str, hue: Field, saturation: Field, lightness: Field| Rule {
            name: name.to_string(),
            condition: HslCondition {
                hue,
                saturation,
                lightness,
            },
        };

        Self {
            rules: vec![
                rule("accent", any.clone(), within(&[(60, 100)]), within(&[(50, 90)])),
                rule("black", any.clone(), any.clone(), within(&[(5, 20)])),
                rule("white", any.clone(), any.clone(), within(&[(80, 95)])),
                rule("background", any.clone(), within(&[(0, 20)]), within(&[(5, 10)])),
                rule("foreground", any.clone(), within(&[(0, 20)]), within(&[(90, 95)])),
                rule(
                    "red",
                    within(&[(0, 35), (325, 360)]),
                    within(&[(40, 90)]),
                    within(&[(30, 90)]),
                ),
                rule("orange", within(&[(35, 75)]), within(&[(30, 90)]), within(&[(40, 80)])),
                rule("brown", within(&[(35, 75)]), within(&[(30, 70)]), within(&[(20, 70)])),
                rule("yellow", within(&[(65, 105)]), within(&[(40, 90)]), within(&[(30, 90)])),
                rule("green", within(&[(100, 160)]), within(&[(40, 90)]), within(&[(30, 90)])),
                rule("blue", within(&[(200, 230)]), within(&[(40, 50)]), within(&[(40, 60)])),
                rule("cyan", within(&[(170, 200)]), within(&[(40, 90)]), within(&[(40, 90)])),
                rule("magenta", within(&[(280, 310)]), within(&[(30, 50)]), within(&[(30, 50)])),
            ],
        }
    }
}

impl FromIterator<Rule> for ConditionMap {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut map = Self::new();
        for rule in iter {
            map.insert(rule.name, rule.condition);
        }
        map
    }
}

impl<'a> IntoIterator for &'a ConditionMap {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_rejects_inverted() {
        assert_eq!(
            Band::new(10, 5),
            Err(RuleError::InvertedBand { min: 10, max: 5 })
        );
        assert!(Band::new(5, 5).is_ok());
    }

    #[test]
    fn test_field_matches_any_band() {
        let field = Field::Within(vec![
            Band::new(0, 35).unwrap(),
            Band::new(325, 360).unwrap(),
        ]);
        assert!(field.matches(0));
        assert!(field.matches(350));
        assert!(!field.matches(100));
        assert!(Field::Any.matches(999));
    }

    #[test]
    fn test_empty_field_never_matches() {
        let field = Field::Within(Vec::new());
        assert!(!field.matches(0));
        assert_eq!(field.nearest(10), None);
    }

    #[test]
    fn test_nearest_endpoint() {
        let field = Field::Within(vec![
            Band::new(0, 35).unwrap(),
            Band::new(325, 360).unwrap(),
        ]);
        assert_eq!(field.nearest(100), Some(35));
        assert_eq!(field.nearest(300), Some(325));
        assert_eq!(Field::Any.nearest(5), None);
    }

    #[test]
    fn test_nearest_tie_prefers_first_declared() {
        let field = Field::range(40, 50).unwrap();
        assert_eq!(field.nearest(45), Some(40));
    }

    #[test]
    fn test_default_table_order() {
        let map = ConditionMap::default();
        let names: Vec<_> = map.names().collect();
        assert_eq!(
            names,
            [
                "accent",
                "black",
                "white",
                "background",
                "foreground",
                "red",
                "orange",
                "brown",
                "yellow",
                "green",
                "blue",
                "cyan",
                "magenta"
            ]
        );
        assert!(map.validate().is_ok());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = ConditionMap::default();
        map.insert("black", HslCondition::any());
        assert_eq!(map.names().nth(1), Some("black"));
        assert_eq!(map.get("black"), Some(&HslCondition::any()));

        map.insert("pink", HslCondition::any());
        assert_eq!(map.names().last(), Some("pink"));
        assert_eq!(map.len(), 14);
    }

    #[test]
    fn test_remove() {
        let mut map = ConditionMap::default();
        assert!(map.remove("accent").is_some());
        assert!(map.get("accent").is_none());
        assert!(map.remove("accent").is_none());
    }

    #[test]
    fn test_validate_rejects_duplicates_and_bounds() {
        let dup: ConditionMap = serde_json::from_str(
            r#"[{"name": "a"}, {"name": "a"}]"#,
        )
        .unwrap();
        assert_eq!(dup.validate(), Err(RuleError::DuplicateName("a".into())));

        let empty: ConditionMap = serde_json::from_str(r#"[{"name": " "}]"#).unwrap();
        assert_eq!(empty.validate(), Err(RuleError::EmptyName));

        let wide: ConditionMap =
            serde_json::from_str(r#"[{"name": "x", "saturation": [0, 101]}]"#).unwrap();
        assert!(matches!(
            wide.validate(),
            Err(RuleError::BandOutOfRange {
                channel: Channel::Saturation,
                value: 101,
                ..
            })
        ));
    }

    #[test]
    fn test_field_serde_forms() {
        let rule: Rule = serde_json::from_str(
            r#"{"name": "red", "hue": [[0, 35], [325, 360]], "saturation": [40, 90], "lightness": "any"}"#,
        )
        .unwrap();
        assert_eq!(rule.condition.hue, ConditionMap::default().get("red").unwrap().hue);
        assert_eq!(rule.condition.saturation, Field::range(40, 90).unwrap());
        assert_eq!(rule.condition.lightness, Field::Any);
    }

    #[test]
    fn test_field_serde_rejects_bad_input() {
        assert!(serde_json::from_str::<Field>(r#""none""#).is_err());
        assert!(serde_json::from_str::<Field>("[90, 40]").is_err());
        assert_eq!(
            serde_json::from_str::<Field>("[]").unwrap(),
            Field::Within(Vec::new())
        );
    }

    #[test]
    fn test_toml_round_trip() {
        #[derive(Serialize, Deserialize)]
        struct Doc {
            rule: ConditionMap,
        }
        let doc = Doc {
            rule: ConditionMap::default(),
        };
        let text = toml::to_string(&doc).unwrap();
        assert!(text.contains("[[rule]]"));
        let back: Doc = toml::from_str(&text).unwrap();
        assert_eq!(back.rule, ConditionMap::default());
    }
}
