//! Classification of colors against a [`ConditionMap`], and coercion of
//! colors into a condition.

use std::collections::HashSet;

use chroma_color::{Color, Hsl};
use tracing::trace;

use crate::rules::{ConditionMap, Field, HslCondition};

/// Returns the name of the first rule, in map order, whose condition the
/// color satisfies. Rules named in `ignore` are skipped.
///
/// The color is compared as denormalized HSL (degrees and percent).
pub fn classify<'a>(
    color: &Color,
    conditions: &'a ConditionMap,
    ignore: &HashSet<String>,
) -> Option<&'a str> {
    let hsl = color.to_hsl().denormalize();
    conditions
        .iter()
        .filter(|rule| !ignore.contains(&rule.name))
        .find(|rule| rule.condition.matches(&hsl))
        .map(|rule| rule.name.as_str())
}

/// Moves each failing channel of `color` to the closest band endpoint of its
/// field. Channels that already pass are left alone.
///
/// The result is denormalized HSL.
pub fn coerce(color: &Color, condition: &HslCondition) -> Color {
    let hsl = color.to_hsl().denormalize();
    let h = snap(hsl.h(), &condition.hue);
    let s = snap(hsl.s(), &condition.saturation);
    let l = snap(hsl.l(), &condition.lightness);
    if (h, s, l) != (hsl.h(), hsl.s(), hsl.l()) {
        trace!(from = ?hsl.components(), to = ?[h, s, l], "coerced color into condition");
    }
    Color::Hsl(Hsl::saturating(h, s, l))
}

fn snap(value: u16, field: &Field) -> u16 {
    if field.matches(value) {
        return value;
    }
    field.nearest(value).unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Band, Rule};

    fn hex(s: &str) -> Color {
        Color::parse(s).unwrap()
    }

    #[test]
    fn test_classify_black_and_white() {
        let map = ConditionMap::default();
        let none = HashSet::new();
        assert_eq!(classify(&hex("#1a1a1a"), &map, &none), Some("black"));
        assert_eq!(classify(&hex("#f0f0f0"), &map, &none), Some("white"));
    }

    #[test]
    fn test_classify_first_match_wins() {
        // #ff2222 is h=0 s=100 l=56: accent comes before red.
        let map = ConditionMap::default();
        let none = HashSet::new();
        assert_eq!(classify(&hex("#ff2222"), &map, &none), Some("accent"));

        let ignore: HashSet<String> = ["accent".to_string()].into();
        assert_eq!(classify(&hex("#ff2222"), &map, &ignore), None);
    }

    #[test]
    fn test_classify_respects_reordering() {
        let mut map = ConditionMap::new();
        map.insert("anything", HslCondition::any());
        for rule in &ConditionMap::default() {
            map.insert(rule.name.clone(), rule.condition.clone());
        }
        let none = HashSet::new();
        assert_eq!(classify(&hex("#1a1a1a"), &map, &none), Some("anything"));
    }

    fn subset(names: &[&str]) -> ConditionMap {
        let defaults = ConditionMap::default();
        names
            .iter()
            .map(|name| Rule::new(*name, defaults.get(name).cloned().unwrap()))
            .collect()
    }

    #[test]
    fn test_classify_disjoint_rules_ignore_order() {
        let none = HashSet::new();
        for map in [subset(&["black", "white"]), subset(&["white", "black"])] {
            assert_eq!(classify(&hex("#1a1a1a"), &map, &none), Some("black"));
            assert_eq!(classify(&hex("#f0f0f0"), &map, &none), Some("white"));
            assert_eq!(classify(&hex("#808080"), &map, &none), None);
        }
    }

    #[test]
    fn test_classify_overlapping_rules_first_wins() {
        // #e05050 is h=0 s=69 l=59: inside both accent and red.
        let none = HashSet::new();
        let color = hex("#e05050");
        let accent_first = subset(&["accent", "red"]);
        let red_first = subset(&["red", "accent"]);
        assert_eq!(classify(&color, &accent_first, &none), Some("accent"));
        assert_eq!(classify(&color, &red_first, &none), Some("red"));
    }

    #[test]
    fn test_classify_no_match() {
        let map = ConditionMap::default();
        // Pure black has lightness 0, below every lightness band.
        assert_eq!(classify(&hex("#000000"), &map, &HashSet::new()), None);
    }

    #[test]
    fn test_classify_empty_band_list_never_matches() {
        let mut map = ConditionMap::new();
        map.insert(
            "never",
            HslCondition {
                hue: Field::Within(Vec::new()),
                ..HslCondition::any()
            },
        );
        assert_eq!(classify(&hex("#808080"), &map, &HashSet::new()), None);
    }

    #[test]
    fn test_coerce_moves_to_nearest_endpoint() {
        let black = ConditionMap::default().get("black").cloned().unwrap();
        // #000000 has l=0; the nearest black endpoint is 5.
        let coerced = coerce(&hex("#000000"), &black);
        assert_eq!(coerced, Color::Hsl(Hsl::new(0, 0, 5).unwrap()));
    }

    #[test]
    fn test_coerce_leaves_passing_channels() {
        let cond = HslCondition {
            hue: Field::Any,
            saturation: Field::range(40, 50).unwrap(),
            lightness: Field::Any,
        };
        let coerced = coerce(&Color::Hsl(Hsl::new(123, 90, 33).unwrap()), &cond);
        assert_eq!(coerced, Color::Hsl(Hsl::new(123, 50, 33).unwrap()));
    }

    #[test]
    fn test_coerce_multi_band_hue() {
        let cond = HslCondition {
            hue: Field::Within(vec![Band::new(0, 35).unwrap(), Band::new(325, 360).unwrap()]),
            ..HslCondition::any()
        };
        let coerced = coerce(&Color::Hsl(Hsl::new(300, 50, 50).unwrap()), &cond);
        assert_eq!(coerced, Color::Hsl(Hsl::new(325, 50, 50).unwrap()));
    }

    #[test]
    fn test_coerce_is_fixed_point_when_satisfied() {
        let red = ConditionMap::default().get("red").cloned().unwrap();
        let inside = Color::Hsl(Hsl::new(10, 60, 50).unwrap());
        assert_eq!(coerce(&inside, &red), inside);
    }
}
