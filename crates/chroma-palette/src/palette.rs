//! The generated theme: named slots mapped to hex colors.

use chroma_color::Hex;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered mapping from slot name to color.
///
/// Iteration follows insertion order. Re-inserting an existing slot replaces
/// its color without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<(String, Hex)>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Hex> {
        self.entries
            .iter()
            .find(|(slot, _)| slot == name)
            .map(|(_, hex)| hex)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sets a slot, returning the color it replaced.
    pub fn insert(&mut self, name: impl Into<String>, hex: Hex) -> Option<Hex> {
        let name = name.into();
        match self.entries.iter_mut().find(|(slot, _)| *slot == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, hex)),
            None => {
                self.entries.push((name, hex));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Hex> {
        let index = self.entries.iter().position(|(slot, _)| slot == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Hex)> {
        self.entries.iter().map(|(slot, hex)| (slot.as_str(), hex))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(slot, _)| slot.as_str())
    }
}

impl Serialize for Palette {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (slot, hex) in &self.entries {
            map.serialize_entry(slot, hex)?;
        }
        map.end()
    }
}

impl<N: Into<String>> FromIterator<(N, Hex)> for Palette {
    fn from_iter<I: IntoIterator<Item = (N, Hex)>>(iter: I) -> Self {
        let mut palette = Self::new();
        for (name, hex) in iter {
            palette.insert(name, hex);
        }
        palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Hex {
        Hex::parse(s).unwrap()
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut palette = Palette::new();
        palette.insert("black", hex("#000000"));
        palette.insert("white", hex("#ffffff"));
        let old = palette.insert("black", hex("#111111"));

        assert_eq!(old, Some(hex("#000000")));
        assert_eq!(palette.names().collect::<Vec<_>>(), ["black", "white"]);
        assert_eq!(palette.get("black"), Some(&hex("#111111")));
    }

    #[test]
    fn test_remove() {
        let mut palette: Palette = [("a", hex("#010101")), ("b", hex("#020202"))]
            .into_iter()
            .collect();
        assert_eq!(palette.remove("a"), Some(hex("#010101")));
        assert!(!palette.contains("a"));
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.remove("a"), None);
    }

    #[test]
    fn test_serialize_in_order() {
        let palette: Palette = [("white", hex("#ffffff")), ("black", hex("#000000"))]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&palette).unwrap();
        assert_eq!(json, r##"{"white":"#ffffff","black":"#000000"}"##);
    }
}
