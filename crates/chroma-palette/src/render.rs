//! Writing a palette out for theme loaders.

use std::fmt;
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::palette::Palette;

/// Output format of a rendered palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PaletteFormat {
    /// A Lua module returning a table of `name = "#rrggbb"` entries.
    #[default]
    Lua,
    Json,
    Toml,
}

/// Error rendering a palette.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("unknown palette format '{0}', expected lua, json or toml")]
    UnknownFormat(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl PaletteFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Lua => "lua",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }

    /// Infers the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for PaletteFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for PaletteFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, RenderError> {
        match s.to_ascii_lowercase().as_str() {
            "lua" => Ok(Self::Lua),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(RenderError::UnknownFormat(s.to_string())),
        }
    }
}

/// Renders a palette in slot order.
///
/// # Errors
/// Returns [`RenderError`] if serialization fails.
pub fn render_palette(palette: &Palette, format: PaletteFormat) -> Result<String, RenderError> {
    match format {
        PaletteFormat::Lua => Ok(render_lua(palette)),
        PaletteFormat::Json => {
            let mut out = serde_json::to_string_pretty(palette)?;
            out.push('\n');
            Ok(out)
        }
        PaletteFormat::Toml => Ok(toml::to_string(palette)?),
    }
}

fn render_lua(palette: &Palette) -> String {
    let mut out = String::from("return {\n");
    for (name, hex) in palette.iter() {
        let _ = writeln!(out, "  {name} = \"{hex}\",");
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_color::Hex;

    fn palette() -> Palette {
        [
            ("black", Hex::parse("#1a1a1a").unwrap()),
            ("white", Hex::parse("#f0f0f0").unwrap()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_lua() {
        let out = render_palette(&palette(), PaletteFormat::Lua).unwrap();
        assert_eq!(
            out,
            "return {\n  black = \"#1a1a1a\",\n  white = \"#f0f0f0\",\n}\n"
        );
    }

    #[test]
    fn test_json() {
        let out = render_palette(&palette(), PaletteFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["black"], "#1a1a1a");
        assert!(out.find("black").unwrap() < out.find("white").unwrap());
    }

    #[test]
    fn test_toml() {
        let out = render_palette(&palette(), PaletteFormat::Toml).unwrap();
        assert_eq!(out, "black = \"#1a1a1a\"\nwhite = \"#f0f0f0\"\n");
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("LUA".parse::<PaletteFormat>().unwrap(), PaletteFormat::Lua);
        assert!("yaml".parse::<PaletteFormat>().is_err());
        assert_eq!(
            PaletteFormat::from_path(Path::new("out/colors.json")),
            Some(PaletteFormat::Json)
        );
        assert_eq!(PaletteFormat::from_path(Path::new("colors")), None);
    }
}
