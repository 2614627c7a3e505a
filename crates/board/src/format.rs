// STD Dependencies -----------------------------------------------------------
use std::collections::BTreeMap;


// External Dependencies ------------------------------------------------------
use serde::Deserialize;


// Internal Dependencies ------------------------------------------------------
use crate::error::ConfigError;


// Constants ------------------------------------------------------------------
const DEFAULT_NAME: &str = "_DEFAULT_";


// Style Records --------------------------------------------------------------
/// Fully resolved style parameters for one asset category. Sizes are in
/// thousandths of the canvas (1000 = 100.0%).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub height: u32,
    pub max_width: Option<u32>,
    pub background: [u8; 3],
    pub foreground: [u8; 3]
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStyle {
    height: Option<u32>,
    max_width: Option<u32>,
    background: Option<String>,
    foreground: Option<String>
}


// Asset / Format Manifest ----------------------------------------------------
/// The asset manifest: which assets exist, which style category each one
/// uses, and the per-locale font table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatConfig {
    /// Locale independent text assets
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    /// Per-locale text assets
    #[serde(default)]
    pub localized_files: BTreeMap<String, String>,
    /// Sprite / icon images
    #[serde(default)]
    pub sprite_files: BTreeMap<String, String>,
    /// Diagnostic screen assets, only built when the diagnostic UI flag is on
    #[serde(default)]
    pub diagnostic_files: BTreeMap<String, String>,
    #[serde(default)]
    styles: BTreeMap<String, RawStyle>,
    #[serde(default)]
    fonts: BTreeMap<String, String>
}

impl FormatConfig {

    pub fn from_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Resolves a style category, filling missing fields from `_DEFAULT_`.
    /// A category that exists in neither table is a manifest / style table
    /// sync violation and fails the build.
    pub fn resolve_style(&self, category: &str) -> Result<Style, ConfigError> {
        let named = self.styles.get(category).ok_or_else(|| {
            ConfigError::UnknownStyleCategory(category.to_string())
        })?;
        let default = self.styles.get(DEFAULT_NAME).cloned().unwrap_or_default();

        let missing = |field| ConfigError::MissingStyleField {
            category: category.to_string(),
            field
        };
        let height = named.height.or(default.height).ok_or_else(|| missing("height"))?;
        let background = named.background.clone()
            .or(default.background)
            .ok_or_else(|| missing("background"))?;
        let foreground = named.foreground.clone()
            .or(default.foreground)
            .ok_or_else(|| missing("foreground"))?;

        Ok(Style {
            height,
            max_width: named.max_width.or(default.max_width),
            background: parse_color(&background)?,
            foreground: parse_color(&foreground)?
        })
    }

    /// The font for a locale, falling back to the `_DEFAULT_` entry.
    pub fn font(&self, locale: &str) -> Option<&str> {
        self.fonts
            .get(locale)
            .or_else(|| self.fonts.get(DEFAULT_NAME))
            .map(String::as_str)
    }

}


// Color Parsing --------------------------------------------------------------
/// Parses a 24-bit hex color such as `808080` or `#ffffff`.
pub fn parse_color(value: &str) -> Result<[u8; 3], ConfigError> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidColor(value.to_string()));
    }
    Ok([
        u8::from_str_radix(&hex[0..2], 16).unwrap_or(0),
        u8::from_str_radix(&hex[2..4], 16).unwrap_or(0),
        u8::from_str_radix(&hex[4..6], 16).unwrap_or(0)
    ])
}
