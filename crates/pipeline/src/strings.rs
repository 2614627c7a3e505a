// STD Dependencies -----------------------------------------------------------
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;


// External Dependencies ------------------------------------------------------
use file_io::{read_text_file, FileError};
use serde::Deserialize;


// Internal Dependencies ------------------------------------------------------
use crate::error::BuildError;


// Fallback Policy ------------------------------------------------------------
/// What to do when a locale lacks a translation present in the English
/// baseline: render the English text under the locale, or copy the already
/// built English bitmap verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    TextEntry,
    Bitmap
}


// Translation Entry Format ---------------------------------------------------
#[derive(Debug, Deserialize)]
struct MessageEntry {
    message: String
}


// Per Locale String Table ----------------------------------------------------
/// All translated strings of one locale, keyed by asset name. Entries are
/// normalized on load so the rasterizer never sees stray line breaks or
/// double spaces from the extraction tool.
#[derive(Debug, Default)]
pub struct LocaleStrings {
    pub locale: String,
    entries: BTreeMap<String, String>
}

impl LocaleStrings {

    pub fn from_json(locale: &str, text: &str) -> Result<Self, BuildError> {
        let raw: BTreeMap<String, MessageEntry> = serde_json::from_str(text).map_err(|err| {
            BuildError::Translations {
                locale: locale.to_string(),
                message: err.to_string()
            }
        })?;
        Ok(Self {
            locale: locale.to_string(),
            entries: raw.into_iter().map(|(name, entry)| {
                (name, normalize(&entry.message))

            }).collect()
        })
    }

    /// Loads `<dir>/<locale>.json` and merges any pre-generated text files
    /// from `<dir>/<locale>/*.txt` over the extracted entries, keyed by
    /// their file stem.
    pub fn load(dir: &Path, locale: &str) -> Result<Self, BuildError> {
        let json = read_text_file(&dir.join(format!("{}.json", locale)))?;
        let mut strings = Self::from_json(locale, &json)?;

        let extra_dir = dir.join(locale);
        if extra_dir.is_dir() {
            let listing = fs::read_dir(&extra_dir).map_err(|io| {
                FileError::new(io, extra_dir.clone())
            })?;
            for entry in listing {
                let path = entry.map_err(|io| FileError::new(io, extra_dir.clone()))?.path();
                if path.extension().map_or(false, |ext| ext == "txt") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        let text = read_text_file(&path)?;
                        strings.entries.insert(stem.to_string(), normalize(&text));
                    }
                }
            }
        }
        Ok(strings)
    }

    pub fn entry(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    #[cfg(test)]
    pub fn from_entries(locale: &str, entries: &[(&str, &str)]) -> Self {
        Self {
            locale: locale.to_string(),
            entries: entries.iter().map(|(name, text)| {
                (name.to_string(), text.to_string())

            }).collect()
        }
    }

}


// Text Normalization ---------------------------------------------------------
/// Collapses the formatting noise of extracted translations: CRLF becomes
/// LF, remaining line breaks become spaces, space runs collapse to one and
/// surrounding whitespace is stripped.
pub fn normalize(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\n', " ");
    let mut result = String::with_capacity(unified.len());
    let mut last_space = false;
    for c in unified.chars() {
        if c == ' ' {
            if !last_space {
                result.push(c);
            }
            last_space = true;

        } else {
            result.push(c);
            last_space = false;
        }
    }
    result.trim().to_string()
}
