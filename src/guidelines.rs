use crate::error::AdResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Built-in creative formats. Layouts carry the format as a plain string so
/// custom profiles can be added without touching this enum.
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Format {
    Story,
    Feed,
    Banner,
}

impl Format {
    pub fn default_guidelines(&self) -> GuidelineConfig {
        match self {
            Self::Story => GuidelineConfig {
                name: "story".to_string(),
                ..GuidelineConfig::default()
            },
            Self::Feed => GuidelineConfig {
                name: "feed".to_string(),
                top_safe_zone_px: 120,
                bottom_safe_zone_px: 0,
                canvas_width: 1080,
                canvas_height: 1080,
                ..GuidelineConfig::default()
            },
            Self::Banner => GuidelineConfig {
                name: "banner".to_string(),
                top_safe_zone_px: 80,
                bottom_safe_zone_px: 0,
                canvas_width: 1200,
                canvas_height: 628,
                ..GuidelineConfig::default()
            },
        }
    }
}

/// Per-format thresholds. Defaults are the story profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuidelineConfig {
    pub name: String,
    pub top_safe_zone_px: i32,
    /// Band above the bottom edge kept free of text. `0` disables the check.
    pub bottom_safe_zone_px: i32,
    pub min_font_px: u32,
    pub min_contrast_ratio: f64,
    pub max_packshots: usize,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Default for GuidelineConfig {
    fn default() -> Self {
        Self {
            name: "story".to_string(),
            top_safe_zone_px: 200,
            bottom_safe_zone_px: 250,
            min_font_px: 20,
            min_contrast_ratio: 4.5,
            max_packshots: 1,
            canvas_width: 1080,
            canvas_height: 1920,
        }
    }
}

/// Lookup table from format name to profile. The story profile doubles as
/// the fallback for unknown formats.
#[derive(Debug, Clone)]
pub struct GuidelineTable {
    profiles: HashMap<String, GuidelineConfig>,
    fallback: GuidelineConfig,
}

impl Default for GuidelineTable {
    fn default() -> Self {
        let profiles = Format::iter()
            .map(|f| (f.to_string(), f.default_guidelines()))
            .collect();
        Self {
            profiles,
            fallback: Format::Story.default_guidelines(),
        }
    }
}

impl GuidelineTable {
    /// Loads a JSON object of `format -> profile`. Entries override the
    /// built-ins; the story fallback is kept if the file omits it.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AdResult<Self> {
        let content = fs::read_to_string(path)?;
        let loaded: HashMap<String, GuidelineConfig> = serde_json::from_str(&content)?;

        let mut table = Self::default();
        for (name, mut cfg) in loaded {
            // `name` defaults to "story" when the entry omits it
            if cfg.name.is_empty() || cfg.name == "story" {
                cfg.name = name.trim().to_ascii_lowercase();
            }
            table.insert(&name, cfg);
        }
        Ok(table)
    }

    pub fn with_profile(mut self, format: &str, cfg: GuidelineConfig) -> Self {
        self.insert(format, cfg);
        self
    }

    fn insert(&mut self, format: &str, cfg: GuidelineConfig) {
        let key = format.trim().to_ascii_lowercase();
        if key == Format::Story.to_string() {
            self.fallback = cfg.clone();
        }
        self.profiles.insert(key, cfg);
    }

    /// Never fails: unknown formats get the story profile.
    pub fn config_for(&self, format: &str) -> &GuidelineConfig {
        let key = format.trim().to_ascii_lowercase();
        self.profiles.get(&key).unwrap_or(&self.fallback)
    }

    pub fn formats(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Lookup against the built-in profiles.
pub fn config_for(format: &str) -> GuidelineConfig {
    Format::from_str(format.trim())
        .unwrap_or(Format::Story)
        .default_guidelines()
}
