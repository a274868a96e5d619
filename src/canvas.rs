use crate::error::{AdResult, CreativeError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Average glyph advance as a fraction of the font size.
pub const GLYPH_WIDTH_EM: f64 = 0.6;
/// Line box height as a fraction of the font size.
pub const LINE_HEIGHT_EM: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "[u8; 3]")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const NEUTRAL_GRAY: Rgb = Rgb(128, 128, 128);

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.0, c.1, c.2]
    }
}

impl FromStr for Rgb {
    type Err = CreativeError;

    /// Accepts `#rrggbb` or `r,g,b`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || CreativeError::InvalidColor(s.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            return Ok(Rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let mut rgb = [0u8; 3];
        for (i, p) in parts.iter().enumerate() {
            rgb[i] = p.trim().parse().map_err(|_| invalid())?;
        }
        Ok(Rgb(rgb[0], rgb[1], rgb[2]))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Triple([u8; 3]),
    Text(String),
}

impl TryFrom<ColorRepr> for Rgb {
    type Error = CreativeError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Triple([r, g, b]) => Ok(Rgb(r, g, b)),
            ColorRepr::Text(s) => s.parse(),
        }
    }
}

/// Pixel box anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Region {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_degenerate(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Intersects the region with `[0, width) x [0, height)`.
    /// Returns `None` when nothing is left.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Region> {
        let x0 = i64::from(self.x).max(0);
        let y0 = i64::from(self.y).max(0);
        let x1 = (i64::from(self.x) + i64::from(self.w)).min(i64::from(width));
        let y1 = (i64::from(self.y) + i64::from(self.h)).min(i64::from(height));

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Region {
            x: x0 as i32,
            y: y0 as i32,
            w: (x1 - x0) as u32,
            h: (y1 - y0) as u32,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub id: String,
    pub text: String,
    pub font_size_px: u32,
    pub color: Rgb,
    pub x: i32,
    pub y: i32,
}

impl TextBlock {
    /// Estimated box covered by the rendered text.
    pub fn bounding_box(&self) -> Region {
        let chars = self.text.chars().count() as f64;
        let font = f64::from(self.font_size_px);
        Region {
            x: self.x,
            y: self.y,
            w: (chars * font * GLYPH_WIDTH_EM).ceil() as u32,
            h: (font * LINE_HEIGHT_EM).ceil() as u32,
        }
    }

    /// Short excerpt used in human-readable messages.
    pub fn excerpt(&self) -> String {
        let mut out: String = self.text.chars().take(15).collect();
        if self.text.chars().count() > 15 {
            out.push_str("...");
        }
        out
    }
}

/// The creative under validation. Owned by the caller; the engine only
/// ever works on clones of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub id: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub background_ref: Option<String>,
    #[serde(default)]
    pub packshot_refs: Vec<String>,
    #[serde(default)]
    pub text_blocks: Vec<TextBlock>,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl Layout {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AdResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn block(&self, id: &str) -> Option<&TextBlock> {
        self.text_blocks.iter().find(|b| b.id == id)
    }

    /// Rejects malformed input before any rule runs.
    pub fn check_structure(&self) -> AdResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CreativeError::NonPositiveDimension {
                width: self.width,
                height: self.height,
            });
        }

        let mut seen = HashSet::with_capacity(self.text_blocks.len());
        for block in &self.text_blocks {
            if !seen.insert(block.id.as_str()) {
                return Err(CreativeError::DuplicateTextBlock(block.id.clone()));
            }
            if block.font_size_px == 0 {
                return Err(CreativeError::NonPositiveFontSize(block.id.clone()));
            }
            if block.text.trim().is_empty() {
                return Err(CreativeError::EmptyText(block.id.clone()));
            }
        }
        Ok(())
    }
}
