#![allow(dead_code)]

use adforge::collab::{
    MatcherError, PhraseMatch, PixelSampler, SamplerError, SemanticMatcher, SolidBackground,
};
use adforge::canvas::Region;
use adforge::config::Config;
use adforge::{ComplianceEngine, Layout, Rgb, TextBlock};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const LIGHT_GRAY: Rgb = Rgb(220, 220, 220);

pub fn text_block(id: &str, text: &str, y: i32, font: u32, color: Rgb) -> TextBlock {
    TextBlock {
        id: id.to_string(),
        text: text.to_string(),
        font_size_px: font,
        color,
        x: 80,
        y,
    }
}

pub fn story_layout(blocks: Vec<TextBlock>) -> Layout {
    Layout {
        id: "creative-1".to_string(),
        format: "story".to_string(),
        width: 1080,
        height: 1920,
        background_ref: Some("bg-main".to_string()),
        packshot_refs: vec![],
        text_blocks: blocks,
        extra: BTreeMap::new(),
    }
}

/// One light-gray headline in the top safe zone, too small to read.
pub fn broken_story() -> Layout {
    story_layout(vec![text_block("headline", "Fresh summer deals", 48, 18, LIGHT_GRAY)])
}

/// A layout that passes every rule against a white background.
pub fn clean_story() -> Layout {
    story_layout(vec![text_block("headline", "Fresh summer deals", 400, 48, Rgb::BLACK)])
}

pub fn white_engine(config: Config) -> ComplianceEngine {
    ComplianceEngine::new(config).with_sampler(Arc::new(SolidBackground::new(Rgb::WHITE)))
}

pub fn default_engine() -> ComplianceEngine {
    white_engine(Config::default())
}

pub fn recolor_config() -> Config {
    let mut cfg = Config::default();
    cfg.search.allow_recolor = true;
    cfg
}

pub struct BrokenSampler;

impl PixelSampler for BrokenSampler {
    fn sample_region_average(&self, _image: &str, _region: Region) -> Result<Rgb, SamplerError> {
        Err(SamplerError::Unavailable("image store offline".to_string()))
    }
}

pub struct BrokenMatcher;

impl SemanticMatcher for BrokenMatcher {
    fn find_banned_matches(&self, _text: &str) -> Result<Vec<PhraseMatch>, MatcherError> {
        Err(MatcherError::Unavailable("model not loaded".to_string()))
    }
}
