mod common;

use adforge::collab::{RasterImage, RasterSampler};
use adforge::config::Config;
use adforge::rules::{codes, Severity};
use adforge::{ComplianceEngine, CreativeError, Rgb};
use common::*;
use rstest::rstest;
use std::sync::Arc;

// --- SAFE ZONE / FONT BOUNDARIES ---

#[rstest]
#[case(200, false)] // exactly on the line is allowed
#[case(199, true)]
#[case(0, true)]
#[case(-30, true)] // partly off-canvas still counts
#[case(1500, false)]
fn test_safe_zone_boundary(#[case] y: i32, #[case] flagged: bool) {
    let layout = story_layout(vec![text_block("t", "Hello there", y, 40, Rgb::BLACK)]);
    let result = default_engine().validate(&layout).unwrap();

    assert_eq!(result.has_code(codes::SAFE_ZONE_TOP), flagged, "y = {}", y);
    assert_eq!(result.passed, !flagged);
}

#[rstest]
#[case(1622, false)] // box bottom 1670 sits on the line
#[case(1623, true)]
#[case(1800, true)]
#[case(400, false)]
fn test_bottom_safe_zone_boundary(#[case] y: i32, #[case] flagged: bool) {
    // 40px font -> 48px box on a 1920px story with a 250px bottom band.
    let layout = story_layout(vec![text_block("t", "Hello there", y, 40, Rgb::BLACK)]);
    let result = default_engine().validate(&layout).unwrap();

    assert_eq!(result.has_code(codes::SAFE_ZONE_BOTTOM), flagged, "y = {}", y);
    assert_eq!(result.passed, !flagged);
}

#[test]
fn test_feed_has_no_bottom_band() {
    let mut layout = story_layout(vec![text_block("t", "Hello there", 1800, 40, Rgb::BLACK)]);
    layout.format = "feed".to_string();
    let result = default_engine().validate(&layout).unwrap();

    assert!(!result.has_code(codes::SAFE_ZONE_BOTTOM));
    assert!(result.passed);
}

// --- CANVAS BOUNDS ---

#[test]
fn test_block_below_canvas_fails() {
    let layout = story_layout(vec![text_block("t", "Hello there", 5000, 40, Rgb::BLACK)]);
    let result = default_engine().validate(&layout).unwrap();

    assert!(!result.passed);
    assert!(result.has_code(codes::OUT_OF_BOUNDS));
    let issue = result
        .issues
        .iter()
        .find(|i| i.code == codes::OUT_OF_BOUNDS)
        .unwrap();
    assert_eq!(issue.severity, Severity::Error);
    let meta = issue.meta.as_ref().unwrap();
    assert_eq!(meta["blockId"], "t");
    assert_eq!(meta["overflowY"], 5000 + 48 - 1920);
}

#[rstest]
#[case(80, 1872, false)] // box ends exactly at the bottom edge
#[case(80, 1873, true)]
#[case(816, 400, false)] // 264px wide box ends at x = 1080
#[case(817, 400, true)]
#[case(-1, 400, true)]
fn test_canvas_bounds(#[case] x: i32, #[case] y: i32, #[case] flagged: bool) {
    let mut tb = text_block("t", "Hello there", y, 40, Rgb::BLACK);
    tb.x = x;
    let mut layout = story_layout(vec![tb]);
    // Feed has no bottom band, so only the canvas edge matters here.
    layout.format = "feed".to_string();
    let result = default_engine().validate(&layout).unwrap();

    assert_eq!(result.has_code(codes::OUT_OF_BOUNDS), flagged, "({}, {})", x, y);
    assert_eq!(result.passed, !flagged);
}

#[rstest]
#[case(20, false)]
#[case(19, true)]
#[case(1, true)]
#[case(96, false)]
fn test_font_size_boundary(#[case] font: u32, #[case] flagged: bool) {
    let layout = story_layout(vec![text_block("t", "Hello there", 400, font, Rgb::BLACK)]);
    let result = default_engine().validate(&layout).unwrap();

    assert_eq!(result.has_code(codes::FONT_TOO_SMALL), flagged, "font = {}", font);
}

#[rstest]
#[case(0, false)]
#[case(1, false)]
#[case(2, true)]
#[case(5, true)]
fn test_packshot_cap(#[case] packshots: usize, #[case] flagged: bool) {
    let mut layout = clean_story();
    layout.packshot_refs = (0..packshots).map(|i| format!("pack-{}", i)).collect();
    let result = default_engine().validate(&layout).unwrap();

    assert_eq!(result.has_code(codes::TOO_MANY_PACKSHOTS), flagged);
    if flagged {
        assert!(!result.passed);
    }
}

#[test]
fn test_packshot_cap_independent_of_text() {
    // No text at all: the cap still applies.
    let mut layout = story_layout(vec![]);
    layout.packshot_refs = vec!["a".into(), "b".into()];
    let result = default_engine().validate(&layout).unwrap();
    assert_eq!(result.codes(), vec![codes::TOO_MANY_PACKSHOTS]);
}

// --- ORDERING & AGGREGATION ---

#[test]
fn test_checks_run_in_fixed_order() {
    let mut layout = story_layout(vec![text_block("t", "Win now", 10, 10, LIGHT_GRAY)]);
    layout.packshot_refs = vec!["a".into(), "b".into()];

    let result = default_engine().validate(&layout).unwrap();
    assert_eq!(
        result.codes(),
        vec![
            codes::SAFE_ZONE_TOP,
            codes::FONT_TOO_SMALL,
            codes::TOO_MANY_PACKSHOTS,
            codes::CONTRAST_LOW,
            codes::SEMANTIC_WARNING,
        ]
    );
}

#[test]
fn test_placement_checks_come_first() {
    let layout = story_layout(vec![
        text_block("low", "Bottom line", 1900, 40, Rgb::BLACK),
        text_block("high", "Top line", 10, 10, Rgb::BLACK),
    ]);
    let result = default_engine().validate(&layout).unwrap();
    assert_eq!(
        result.codes(),
        vec![
            codes::SAFE_ZONE_TOP,
            codes::SAFE_ZONE_BOTTOM,
            codes::OUT_OF_BOUNDS,
            codes::FONT_TOO_SMALL,
        ]
    );
}

#[test]
fn test_issues_follow_block_order_within_a_check() {
    let layout = story_layout(vec![
        text_block("first", "Top line", 10, 40, Rgb::BLACK),
        text_block("second", "Next line", 20, 40, Rgb::BLACK),
    ]);
    let result = default_engine().validate(&layout).unwrap();

    let ids: Vec<&str> = result
        .issues
        .iter()
        .filter(|i| i.code == codes::SAFE_ZONE_TOP)
        .filter_map(|i| i.meta.as_ref()?.get("blockId")?.as_str())
        .collect();
    assert_eq!(ids, vec!["first", "second"]);
}

#[test]
fn test_end_to_end_initial_findings() {
    let result = default_engine().validate(&broken_story()).unwrap();

    assert!(!result.passed);
    assert_eq!(
        result.codes(),
        vec![codes::SAFE_ZONE_TOP, codes::FONT_TOO_SMALL, codes::CONTRAST_LOW]
    );
    assert_eq!(result.error_count(), 3);
}

#[test]
fn test_warnings_do_not_fail_a_layout() {
    let layout = story_layout(vec![text_block("t", "Win now!", 400, 40, Rgb::BLACK)]);
    let result = default_engine().validate(&layout).unwrap();

    assert!(result.has_code(codes::SEMANTIC_WARNING));
    assert_eq!(result.count(Severity::Warning), 1);
    assert!(result.passed);
}

#[test]
fn test_contrast_severity_is_configurable() {
    let mut cfg = Config::default();
    cfg.rules.contrast_severity = Severity::Warning;
    let layout = story_layout(vec![text_block("t", "Hello there", 400, 40, LIGHT_GRAY)]);

    let result = white_engine(cfg).validate(&layout).unwrap();
    assert!(result.has_code(codes::CONTRAST_LOW));
    assert!(result.passed);
}

#[test]
fn test_validation_is_deterministic_and_pure() {
    let engine = default_engine();
    let layout = broken_story();
    let before = layout.clone();

    let a = engine.validate(&layout).unwrap();
    let b = engine.validate(&layout).unwrap();
    assert_eq!(a, b);
    assert_eq!(layout, before);
}

// --- COLLABORATORS ---

#[test]
fn test_missing_sampler_skips_contrast() {
    let engine = ComplianceEngine::new(Config::default());
    let layout = story_layout(vec![text_block("t", "Hello there", 400, 40, LIGHT_GRAY)]);
    let result = engine.validate(&layout).unwrap();

    assert!(result.has_code("CHECK_SKIPPED:contrast"));
    assert!(!result.has_code(codes::CONTRAST_LOW));
    assert!(result.passed);
}

#[test]
fn test_missing_background_skips_contrast() {
    let mut layout = story_layout(vec![text_block("t", "Hello there", 400, 40, LIGHT_GRAY)]);
    layout.background_ref = None;
    let result = default_engine().validate(&layout).unwrap();

    assert!(result.has_code("CHECK_SKIPPED:contrast"));
}

#[test]
fn test_failing_sampler_never_aborts() {
    let engine = ComplianceEngine::new(Config::default()).with_sampler(Arc::new(BrokenSampler));
    let result = engine.validate(&broken_story()).unwrap();

    let skipped = result
        .issues
        .iter()
        .find(|i| i.code == "CHECK_SKIPPED:contrast")
        .expect("contrast should be reported as skipped");
    assert_eq!(skipped.severity, Severity::Info);
    assert!(skipped.message.contains("image store offline"));
    // Other rules still ran.
    assert!(result.has_code(codes::SAFE_ZONE_TOP));
    assert!(result.has_code(codes::FONT_TOO_SMALL));
}

#[test]
fn test_failing_matcher_never_aborts() {
    let engine = default_engine().with_matcher(Arc::new(BrokenMatcher));
    let result = engine.validate(&clean_story()).unwrap();

    assert!(result.has_code("CHECK_SKIPPED:semantic"));
    assert!(result.passed);
}

#[test]
fn test_disabled_matcher_is_reported() {
    let engine = default_engine().without_matcher();
    let layout = story_layout(vec![text_block("t", "Win now", 400, 40, Rgb::BLACK)]);
    let result = engine.validate(&layout).unwrap();

    assert!(result.has_code("CHECK_SKIPPED:semantic"));
    assert!(!result.has_code(codes::SEMANTIC_WARNING));
}

#[test]
fn test_ocr_text_is_checked() {
    // Copy is matched as a whole, so keep the image text on its own.
    let mut layout = story_layout(vec![]);
    layout.extra.insert("ocrPackshot".into(), "100% FREE".into());
    layout.extra.insert("campaign".into(), "win now".into()); // not an OCR key

    let result = default_engine().validate(&layout).unwrap();
    let phrases: Vec<&str> = result
        .issues
        .iter()
        .filter(|i| i.code == codes::SEMANTIC_WARNING)
        .filter_map(|i| i.meta.as_ref()?.get("phrase")?.as_str())
        .collect();
    assert_eq!(phrases, vec!["100% free"]);
}

#[test]
fn test_contrast_uses_pixels_behind_the_block() {
    // White canvas with a dark band where the headline sits.
    let mut image = RasterImage::filled(1080, 1920, Rgb::WHITE);
    image.fill_region(adforge::canvas::Region::new(0, 380, 1080, 120), Rgb(20, 20, 20));
    let sampler = RasterSampler::new().with_image("bg-main", image);
    let engine = ComplianceEngine::new(Config::default()).with_sampler(Arc::new(sampler));

    let light = story_layout(vec![text_block("t", "Hello", 400, 40, Rgb::WHITE)]);
    assert!(engine.validate(&light).unwrap().passed);

    let dark = story_layout(vec![text_block("t", "Hello", 400, 40, Rgb::BLACK)]);
    let result = engine.validate(&dark).unwrap();
    assert!(result.has_code(codes::CONTRAST_LOW));
    let meta = result.issues[0].meta.as_ref().unwrap();
    assert_eq!(meta["background"], "#141414");
}

#[test]
fn test_unknown_format_falls_back_to_story() {
    let mut layout = story_layout(vec![text_block("t", "Hello", 150, 40, Rgb::BLACK)]);
    layout.format = "billboard".to_string();
    let result = default_engine().validate(&layout).unwrap();
    assert!(result.has_code(codes::SAFE_ZONE_TOP));

    // The feed profile has a smaller safe zone.
    layout.format = "Feed".to_string();
    let result = default_engine().validate(&layout).unwrap();
    assert!(!result.has_code(codes::SAFE_ZONE_TOP));
}

// --- STRUCTURAL ERRORS ---

#[test]
fn test_duplicate_block_ids_are_rejected() {
    let layout = story_layout(vec![
        text_block("dup", "One", 400, 40, Rgb::BLACK),
        text_block("dup", "Two", 500, 40, Rgb::BLACK),
    ]);
    let err = default_engine().validate(&layout).unwrap_err();
    assert!(matches!(err, CreativeError::DuplicateTextBlock(ref id) if id == "dup"));
    assert!(err.is_structural());
}

#[rstest]
#[case(0, 1920)]
#[case(1080, 0)]
fn test_zero_dimensions_are_rejected(#[case] width: u32, #[case] height: u32) {
    let mut layout = clean_story();
    layout.width = width;
    layout.height = height;
    let err = default_engine().validate(&layout).unwrap_err();
    assert!(matches!(err, CreativeError::NonPositiveDimension { .. }));
}

#[test]
fn test_zero_font_and_empty_text_are_rejected() {
    let layout = story_layout(vec![text_block("t", "Hello", 400, 0, Rgb::BLACK)]);
    assert!(matches!(
        default_engine().validate(&layout),
        Err(CreativeError::NonPositiveFontSize(_))
    ));

    let layout = story_layout(vec![text_block("t", "   ", 400, 40, Rgb::BLACK)]);
    assert!(matches!(
        default_engine().validate(&layout),
        Err(CreativeError::EmptyText(_))
    ));
}
