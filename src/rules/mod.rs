//! Deterministic rule evaluation.
//!
//! Checks always run in the same order: safe zone (top, then bottom),
//! canvas bounds, font size, packshot count, contrast, semantic. External
//! collaborators that are missing or failing never abort evaluation; their
//! check is replaced by an `info`-level `CHECK_SKIPPED:<check>` issue.
pub mod contrast;
pub mod types;

pub use self::types::{codes, Severity, ValidationIssue, ValidationResult};

use self::contrast::contrast_ratio;
use self::types::round2;
use crate::canvas::Layout;
use crate::collab::{PixelSampler, SemanticMatcher};
use crate::config::RuleSettings;
use crate::error::AdResult;
use crate::guidelines::GuidelineConfig;
use serde_json::json;
use tracing::{debug, warn};

/// Everything a rule pass needs besides the layout.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub guidelines: &'a GuidelineConfig,
    pub settings: &'a RuleSettings,
    pub sampler: Option<&'a dyn PixelSampler>,
    pub matcher: Option<&'a dyn SemanticMatcher>,
}

/// A validation result plus how far the layout is from compliance.
///
/// Shortfalls are normalized and summed over error-severity findings only.
/// Placement findings (safe zones, canvas bounds) are kept apart from the
/// rest so the search never trades a block's position for anything else.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub validation: ValidationResult,
    pub placement_gap: f64,
    pub gap: f64,
}

/// Rejects structurally malformed layouts, then runs every rule.
pub fn evaluate(layout: &Layout, ctx: &RuleContext) -> AdResult<ValidationResult> {
    layout.check_structure()?;
    Ok(assess(layout, ctx).validation)
}

/// Rule pass without the structural gate. Callers must have checked the
/// layout's structure already.
pub fn assess(layout: &Layout, ctx: &RuleContext) -> Assessment {
    let mut findings = Findings::default();

    check_safe_zone(layout, ctx.guidelines, &mut findings);
    check_bounds(layout, &mut findings);
    check_font_sizes(layout, ctx.guidelines, &mut findings);
    check_packshot_count(layout, ctx.guidelines, &mut findings);
    check_contrast(layout, ctx, &mut findings);
    check_semantics(layout, ctx, &mut findings);

    let validation = ValidationResult::from_issues(&layout.id, findings.issues);
    debug!(
        "assessed '{}': passed={} errors={} placement={:.3} gap={:.3}",
        layout.id,
        validation.passed,
        validation.error_count(),
        findings.placement_gap,
        findings.gap
    );
    Assessment {
        validation,
        placement_gap: findings.placement_gap,
        gap: findings.gap,
    }
}

#[derive(Default)]
struct Findings {
    issues: Vec<ValidationIssue>,
    placement_gap: f64,
    gap: f64,
}

impl Findings {
    fn push(&mut self, issue: ValidationIssue, shortfall: f64) {
        if issue.is_error() {
            self.gap += shortfall;
        }
        self.issues.push(issue);
    }

    fn push_placement(&mut self, issue: ValidationIssue, shortfall: f64) {
        if issue.is_error() {
            self.placement_gap += shortfall;
        }
        self.issues.push(issue);
    }
}

fn check_safe_zone(layout: &Layout, cfg: &GuidelineConfig, out: &mut Findings) {
    for tb in &layout.text_blocks {
        if tb.y < cfg.top_safe_zone_px {
            let issue = ValidationIssue::new(
                codes::SAFE_ZONE_TOP,
                format!(
                    "Text '{}' is in top safe zone (y={} < {}px).",
                    tb.excerpt(),
                    tb.y,
                    cfg.top_safe_zone_px
                ),
                Severity::Error,
            )
            .with_meta(json!({ "blockId": tb.id, "y": tb.y, "minY": cfg.top_safe_zone_px }));

            let zone = f64::from(cfg.top_safe_zone_px.max(1));
            let shortfall = (i64::from(cfg.top_safe_zone_px) - i64::from(tb.y)) as f64;
            out.push_placement(issue, shortfall / zone);
        }
    }

    if cfg.bottom_safe_zone_px <= 0 {
        return;
    }
    let max_bottom = i64::from(layout.height) - i64::from(cfg.bottom_safe_zone_px);
    for tb in &layout.text_blocks {
        let bottom = i64::from(tb.y) + i64::from(tb.bounding_box().h);
        if bottom > max_bottom {
            let issue = ValidationIssue::new(
                codes::SAFE_ZONE_BOTTOM,
                format!(
                    "Text '{}' reaches into bottom safe zone (bottom={} > {}px).",
                    tb.excerpt(),
                    bottom,
                    max_bottom
                ),
                Severity::Error,
            )
            .with_meta(json!({ "blockId": tb.id, "bottom": bottom, "maxBottom": max_bottom }));

            let zone = f64::from(cfg.bottom_safe_zone_px);
            out.push_placement(issue, (bottom - max_bottom) as f64 / zone);
        }
    }
}

/// Every block's estimated box must lie within `[0, width] x [0, height]`.
fn check_bounds(layout: &Layout, out: &mut Findings) {
    let width = i64::from(layout.width);
    let height = i64::from(layout.height);

    for tb in &layout.text_blocks {
        let b = tb.bounding_box();
        let (x0, y0) = (i64::from(b.x), i64::from(b.y));
        let (x1, y1) = (x0 + i64::from(b.w), y0 + i64::from(b.h));

        let overflow_x = (-x0).max(0) + (x1 - width).max(0);
        let overflow_y = (-y0).max(0) + (y1 - height).max(0);
        if overflow_x == 0 && overflow_y == 0 {
            continue;
        }

        let issue = ValidationIssue::new(
            codes::OUT_OF_BOUNDS,
            format!(
                "Text '{}' box ({}, {})-({}, {}) leaves the {}x{} canvas.",
                tb.excerpt(),
                x0,
                y0,
                x1,
                y1,
                layout.width,
                layout.height
            ),
            Severity::Error,
        )
        .with_meta(json!({
            "blockId": tb.id,
            "box": [x0, y0, x1, y1],
            "overflowX": overflow_x,
            "overflowY": overflow_y,
        }));
        let shortfall =
            overflow_x as f64 / width.max(1) as f64 + overflow_y as f64 / height.max(1) as f64;
        out.push_placement(issue, shortfall);
    }
}

fn check_font_sizes(layout: &Layout, cfg: &GuidelineConfig, out: &mut Findings) {
    for tb in &layout.text_blocks {
        if tb.font_size_px < cfg.min_font_px {
            let issue = ValidationIssue::new(
                codes::FONT_TOO_SMALL,
                format!(
                    "Text '{}' font {}px < {}px.",
                    tb.excerpt(),
                    tb.font_size_px,
                    cfg.min_font_px
                ),
                Severity::Error,
            )
            .with_meta(json!({
                "blockId": tb.id,
                "fontSizePx": tb.font_size_px,
                "minFontPx": cfg.min_font_px,
            }));

            let shortfall = f64::from(cfg.min_font_px - tb.font_size_px) / f64::from(cfg.min_font_px);
            out.push(issue, shortfall);
        }
    }
}

fn check_packshot_count(layout: &Layout, cfg: &GuidelineConfig, out: &mut Findings) {
    let count = layout.packshot_refs.len();
    if count > cfg.max_packshots {
        let issue = ValidationIssue::new(
            codes::TOO_MANY_PACKSHOTS,
            format!("{} packshots > allowed {}.", count, cfg.max_packshots),
            Severity::Error,
        )
        .with_meta(json!({ "count": count, "max": cfg.max_packshots }));
        out.push(issue, (count - cfg.max_packshots) as f64);
    }
}

fn check_contrast(layout: &Layout, ctx: &RuleContext, out: &mut Findings) {
    const CHECK: &str = "contrast";

    let Some(sampler) = ctx.sampler else {
        out.push(ValidationIssue::skipped(CHECK, "no pixel sampler configured"), 0.0);
        return;
    };
    let Some(background) = layout.background_ref.as_deref() else {
        out.push(ValidationIssue::skipped(CHECK, "layout has no background image"), 0.0);
        return;
    };

    let min_ratio = ctx.guidelines.min_contrast_ratio;
    let severity = ctx.settings.contrast_severity;

    // Sample every block first so a failing sampler leaves no partial results.
    let samples: Result<Vec<_>, _> = layout
        .text_blocks
        .iter()
        .map(|tb| {
            sampler
                .sample_region_average(background, tb.bounding_box())
                .map(|bg| (tb, bg))
        })
        .collect();

    let samples = match samples {
        Ok(s) => s,
        Err(e) => {
            warn!("contrast check skipped for '{}': {}", layout.id, e);
            out.push(ValidationIssue::skipped(CHECK, e), 0.0);
            return;
        }
    };

    for (tb, bg) in samples {
        let ratio = contrast_ratio(tb.color, bg);
        if ratio < min_ratio {
            let issue = ValidationIssue::new(
                codes::CONTRAST_LOW,
                format!(
                    "Text '{}' contrast {:.2} < {} against background {}.",
                    tb.excerpt(),
                    ratio,
                    min_ratio,
                    bg
                ),
                severity,
            )
            .with_meta(json!({
                "blockId": tb.id,
                "ratio": round2(ratio),
                "min": min_ratio,
                "background": bg.to_hex(),
            }));
            out.push(issue, (min_ratio - ratio) / min_ratio);
        }
    }
}

/// Block copy in block order, then OCR signals from `extra` in key order.
pub fn collect_copy(layout: &Layout) -> String {
    layout
        .text_blocks
        .iter()
        .map(|tb| tb.text.as_str())
        .chain(
            layout
                .extra
                .iter()
                .filter(|(k, _)| k.starts_with("ocr"))
                .map(|(_, v)| v.as_str()),
        )
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn check_semantics(layout: &Layout, ctx: &RuleContext, out: &mut Findings) {
    const CHECK: &str = "semantic";

    let Some(matcher) = ctx.matcher else {
        out.push(ValidationIssue::skipped(CHECK, "no semantic matcher configured"), 0.0);
        return;
    };

    let copy = collect_copy(layout);
    if copy.is_empty() {
        return;
    }

    match matcher.find_banned_matches(&copy) {
        Ok(matches) => {
            let threshold = ctx.settings.semantic_threshold;
            for m in matches.into_iter().filter(|m| m.similarity >= threshold) {
                let issue = ValidationIssue::new(
                    codes::SEMANTIC_WARNING,
                    format!(
                        "Copy resembles banned phrase '{}' (similarity {:.2}).",
                        m.phrase, m.similarity
                    ),
                    Severity::Warning,
                )
                .with_meta(json!({ "phrase": m.phrase, "similarity": round2(m.similarity) }));
                out.push(issue, 0.0);
            }
        }
        Err(e) => {
            warn!("semantic check skipped for '{}': {}", layout.id, e);
            out.push(ValidationIssue::skipped(CHECK, e), 0.0);
        }
    }
}
