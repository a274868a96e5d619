use crate::canvas::Layout;

pub const BASELINE: f64 = 0.5;
pub const SPARSITY_BONUS_CAP: f64 = 0.3;
pub const SPARSITY_STEP: f64 = 0.05;
pub const SINGLE_PACKSHOT_BONUS: f64 = 0.1;

/// Heuristic soft-quality signal in `[0, 1]`. Fewer text blocks score
/// higher; a single hero packshot earns a bonus.
pub fn score(layout: &Layout) -> f64 {
    let blocks = layout.text_blocks.len() as f64;
    let mut s = BASELINE;
    s += (SPARSITY_BONUS_CAP - SPARSITY_STEP * blocks).max(0.0);
    if layout.packshot_refs.len() == 1 {
        s += SINGLE_PACKSHOT_BONUS;
    }
    s.clamp(0.0, 1.0)
}

/// What the search controller ranks by: the aesthetic score for compliant
/// layouts, zero for anything that fails a hard rule.
pub fn effective_score(layout: &Layout, passed: bool) -> f64 {
    if passed {
        score(layout)
    } else {
        0.0
    }
}
