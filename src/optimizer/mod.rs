//! Hill-climbing repair of non-compliant layouts.
//!
//! Each round materializes the whole single-mutation neighborhood of the
//! current layout, assesses every candidate, and moves to the first
//! candidate (in generation order) that strictly beats both the current
//! layout and every earlier candidate. The search stops at a local optimum
//! or when the iteration budget runs out.
pub mod mutation;
pub mod runner;

pub use self::mutation::{Candidate, Mutation, NeighborhoodOptions};
pub use self::runner::{
    AutoFixResult, HillClimber, NoopObserver, SearchObserver, SearchOptions, StopReason,
};

use crate::canvas::Layout;
use crate::rules::Assessment;
use crate::scorer;
use serde::Serialize;
use std::cmp::Ordering;

const GAP_EPSILON: f64 = 1e-9;

/// How good a layout is, from the controller's point of view.
///
/// Passing beats failing. Passing layouts rank by aesthetic score; failing
/// layouts rank by fewer errors, then by smaller placement gap, then by
/// smaller remaining compliance gap. A failing layout's effective score is
/// always zero, so any accepted step keeps the effective score
/// non-decreasing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fitness {
    pub passed: bool,
    pub score: f64,
    pub errors: usize,
    pub placement_gap: f64,
    pub gap: f64,
}

impl Fitness {
    pub fn of(layout: &Layout, assessment: &Assessment) -> Self {
        let passed = assessment.validation.passed;
        Self {
            passed,
            score: scorer::effective_score(layout, passed),
            errors: assessment.validation.error_count(),
            placement_gap: assessment.placement_gap,
            gap: assessment.gap,
        }
    }

    pub fn compare(&self, other: &Self) -> Ordering {
        match (self.passed, other.passed) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (true, true) => self.score.total_cmp(&other.score),
            (false, false) => other
                .errors
                .cmp(&self.errors)
                .then_with(|| smaller_gap(self.placement_gap, other.placement_gap))
                .then_with(|| smaller_gap(self.gap, other.gap)),
        }
    }

    pub fn improves_on(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Greater
    }
}

fn smaller_gap(a: f64, b: f64) -> Ordering {
    if (a - b).abs() <= GAP_EPSILON {
        Ordering::Equal
    } else {
        b.total_cmp(&a)
    }
}

/// Index of the winning candidate, if any candidate strictly improves on
/// `current`. Ties go to the earliest candidate.
pub fn select_best(current: &Fitness, candidates: &[Fitness]) -> Option<usize> {
    let mut best: Option<(usize, &Fitness)> = None;
    for (i, f) in candidates.iter().enumerate() {
        let bar = best.map_or(current, |(_, b)| b);
        if f.improves_on(bar) {
            best = Some((i, f));
        }
    }
    best.map(|(i, _)| i)
}
