use crate::canvas::Layout;
use crate::collab::{PixelSampler, SampleCache};
use crate::config::Config;
use crate::error::AdResult;
use crate::optimizer::mutation::{self, NeighborhoodOptions};
use crate::optimizer::{select_best, Fitness};
use crate::rules::{self, Assessment, RuleContext, ValidationResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub max_iters: usize,
    pub allow_recolor: bool,
    pub explore_seed: Option<u64>,
    pub parallel: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SearchOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            max_iters: cfg.search.max_iters,
            allow_recolor: cfg.search.allow_recolor,
            explore_seed: cfg.search.explore_seed,
            parallel: !cfg.search.sequential,
        }
    }
}

impl SearchOptions {
    fn neighborhood(&self, iteration: usize) -> NeighborhoodOptions {
        NeighborhoodOptions {
            allow_recolor: self.allow_recolor,
            jitter_seed: self
                .explore_seed
                .map(|s| s.wrapping_add(iteration as u64)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StopReason {
    /// No neighbor strictly improved on the current layout.
    Converged,
    /// The iteration budget ran out first. The result is the best layout found.
    BudgetExhausted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoFixResult {
    pub layout: Layout,
    pub applied_fixes: Vec<String>,
    pub validation: ValidationResult,
    pub score: f64,
    pub iterations: usize,
    pub stop_reason: StopReason,
}

/// Receives every accepted step of a search.
pub trait SearchObserver {
    fn on_step(&self, iteration: usize, fitness: &Fitness, fix: &str);
}

pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_step(&self, _iteration: usize, _fitness: &Fitness, _fix: &str) {}
}

pub struct HillClimber<'a> {
    ctx: RuleContext<'a>,
    options: SearchOptions,
}

impl<'a> HillClimber<'a> {
    pub fn new(ctx: RuleContext<'a>, options: SearchOptions) -> Self {
        Self { ctx, options }
    }

    /// Repairs a copy of `layout`. The input is never modified.
    pub fn run<O: SearchObserver>(&self, layout: &Layout, observer: &O) -> AdResult<AutoFixResult> {
        layout.check_structure()?;

        // Background samples are reused across every candidate of this run.
        let cache = self.ctx.sampler.map(SampleCache::new);
        let ctx = RuleContext {
            sampler: cache.as_ref().map(|c| c as &dyn PixelSampler),
            ..self.ctx
        };

        let start = Instant::now();
        let mut current = layout.clone();
        let mut current_assessment = rules::assess(&current, &ctx);
        let mut current_fit = Fitness::of(&current, &current_assessment);
        let mut applied_fixes = Vec::new();
        let mut stop_reason = StopReason::BudgetExhausted;

        info!(
            "Autofix '{}': start passed={} errors={} budget={}",
            layout.id, current_fit.passed, current_fit.errors, self.options.max_iters
        );

        for iteration in 0..self.options.max_iters {
            let mut candidates = mutation::neighbors(&current, &self.options.neighborhood(iteration));

            let mut assessments: Vec<Assessment> = if self.options.parallel {
                candidates
                    .par_iter()
                    .map(|c| rules::assess(&c.layout, &ctx))
                    .collect()
            } else {
                candidates
                    .iter()
                    .map(|c| rules::assess(&c.layout, &ctx))
                    .collect()
            };

            let fits: Vec<Fitness> = candidates
                .iter()
                .zip(&assessments)
                .map(|(c, a)| Fitness::of(&c.layout, a))
                .collect();

            let Some(best) = select_best(&current_fit, &fits) else {
                debug!(
                    "iteration {}: none of {} neighbors improves",
                    iteration,
                    candidates.len()
                );
                stop_reason = StopReason::Converged;
                break;
            };

            let chosen = candidates.swap_remove(best);
            let fix = chosen.mutation.to_string();
            info!(
                "Step {:3} | {} | passed={} errors={} placement={:.3} gap={:.3}",
                iteration + 1,
                fix,
                fits[best].passed,
                fits[best].errors,
                fits[best].placement_gap,
                fits[best].gap
            );
            observer.on_step(iteration, &fits[best], &fix);

            current = chosen.layout;
            current_assessment = assessments.swap_remove(best);
            current_fit = fits[best];
            applied_fixes.push(fix);
        }

        info!(
            "Autofix '{}': {:?} after {} step(s) in {:.2?}, passed={}",
            layout.id,
            stop_reason,
            applied_fixes.len(),
            start.elapsed(),
            current_fit.passed
        );
        if let Some(c) = &cache {
            debug!("sample cache held {} region(s)", c.len());
        }

        Ok(AutoFixResult {
            layout: current,
            iterations: applied_fixes.len(),
            applied_fixes,
            validation: current_assessment.validation,
            score: current_fit.score,
            stop_reason,
        })
    }
}
