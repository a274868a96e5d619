use crate::audit::{format_audit, AuditRecord};
use crate::canvas::Layout;
use crate::collab::{PixelSampler, SemanticMatcher};
use crate::config::Config;
use crate::error::AdResult;
use crate::guidelines::{GuidelineConfig, GuidelineTable};
use crate::optimizer::{AutoFixResult, HillClimber, NoopObserver, SearchObserver, SearchOptions};
use crate::rules::{self, RuleContext, ValidationResult};
use std::sync::Arc;
use tracing::info;

/// Entry point for the surrounding application. Holds configuration and
/// collaborators; validation and repair calls share no mutable state.
#[derive(Clone)]
pub struct ComplianceEngine {
    config: Config,
    guidelines: GuidelineTable,
    sampler: Option<Arc<dyn PixelSampler>>,
    matcher: Option<Arc<dyn SemanticMatcher>>,
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl ComplianceEngine {
    /// Built-in guideline profiles, no pixel sampler, and a lexical matcher
    /// built from the rule settings.
    pub fn new(config: Config) -> Self {
        let matcher: Arc<dyn SemanticMatcher> = Arc::new(config.rules.build_matcher());
        Self {
            config,
            guidelines: GuidelineTable::default(),
            sampler: None,
            matcher: Some(matcher),
        }
    }

    pub fn with_guidelines(mut self, guidelines: GuidelineTable) -> Self {
        self.guidelines = guidelines;
        self
    }

    pub fn with_sampler(mut self, sampler: Arc<dyn PixelSampler>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn SemanticMatcher>) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn without_matcher(mut self) -> Self {
        self.matcher = None;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn guidelines_for(&self, layout: &Layout) -> &GuidelineConfig {
        self.guidelines.config_for(&layout.format)
    }

    fn context<'a>(&'a self, layout: &Layout) -> RuleContext<'a> {
        RuleContext {
            guidelines: self.guidelines.config_for(&layout.format),
            settings: &self.config.rules,
            sampler: self.sampler.as_deref(),
            matcher: self.matcher.as_deref(),
        }
    }

    pub fn validate(&self, layout: &Layout) -> AdResult<ValidationResult> {
        let result = rules::evaluate(layout, &self.context(layout))?;
        info!(
            "Validated '{}' ({}): passed={} issues={}",
            layout.id,
            self.guidelines_for(layout).name,
            result.passed,
            result.issues.len()
        );
        Ok(result)
    }

    pub fn autofix(&self, layout: &Layout, max_iters: usize) -> AdResult<AutoFixResult> {
        self.autofix_observed(layout, max_iters, &NoopObserver)
    }

    pub fn autofix_observed<O: SearchObserver>(
        &self,
        layout: &Layout,
        max_iters: usize,
        observer: &O,
    ) -> AdResult<AutoFixResult> {
        let options = SearchOptions {
            max_iters,
            ..SearchOptions::from(&self.config)
        };
        HillClimber::new(self.context(layout), options).run(layout, observer)
    }

    pub fn audit(&self, validation: &ValidationResult, applied_fixes: &[String]) -> AuditRecord {
        format_audit(validation, applied_fixes)
    }
}
