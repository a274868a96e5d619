use crate::collab::matcher::{DEFAULT_BANNED_PHRASES, DEFAULT_SIMILARITY_THRESHOLD};
use crate::collab::LexicalMatcher;
use crate::error::{AdResult, CreativeError};
use crate::rules::Severity;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub rules: RuleSettings,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    #[arg(long, default_value_t = 20)]
    pub max_iters: usize,

    // Adds black/white recolor moves to the neighborhood
    #[arg(long, default_value_t = false)]
    pub allow_recolor: bool,

    // Adds one seeded random downward jitter per block
    #[arg(long)]
    pub explore_seed: Option<u64>,

    // Assess neighbors on the calling thread instead of the rayon pool
    #[arg(long, default_value_t = false)]
    pub sequential: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_iters: 20,
            allow_recolor: false,
            explore_seed: None,
            sequential: false,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    #[arg(long, default_value_t = Severity::Error)]
    pub contrast_severity: Severity,

    #[arg(long, default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
    pub semantic_threshold: f64,

    #[arg(
        long,
        default_value = "eco-friendly,100% free,win now,guaranteed,limited time,deal expires,best ever,miracle,clinically proven"
    )]
    pub banned_phrases: String,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            contrast_severity: Severity::Error,
            semantic_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            banned_phrases: DEFAULT_BANNED_PHRASES.join(","),
        }
    }
}

impl RuleSettings {
    pub fn get_banned_phrases(&self) -> Vec<String> {
        self.banned_phrases
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn build_matcher(&self) -> LexicalMatcher {
        LexicalMatcher::new(self.get_banned_phrases(), self.semantic_threshold)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AdResult<Self> {
        let content = fs::read_to_string(path)?;
        let cfg: Config = serde_json::from_str(&content)?;
        cfg.check()?;
        Ok(cfg)
    }

    pub fn check(&self) -> AdResult<()> {
        if !(0.0..=1.0).contains(&self.rules.semantic_threshold) {
            return Err(CreativeError::Config(format!(
                "semantic_threshold must be within [0, 1], got {}",
                self.rules.semantic_threshold
            )));
        }
        Ok(())
    }

    /// Overlays only the flags the user actually typed onto `self`.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(search.max_iters);
        update_if_present!(search.allow_recolor);
        update_if_present!(search.explore_seed);
        update_if_present!(search.sequential);

        update_if_present!(rules.contrast_severity);
        update_if_present!(rules.semantic_threshold);
        update_if_present!(rules.banned_phrases);
    }
}
