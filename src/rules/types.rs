use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Ordered `Info < Warning < Error`. Only `Error` blocks a layout.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

pub mod codes {
    pub const SAFE_ZONE_TOP: &str = "SAFE_ZONE_TOP";
    pub const SAFE_ZONE_BOTTOM: &str = "SAFE_ZONE_BOTTOM";
    pub const OUT_OF_BOUNDS: &str = "OUT_OF_BOUNDS";
    pub const FONT_TOO_SMALL: &str = "FONT_TOO_SMALL";
    pub const TOO_MANY_PACKSHOTS: &str = "TOO_MANY_PACKSHOTS";
    pub const CONTRAST_LOW: &str = "CONTRAST_LOW";
    pub const SEMANTIC_WARNING: &str = "SEMANTIC_WARNING";
    pub const CHECK_SKIPPED: &str = "CHECK_SKIPPED";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub code: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl ValidationIssue {
    pub fn new(code: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    /// `info CHECK_SKIPPED:<check>` recorded when a collaborator is missing or failing.
    pub fn skipped(check: &str, reason: impl std::fmt::Display) -> Self {
        Self::new(
            format!("{}:{}", codes::CHECK_SKIPPED, check),
            format!("Check '{}' skipped: {}", check, reason),
            Severity::Info,
        )
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// `passed` is always derived from `issues`; a stored value is ignored
/// when reading a result back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredValidation")]
pub struct ValidationResult {
    pub layout_id: String,
    pub issues: Vec<ValidationIssue>,
    pub passed: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredValidation {
    layout_id: String,
    #[serde(default)]
    issues: Vec<ValidationIssue>,
}

impl From<StoredValidation> for ValidationResult {
    fn from(stored: StoredValidation) -> Self {
        Self::from_issues(stored.layout_id, stored.issues)
    }
}

impl ValidationResult {
    pub fn from_issues(layout_id: impl Into<String>, issues: Vec<ValidationIssue>) -> Self {
        let passed = !issues.iter().any(ValidationIssue::is_error);
        Self {
            layout_id: layout_id.into(),
            issues,
            passed,
        }
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.code.as_str()).collect()
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
