use crate::error::{AdResult, CreativeError};
use crate::rules::{Severity, ValidationIssue, ValidationResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SeveritySummary {
    pub info: usize,
    pub warning: usize,
    pub error: usize,
}

/// Externally consumable record of one validation/repair outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub layout_id: String,
    pub passed: bool,
    pub summary: SeveritySummary,
    pub issues: Vec<ValidationIssue>,
    pub applied_fixes: Vec<String>,
}

pub fn format_audit(validation: &ValidationResult, applied_fixes: &[String]) -> AuditRecord {
    AuditRecord {
        layout_id: validation.layout_id.clone(),
        passed: validation.passed,
        summary: SeveritySummary {
            info: validation.count(Severity::Info),
            warning: validation.count(Severity::Warning),
            error: validation.count(Severity::Error),
        },
        issues: validation.issues.clone(),
        applied_fixes: applied_fixes.to_vec(),
    }
}

impl AuditRecord {
    pub fn to_json(&self) -> AdResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One `code,message,severity` row per issue, with a header.
    pub fn to_csv(&self) -> AdResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["code", "message", "severity"])?;
        for issue in &self.issues {
            let severity = issue.severity.to_string();
            writer.write_record([issue.code.as_str(), issue.message.as_str(), severity.as_str()])?;
        }
        let bytes = writer.into_inner().map_err(|e| {
            CreativeError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
