pub mod autofix;
pub mod validate;

use adforge::audit::AuditRecord;
use adforge::AdResult;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// CSV sibling of a JSON audit path: `report.json` -> `report.csv`,
/// but `report.csv` -> `report.audit.csv` so the JSON is not overwritten.
fn csv_sibling(path: &Path) -> PathBuf {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        path.with_extension("audit.csv")
    } else {
        path.with_extension("csv")
    }
}

/// Writes the record as JSON at `path` and as CSV next to it.
pub fn write_audit(record: &AuditRecord, path: &Path) -> AdResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, record.to_json()?)?;

    let csv_path = csv_sibling(path);
    fs::write(&csv_path, record.to_csv()?)?;

    info!("📝 Audit written to {:?} and {:?}", path, csv_path);
    Ok(())
}
