use regex::Regex;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
    layout_path: PathBuf,
}

impl TestContext {
    fn new(layout: Value) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let layout_path = dir.path().join("layout.json");
        fs::write(&layout_path, layout.to_string()).unwrap();
        Self { dir, layout_path }
    }

    fn story() -> Self {
        Self::new(json!({
            "id": "cli-story",
            "format": "story",
            "width": 1080,
            "height": 1920,
            "backgroundRef": "bg",
            "textBlocks": [{
                "id": "headline",
                "text": "Fresh summer deals",
                "fontSizePx": 18,
                "color": [220, 220, 220],
                "x": 80,
                "y": 48
            }]
        }))
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_adforge"))
            .args(args)
            .output()
            .expect("Failed to execute adforge")
    }

    fn layout(&self) -> &str {
        self.layout_path.to_str().unwrap()
    }
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn test_validate_json() {
    let ctx = TestContext::story();
    let out = ctx.run(&["validate", "--layout", ctx.layout(), "--json"]);
    let audit = stdout_json(&out);

    assert_eq!(audit["layoutId"], "cli-story");
    assert_eq!(audit["passed"], false);
    assert_eq!(audit["summary"]["error"], 3);
}

#[test]
fn test_validate_table_output() {
    let ctx = TestContext::story();
    let out = ctx.run(&["validate", "--layout", ctx.layout()]);
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("SAFE_ZONE_TOP"));
    assert!(stdout.contains("CONTRAST_LOW"));
    let verdict = Regex::new(r"Verdict: FAILED \(errors: (\d+), warnings: \d+, info: \d+\)").unwrap();
    let caps = verdict.captures(&stdout).expect("verdict line missing");
    assert_eq!(&caps[1], "3");
}

#[test]
fn test_dark_background_flag() {
    let ctx = TestContext::story();
    let out = ctx.run(&[
        "--background-color",
        "#101010",
        "validate",
        "--layout",
        ctx.layout(),
        "--json",
    ]);
    let audit = stdout_json(&out);
    // Light text on a dark background: only geometry errors remain.
    assert_eq!(audit["summary"]["error"], 2);
}

#[test]
fn test_autofix_writes_outputs() {
    let ctx = TestContext::story();
    let fixed_path = ctx.path("fixed.json");
    let audit_path = ctx.path("audit/report.json");

    let out = ctx.run(&[
        "autofix",
        "--layout",
        ctx.layout(),
        "--max-iters",
        "30",
        "--output",
        fixed_path.to_str().unwrap(),
        "--audit-out",
        audit_path.to_str().unwrap(),
        "--json",
    ]);
    let result = stdout_json(&out);
    assert_eq!(result["stopReason"], "converged");
    assert_eq!(result["layout"]["textBlocks"][0]["y"], 208);

    let fixed: Value = serde_json::from_str(&fs::read_to_string(&fixed_path).unwrap()).unwrap();
    assert_eq!(fixed["textBlocks"][0]["fontSizePx"], 20);

    let audit: Value = serde_json::from_str(&fs::read_to_string(&audit_path).unwrap()).unwrap();
    assert_eq!(audit["appliedFixes"].as_array().unwrap().len(), 5);

    let csv_text = fs::read_to_string(ctx.path("audit/report.csv")).unwrap();
    assert!(csv_text.starts_with("code,message,severity"));
    assert!(csv_text.contains("CONTRAST_LOW"));
}

#[test]
fn test_csv_audit_path_keeps_json() {
    let ctx = TestContext::story();
    let audit_path = ctx.path("report.csv");

    let out = ctx.run(&[
        "autofix",
        "--layout",
        ctx.layout(),
        "--audit-out",
        audit_path.to_str().unwrap(),
        "--json",
    ]);
    stdout_json(&out);

    let audit: Value = serde_json::from_str(&fs::read_to_string(&audit_path).unwrap())
        .expect("audit path should still hold JSON");
    assert_eq!(audit["layoutId"], "cli-story");

    let csv_text = fs::read_to_string(ctx.path("report.audit.csv")).unwrap();
    assert!(csv_text.starts_with("code,message,severity"));
}

#[test]
fn test_autofix_with_recolor_passes() {
    let ctx = TestContext::story();
    let out = ctx.run(&["autofix", "--layout", ctx.layout(), "--allow-recolor", "--json"]);
    let result = stdout_json(&out);
    assert_eq!(result["validation"]["passed"], true);
}

#[test]
fn test_autofix_progress_lines() {
    let ctx = TestContext::story();
    let out = ctx.run(&["autofix", "--layout", ctx.layout()]);
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    let step = Regex::new(r"(?m)^Step\s+\d+ \| errors\s+\d+ \|").unwrap();
    assert_eq!(step.find_iter(&stdout).count(), 5);
    assert!(stdout.contains("Moved text 'headline' down 40px (y 168 -> 208)"));
}

#[test]
fn test_config_file_and_override() {
    let ctx = TestContext::story();
    let cfg_path = ctx.path("config.json");
    fs::write(&cfg_path, r#"{ "search": { "max_iters": 1 } }"#).unwrap();
    let cfg = cfg_path.to_str().unwrap();

    let out = ctx.run(&["--config-file", cfg, "autofix", "--layout", ctx.layout(), "--json"]);
    let result = stdout_json(&out);
    assert_eq!(result["iterations"], 1);
    assert_eq!(result["stopReason"], "budgetExhausted");

    // An explicit flag beats the file.
    let out = ctx.run(&[
        "--config-file",
        cfg,
        "autofix",
        "--layout",
        ctx.layout(),
        "--max-iters",
        "30",
        "--json",
    ]);
    let result = stdout_json(&out);
    assert_eq!(result["iterations"], 5);
}

#[test]
fn test_structural_error_exits_nonzero() {
    let ctx = TestContext::new(json!({
        "id": "dup",
        "format": "story",
        "width": 1080,
        "height": 1920,
        "textBlocks": [
            { "id": "a", "text": "One", "fontSizePx": 30, "color": "#000000", "x": 0, "y": 300 },
            { "id": "a", "text": "Two", "fontSizePx": 30, "color": "#000000", "x": 0, "y": 400 }
        ]
    }));
    let out = ctx.run(&["validate", "--layout", ctx.layout()]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Duplicate text block id 'a'"));
}

#[test]
fn test_missing_layout_file_fails() {
    let ctx = TestContext::story();
    let missing = ctx.path("nope.json");
    let out = ctx.run(&["validate", "--layout", missing.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
}
