use adforge::guidelines::GuidelineConfig;
use adforge::rules::{Severity, ValidationResult};
use adforge::Layout;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Info => Color::Cyan,
    }
}

pub fn print_guidelines(cfg: &GuidelineConfig) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Profile").add_attribute(Attribute::Bold),
        Cell::new("Safe Top"),
        Cell::new("Safe Bottom"),
        Cell::new("Min Font"),
        Cell::new("Min Contrast"),
        Cell::new("Packshots"),
        Cell::new("Canvas"),
    ]);
    table.add_row(vec![
        Cell::new(&cfg.name).add_attribute(Attribute::Bold),
        Cell::new(format!("{}px", cfg.top_safe_zone_px)),
        Cell::new(format!("{}px", cfg.bottom_safe_zone_px)),
        Cell::new(format!("{}px", cfg.min_font_px)),
        Cell::new(format!("{:.1}", cfg.min_contrast_ratio)),
        Cell::new(cfg.max_packshots),
        Cell::new(format!("{}x{}", cfg.canvas_width, cfg.canvas_height)),
    ]);
    println!("{}", table);
}

pub fn print_layout_blocks(layout: &Layout) {
    println!("\nLayout: {} ({}, {}x{})", layout.id, layout.format, layout.width, layout.height);
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Block").add_attribute(Attribute::Bold),
        Cell::new("Text"),
        Cell::new("X"),
        Cell::new("Y"),
        Cell::new("Font"),
        Cell::new("Color"),
    ]);
    for i in 2..=4 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for tb in &layout.text_blocks {
        table.add_row(vec![
            Cell::new(&tb.id).add_attribute(Attribute::Bold),
            Cell::new(tb.excerpt()),
            Cell::new(tb.x),
            Cell::new(tb.y),
            Cell::new(format!("{}px", tb.font_size_px)),
            Cell::new(tb.color.to_hex()),
        ]);
    }
    println!("{}", table);
}

pub fn print_issue_table(result: &ValidationResult) {
    if result.issues.is_empty() {
        println!("\n✅ No issues.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Severity"),
        Cell::new("Code"),
        Cell::new("Message"),
    ]);

    for (i, issue) in result.issues.iter().enumerate() {
        let color = severity_color(issue.severity);
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(issue.severity).fg(color),
            Cell::new(&issue.code).fg(color),
            Cell::new(&issue.message),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_fix_list(fixes: &[String]) {
    if fixes.is_empty() {
        println!("\nNo fixes applied.");
        return;
    }
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Step").add_attribute(Attribute::Bold),
        Cell::new("Applied Fix"),
    ]);
    for (i, fix) in fixes.iter().enumerate() {
        table.add_row(vec![Cell::new(i + 1), Cell::new(fix)]);
    }
    println!("\n{}", table);
}

pub fn print_verdict(result: &ValidationResult) {
    println!(
        "\nVerdict: {} (errors: {}, warnings: {}, info: {})",
        if result.passed { "PASSED" } else { "FAILED" },
        result.count(Severity::Error),
        result.count(Severity::Warning),
        result.count(Severity::Info)
    );
}
