use crate::reports;
use adforge::config::Config;
use adforge::optimizer::{Fitness, SearchObserver};
use adforge::{AdResult, ComplianceEngine, Layout};
use clap::Args;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct AutofixArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short, long)]
    pub layout: PathBuf,

    /// Where to write the repaired layout JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub audit_out: Option<PathBuf>,

    /// Print the full autofix result as JSON instead of tables
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

struct ConsoleProgress {
    quiet: bool,
}

impl SearchObserver for ConsoleProgress {
    fn on_step(&self, iteration: usize, fitness: &Fitness, fix: &str) {
        if self.quiet {
            return;
        }
        println!(
            "Step {:3} | errors {:2} | placement {:6.3} | gap {:6.3} | score {:.2} | {}",
            iteration + 1,
            fitness.errors,
            fitness.placement_gap,
            fitness.gap,
            fitness.score,
            fix
        );
    }
}

pub fn run(args: AutofixArgs, engine: &ComplianceEngine) -> AdResult<()> {
    let layout = Layout::load_from_file(&args.layout)?;
    let max_iters = engine.config().search.max_iters;

    if !args.json {
        println!("\n🔧 === AUTOFIX (budget: {} iterations) === 🔧", max_iters);
        reports::print_layout_blocks(&layout);
    }

    let progress = ConsoleProgress { quiet: args.json };
    let result = engine.autofix_observed(&layout, max_iters, &progress)?;
    let record = engine.audit(&result.validation, &result.applied_fixes);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("\n=== 🏁 RESULT ({:?}) ===", result.stop_reason);
        reports::print_fix_list(&result.applied_fixes);
        reports::print_layout_blocks(&result.layout);
        reports::print_issue_table(&result.validation);
        reports::print_verdict(&result.validation);
    }

    if let Some(path) = &args.output {
        fs::write(path, serde_json::to_string_pretty(&result.layout)?)?;
    }
    if let Some(path) = &args.audit_out {
        super::write_audit(&record, path)?;
    }
    Ok(())
}
