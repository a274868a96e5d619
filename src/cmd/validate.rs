use crate::reports;
use adforge::config::Config;
use adforge::{AdResult, ComplianceEngine, Layout};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short, long)]
    pub layout: PathBuf,

    #[arg(long)]
    pub audit_out: Option<PathBuf>,

    /// Print the audit record as JSON instead of tables
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: ValidateArgs, engine: &ComplianceEngine) -> AdResult<()> {
    let layout = Layout::load_from_file(&args.layout)?;
    let result = engine.validate(&layout)?;
    let record = engine.audit(&result, &[]);

    if args.json {
        println!("{}", record.to_json()?);
    } else {
        println!("\n🔎 === LAYOUT AUDIT === 🔎");
        reports::print_guidelines(engine.guidelines_for(&layout));
        reports::print_layout_blocks(&layout);
        reports::print_issue_table(&result);
        reports::print_verdict(&result);
    }

    if let Some(path) = &args.audit_out {
        super::write_audit(&record, path)?;
    }
    Ok(())
}
