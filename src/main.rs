use adforge::collab::SolidBackground;
use adforge::config::Config;
use adforge::guidelines::GuidelineTable;
use adforge::{ComplianceEngine, Rgb};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file; explicit flags override its values
    #[arg(global = true, long)]
    config_file: Option<String>,

    /// JSON guideline profiles keyed by format name
    #[arg(global = true, short, long)]
    guidelines: Option<String>,

    /// Flat background color behind every layout ('#rrggbb' or 'r,g,b')
    #[arg(global = true, short, long, default_value = "255,255,255")]
    background_color: String,

    #[arg(global = true, long, default_value_t = false)]
    no_semantic: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Validate(cmd::validate::ValidateArgs),
    Autofix(cmd::autofix::AutofixArgs),
}

fn resolve_config(path: Option<&str>, cli_config: &Config, sub_matches: &ArgMatches) -> Config {
    let Some(path) = path else {
        return cli_config.clone();
    };

    info!("⚙️  Loading config from: {}", path);
    match Config::load_from_file(path) {
        Ok(mut file_config) => {
            file_config.merge_from_cli(cli_config, sub_matches);
            file_config
        }
        Err(e) => {
            error!("❌ Failed to load config '{}': {}", path, e);
            process::exit(1);
        }
    }
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let (cli_config, sub_name) = match &cli.command {
        Commands::Validate(args) => (&args.config, "validate"),
        Commands::Autofix(args) => (&args.config, "autofix"),
    };
    let Some(sub_matches) = matches.subcommand_matches(sub_name) else {
        error!("missing subcommand matches for '{}'", sub_name);
        process::exit(1);
    };
    let config = resolve_config(cli.config_file.as_deref(), cli_config, sub_matches);
    if let Err(e) = config.check() {
        error!("❌ {}", e);
        process::exit(1);
    }

    let guidelines = match &cli.guidelines {
        Some(path) => {
            info!("📐 Loading guidelines from: {}", path);
            let table = GuidelineTable::load_from_file(path).unwrap_or_else(|e| {
                error!("❌ Failed to load guidelines '{}': {}", path, e);
                process::exit(1);
            });
            info!("📐 Profiles: {}", table.formats().join(", "));
            table
        }
        None => GuidelineTable::default(),
    };

    let background: Rgb = cli.background_color.parse().unwrap_or_else(|e| {
        error!("{}", e);
        process::exit(1);
    });

    let mut engine = ComplianceEngine::new(config)
        .with_guidelines(guidelines)
        .with_sampler(Arc::new(SolidBackground::new(background)));
    if cli.no_semantic {
        warn!("⚠️  Semantic check disabled.");
        engine = engine.without_matcher();
    }

    let outcome = match cli.command {
        Commands::Validate(args) => cmd::validate::run(args, &engine),
        Commands::Autofix(args) => cmd::autofix::run(args, &engine),
    };

    if let Err(e) = outcome {
        error!("❌ {}", e);
        process::exit(1);
    }
}
