mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use startup_forecast_core::Currency;

use commands::catalog::CatalogArgs;
use commands::projection::{ProjectionArgs, StageArgs};
use commands::report::{PromptArgs, ReportArgs};

/// Five-year financial projections for small business creation
#[derive(Parser)]
#[command(
    name = "sfp",
    version,
    about = "Five-year startup financial projections",
    long_about = "A CLI for building five-year financial projections of a new business \
                  with decimal precision. Produces revenue series, income statements, \
                  a first-year monthly cash budget, a financing plan and a \
                  currency-formatted report from a single plan document."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Currency preset used by formatted output (XOF, XAF, EUR, USD, GBP, MAD, CAD)
    #[arg(long, default_value = "XOF", global = true)]
    currency: String,

    /// Log stage details to stderr (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full five-year projection
    Project(ProjectionArgs),
    /// Five annual revenue totals
    Revenue(StageArgs),
    /// Annual income statements, CAF, working capital and break-even
    Statements(StageArgs),
    /// First-year monthly cash budget
    Treasury(StageArgs),
    /// Needs vs. resources per year
    FinancingPlan(StageArgs),
    /// Currency-formatted report tables
    Report(ReportArgs),
    /// Build the advisory prompt for an external text generator
    Prompt(PromptArgs),
    /// Print the standard investment and charge catalog
    Catalog(CatalogArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("startup_forecast_core={default_level}")));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_currency(code: &str) -> Result<Currency, Box<dyn std::error::Error>> {
    Currency::preset(code).ok_or_else(|| {
        let known: Vec<String> = Currency::presets().into_iter().map(|c| c.code).collect();
        format!("Unknown currency '{}' (known: {})", code, known.join(", ")).into()
    })
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let currency = match resolve_currency(&cli.currency) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::Revenue(args) => commands::projection::run_revenue(args),
        Commands::Statements(args) => commands::projection::run_statements(args),
        Commands::Treasury(args) => commands::projection::run_treasury(args),
        Commands::FinancingPlan(args) => commands::projection::run_financing_plan(args),
        Commands::Report(args) => commands::report::run_report(args, &currency),
        Commands::Prompt(args) => commands::report::run_prompt(args, &currency),
        Commands::Catalog(args) => commands::catalog::run_catalog(args),
        Commands::Version => {
            println!("sfp {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
