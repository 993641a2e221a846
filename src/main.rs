mod builder;
mod classifier;
mod cli;
mod db;
mod error;
mod fmt;
mod ledger;
mod models;
mod period;
mod reports;
mod rest;
mod settings;
mod store;
mod workbook;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use reports::ReportKind;

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.options.verbose);

    let result = match cli.command {
        Commands::BalanceSheet { file } => cli::import::run(ReportKind::BalanceSheet, file, &cli.options),
        Commands::ProfitLoss { file } => cli::import::run(ReportKind::ProfitLoss, file, &cli.options),
        Commands::Vat { file } => cli::import::run(ReportKind::Vat, file, &cli.options),
        Commands::AgedReceivable { file } => cli::import::run(ReportKind::AgedReceivable, file, &cli.options),
        Commands::Ledger { output } => cli::ledger::run(output, &cli.options),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
