//! Bankflow CLI - daily retail-banking warehouse load

use anyhow::{Context, Result};
use bf_core::{Config, RunDate};
use bf_etl::Pipeline;
use clap::Parser;

mod cli;
mod output;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let date = RunDate::parse(&cli.date)?;
    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;

    let summary = Pipeline::new(config)
        .run(&date)
        .with_context(|| format!("Load for {date} failed"))?;

    output::print_summary(&summary);
    if !cli.no_report {
        output::print_report(&summary.report);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}
