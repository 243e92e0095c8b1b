//! CLI argument definitions using clap derive API

use bf_core::config::DEFAULT_CONFIG_FILE;
use clap::Parser;
use std::path::PathBuf;

/// Bankflow - load one day of bank files into the warehouse
#[derive(Parser, Debug)]
#[command(name = "bankflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run date: DDMMYYYY, or D-M-YYYY with '-', '.' or '/' (two-digit years allowed)
    pub date: String,

    /// Path to the JSON config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, env = "BANKFLOW_CONFIG")]
    pub config: PathBuf,

    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not print the fraud report after the run
    #[arg(long)]
    pub no_report: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["bankflow", "01032021"]).unwrap();
        assert_eq!(cli.date, "01032021");
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert!(!cli.verbose);
        assert!(!cli.no_report);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "bankflow",
            "1.3.21",
            "--config",
            "/etc/bankflow.json",
            "--verbose",
            "--no-report",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/bankflow.json"));
        assert!(cli.verbose);
        assert!(cli.no_report);
    }

    #[test]
    fn test_date_is_required() {
        assert!(Cli::try_parse_from(["bankflow"]).is_err());
    }
}
