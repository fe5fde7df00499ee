//! Operator CLI for qbridge
//!
//! Identifier derivation, attestation signing and signature recovery for attestors, relayers and
//! operators.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use qbridge_cli::{dispatch, Commands};

#[derive(Parser)]
#[command(name = "qbridge")]
#[command(about = "qbridge - attestor-gated cross-chain transfer tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = "qbridge.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let output = dispatch(&cli.command, &cli.config)?;
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_submission_id_command() {
        let cli = Cli::try_parse_from([
            "qbridge",
            "--verbose",
            "submission-id",
            "--asset",
            "0x0101010101010101010101010101010101010101010101010101010101010101",
            "--amount",
            "100",
            "--receiver",
            "0x4242424242424242424242424242424242424242",
            "--nonce",
            "0",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::SubmissionId { amount: 100, nonce: 0, .. }));
    }
}
