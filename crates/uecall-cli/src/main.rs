//! # uecall CLI entry point
//!
//! Parses command-line arguments and runs the selected subcommand on a
//! single-threaded tokio runtime.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use uecall_cli::call::{run_call, CallArgs};
use uecall_cli::config::CliConfig;
use uecall_cli::demo::run_demo;
use uecall_cli::generate::{run_generate, GenerateArgs};
use uecall_cli::keys::run_keys;
use uecall_dispatch::Dispatcher;

/// uecall: validated calls by dispatch key, with generated type declarations.
#[derive(Parser, Debug)]
#[command(name = "uecall", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory for generated artifacts.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reject an empty call, accept a complete one, then generate types.
    Demo,

    /// Validate a payload against a key's shape and run its handler.
    Call(CallArgs),

    /// Write the TypeScript declarations for every key.
    Generate(GenerateArgs),

    /// List dispatch keys with their accessor names.
    Keys,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(anyhow::Error::from)
        .and_then(|runtime| runtime.block_on(run(cli)));

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<u8> {
    let config = CliConfig::load(cli.config.as_deref())?.with_output_dir(cli.output_dir);
    let dispatcher = Dispatcher::builtin()?;
    tracing::debug!(keys = dispatcher.registry().len(), "dispatcher ready");

    match cli.command.unwrap_or(Commands::Demo) {
        Commands::Demo => run_demo(&config, &dispatcher).await,
        Commands::Call(args) => run_call(&args, &dispatcher).await,
        Commands::Generate(args) => run_generate(&args, &config, dispatcher.registry()).await,
        Commands::Keys => run_keys(&dispatcher),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_demo() {
        let cli = Cli::try_parse_from(["uecall"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_call_with_inline_payload() {
        let cli = Cli::try_parse_from(["uecall", "call", "POI_Add", "{}"]).unwrap();
        match cli.command {
            Some(Commands::Call(args)) => {
                assert_eq!(args.key, "POI_Add");
                assert_eq!(args.payload.as_deref(), Some("{}"));
                assert!(args.file.is_none());
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn parse_call_payload_conflicts_with_file() {
        let result = Cli::try_parse_from(["uecall", "call", "POI.Add", "{}", "--file", "p.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_generate_out() {
        let cli = Cli::try_parse_from(["uecall", "generate", "--out", "x/types.ts"]).unwrap();
        match cli.command {
            Some(Commands::Generate(args)) => {
                assert_eq!(args.out, Some(PathBuf::from("x/types.ts")));
            }
            other => panic!("expected generate, got {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["uecall", "keys", "-vv", "--output-dir", "out"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert!(matches!(cli.command, Some(Commands::Keys)));
    }
}
