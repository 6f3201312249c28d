mod commands;
mod error;
mod output;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Commands;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "cargo-convoy")]
#[command(bin_name = "cargo-convoy")]
#[command(version = env!("CARGO_CONVOY_VERSION"))]
#[command(about = "Coordinated releases for cargo monorepos", long_about = None)]
struct Cli {
    /// Path to start project discovery from (default: current directory)
    #[arg(long = "path", short = 'C', global = true)]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    init_tracing();

    let args = normalized_args(std::env::args_os().collect());
    let cli = Cli::parse_from(args);

    let start_path = match resolve_start_path(cli.path) {
        Ok(path) => path,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = cli.command.execute(&start_path) {
        print_error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CONVOY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// When invoked as `cargo convoy ...`, cargo passes the subcommand name
/// as the first argument; strip it so both call styles parse the same.
fn normalized_args(mut args: Vec<OsString>) -> Vec<OsString> {
    if args.get(1).is_some_and(|arg| arg.as_os_str() == "convoy") {
        args.remove(1);
    }
    args
}

fn resolve_start_path(path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    match path {
        Some(p) => Ok(p),
        None => std::env::current_dir().map_err(CliError::CurrentDir),
    }
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn cargo_dispatch_prefix_is_stripped() {
        let normalized = normalized_args(args(&["cargo-convoy", "convoy", "status"]));
        assert_eq!(normalized, args(&["cargo-convoy", "status"]));
    }

    #[test]
    fn direct_invocation_is_untouched() {
        let normalized = normalized_args(args(&["cargo-convoy", "status"]));
        assert_eq!(normalized, args(&["cargo-convoy", "status"]));
    }

    #[test]
    fn subcommand_named_convoy_only_stripped_once() {
        let normalized = normalized_args(args(&["cargo-convoy", "convoy", "convoy"]));
        assert_eq!(normalized, args(&["cargo-convoy", "convoy"]));
    }
}
