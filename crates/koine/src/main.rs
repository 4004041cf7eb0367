//! # koine
//!
//! Koine - Translation bundles for the web, compiled and cached.
//!
//! ## Name Origin
//!
//! **Koine** (/kɔɪˈneɪ/) was the common Greek of the eastern Mediterranean,
//! the shared tongue that let people with different mother languages talk to
//! each other. This crate is the gateway to all Koine functionality,
//! providing a unified command-line interface for compiling translation
//! catalogs into browser-ready bundles.

mod commands;
mod config;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "koine")]
#[command(about = "Translation bundles for the web, compiled and cached", long_about = None)]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Print version
    #[arg(short = 'v', short_alias = 'V', long, action = clap::ArgAction::Version)]
    version: (),
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the translation bundle when stale (default command)
    #[command(visible_alias = "presse")]
    Build(commands::build::BuildArgs),

    /// Report bundle freshness without writing anything
    Status(commands::status::StatusArgs),

    /// Remove the artifact and the persisted fingerprint
    Clean(commands::clean::CleanArgs),
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Build(args)) => commands::build::run(args),
        Some(Commands::Status(args)) => commands::status::run(args),
        Some(Commands::Clean(args)) => commands::clean::run(args),
        None => {
            // Default to build command with default args
            commands::build::run(commands::build::BuildArgs::default());
        }
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
