//! Status command - Report bundle freshness

use clap::Args;
use koine_presse::Pipeline;
use std::path::PathBuf;

use crate::config::load_config;

#[derive(Args, Default)]
pub struct StatusArgs {
    /// Path to the config file (default: ./koine.config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Exits 1 when the bundle is stale, so scripts can gate on it.
pub fn run(args: StatusArgs) {
    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    let pipeline = match Pipeline::new(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    match pipeline.status() {
        Ok(status) => {
            let persisted = if status.persisted == 0 {
                "never built".to_string()
            } else {
                status.persisted.to_string()
            };
            eprintln!("catalog files: {}", status.catalog_files);
            eprintln!("current:       {}", status.current);
            eprintln!("persisted:     {persisted}");
            eprintln!(
                "artifact:      {}",
                if status.artifact_exists { "present" } else { "absent" }
            );

            if status.stale {
                eprintln!("✗ bundle is stale");
                std::process::exit(1);
            }
            eprintln!("✓ bundle is current");
        }
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    }
}
