//! Build command - Compile the translation bundle

use clap::Args;
use koine_presse::Pipeline;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::load_config;

#[derive(Args, Default)]
pub struct BuildArgs {
    /// Path to the config file (default: ./koine.config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Rebuild even when the bundle is fresh
    #[arg(short, long)]
    pub force: bool,
}

pub fn run(args: BuildArgs) {
    let start = Instant::now();

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

    let result = if args.force {
        pipeline.rebuild()
    } else {
        pipeline.bootstrap()
    };

    match result {
        Ok(registration) => {
            let elapsed = start.elapsed().as_secs_f64();
            if registration.rebuilt {
                eprintln!(
                    "✓ bundle written to {} in {:.4}s",
                    pipeline.config().artifact_file().display(),
                    elapsed
                );
            } else {
                eprintln!("✓ bundle already current ({elapsed:.4}s)");
            }
            // The cache-busted URL is the product; keep stdout clean for it.
            println!("{}", registration.url);
        }
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    }
}
