//! Clean command - Remove build outputs

use clap::Args;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::config::load_config;

#[derive(Args, Default)]
pub struct CleanArgs {
    /// Path to the config file (default: ./koine.config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: CleanArgs) {
    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    let mut removed = 0usize;
    for path in [config.artifact_file(), config.fingerprint_path.clone()] {
        match std::fs::remove_file(&path) {
            Ok(()) => {
                eprintln!("removed {}", path.display());
                removed += 1;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                eprintln!("✗ failed to remove {}: {e}", path.display());
                std::process::exit(1);
            }
        }
    }

    if removed == 0 {
        eprintln!("✓ nothing to clean");
    } else {
        let file_word = if removed == 1 { "file" } else { "files" };
        eprintln!("✓ removed {removed} {file_word}");
    }
}
