//! PocketFiler - file manager core hosted on a desktop console
//!
//! Main entry point.

mod app;
mod script;

use anyhow::Result;
use app_core::{AppConfig, FileOpener, LogOpener};
use app_fs::{FileSystem, StdFileSystem};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pocket_filer")]
#[command(about = "Touch and button driven file manager on a console host", long_about = None)]
struct Options {
    /// Browse a built-in in-memory tree instead of the disk
    #[arg(long)]
    demo: bool,

    /// Start directory (overrides the config file)
    #[arg(long, value_name = "PATH")]
    dir: Option<String>,

    /// Read input commands from FILE instead of stdin
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Write the final screen to FILE as PNG
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,
}

fn main() -> Result<()> {
    let options = Options::parse();

    // Initialize logging and panic hook first
    let _log_guard = app_log::init()?;

    // Clean up old logs (7 days)
    if let Err(e) = app_log::cleanup_old_logs(7) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("PocketFiler starting...");

    // Load configuration
    let mut config = AppConfig::load_or_create().unwrap_or_else(|e| {
        tracing::warn!("{}, using defaults", e);
        AppConfig::default()
    });
    tracing::info!("{}", config.general.title);
    if options.dir.is_some() {
        config.general.start_dir = options.dir.clone();
    }

    let (fs, opener): (Box<dyn FileSystem>, Box<dyn FileOpener>) = if options.demo {
        if config.general.start_dir.is_none() {
            config.general.start_dir = Some("/root".to_string());
        }
        (Box::new(app::demo_filesystem()), Box::new(LogOpener))
    } else {
        (Box::new(StdFileSystem::from_process_cwd()?), Box::new(app::SystemOpener))
    };

    let mut app = app::App::new(config, fs, opener);
    app.activate()?;

    let input: Box<dyn BufRead> = match &options.script {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    app.run(input, &mut io::stdout().lock())?;

    if let Some(path) = &options.snapshot {
        app.framebuffer().save_png(path)?;
    }

    tracing::info!("PocketFiler exiting");
    Ok(())
}
