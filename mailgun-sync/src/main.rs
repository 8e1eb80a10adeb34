//! mailgun-sync CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use mailgun_sync::commands::SyncCommand;
use mailgun_sync::{observability, SyncConfig};

#[derive(Parser)]
#[command(name = "mailgun-sync")]
#[command(version)]
#[command(about = "Sync local Handlebars email templates with Mailgun", long_about = None)]
struct Cli {
    /// Config file (defaults to ./mailgun-sync.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing the templates
    #[arg(long)]
    templates_dir: Option<PathBuf>,

    /// Directory containing the partials (defaults to <templates-dir>/partials)
    #[arg(long)]
    partials_dir: Option<PathBuf>,

    /// Look up and render every template without uploading anything
    #[arg(long)]
    dry_run: bool,

    /// Exit with an error if any template fails to sync
    #[arg(long)]
    strict: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    observability::init(cli.verbose)?;

    let mut config = SyncConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.templates_dir {
        config.templates_dir = dir;
    }
    if let Some(dir) = cli.partials_dir {
        config.partials_dir = Some(dir);
    }

    let cmd = SyncCommand::new(config, cli.dry_run, cli.strict);
    cmd.execute()?;

    Ok(())
}
