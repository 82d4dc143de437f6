use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod dispatch;
mod render;
mod update;


#[derive(Parser, Debug)]
#[command(name = "plugdock")]
#[command(about = "Local plugin lifecycle manager", long_about = None)]
struct Cli {
    #[arg(long)]
    store_root: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Refresh,
    Update {
        #[arg(long)]
        dry_run: bool,
    },
    Install {
        name: String,
        #[arg(long)]
        testing: bool,
    },
    Cleanup,
    List,
    Doctor,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    dispatch::run_cli(Cli::parse())
}
