#![warn(rust_2018_idioms, unused_lifetimes)]
#![allow(clippy::print_stderr, clippy::print_stdout)]

pub mod handlers;
pub mod models;

use crate::handlers::{check, generate, list};
use crate::models::args::{AppCommands, Cli};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        AppCommands::Generate { root, digest } => generate::generate_modules(&root, digest)?,
        AppCommands::Check { root } => check::check_modules(&root)?,
        AppCommands::List { root } => list::list_modules(&root)?,
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();
}
