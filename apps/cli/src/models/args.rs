//! # CLI Argument Definitions
//!
//! This module defines the command-line interface (CLI) structure using the `clap` crate.
//! It specifies the available subcommands, arguments, and flags for the application.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "mforge")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Module source generator for descriptor-driven plugin trees")]
pub struct Cli {
    /// The main subcommand to execute.
    #[command(subcommand)]
    pub command: AppCommands,
}

/// Enumeration of available application subcommands.
#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// Generate stale module sources and rewrite the dispatch base files
    #[command(alias = "gen")]
    Generate {
        /// Module-kind root directory (e.g. 'source/conduits')
        root: PathBuf,

        /// Gate regeneration on content digests instead of timestamps
        #[arg(long)]
        digest: bool,
    },
    /// Validate descriptors, templates and markers without writing anything
    Check {
        /// Module-kind root directory
        root: PathBuf,
    },
    /// List discovered modules with their aliases and target types
    List {
        /// Module-kind root directory
        root: PathBuf,
    },
}
