//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! Global flags (`--config`, `--json`, `--color`, `--verbose`) are inherited
//! by all subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// Jamal - provision nginx and an rsync daemon on a host, then deploy a static site to it
#[derive(Parser, Debug)]
#[command(name = "jamal")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'jamal init' to create a site document in the current directory.")]
pub struct Cli {
    /// Site document to read
    #[arg(
        short,
        long,
        global = true,
        env = "JAMAL_CONFIG",
        default_value = DEFAULT_CONFIG_FILE,
        value_name = "PATH"
    )]
    pub config: PathBuf,

    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v shows remote commands, -vv also shows config diffs)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default site document
    Init {
        /// Overwrite an existing document
        #[arg(short, long)]
        force: bool,
    },

    /// Install nginx and configure the rsync daemon module for the site
    Setup,

    /// Converge the nginx virtual host and sync the site files
    Deploy,

    /// Remove the site's web root, virtual host and rsync module from the host
    Remove {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
