//! Jamal CLI - static site provisioning over SSH
//!
//! Usage: jamal <COMMAND>
//!
//! Commands:
//!   init    Write a default site document
//!   setup   Install nginx and the rsync daemon module for the site
//!   deploy  Converge the virtual host and sync the site files
//!   remove  Remove everything setup and deploy created

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use jamal::presentation::{Cli, Commands};

mod commands;
mod ui;

use ui::context::UiContext;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ui::error::print_error(&err, json);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let ui = UiContext::new(cli.json, cli.verbose, cli.color);

    match cli.command {
        Commands::Init { force } => commands::init::cmd_init(&cli.config, force, &ui),
        Commands::Setup => commands::setup::cmd_setup(&cli.config, &ui),
        Commands::Deploy => commands::deploy::cmd_deploy(&cli.config, &ui),
        Commands::Remove { yes } => commands::remove::cmd_remove(&cli.config, yes, &ui),
    }
}
