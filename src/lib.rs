//! rosterwatch library root.
//! Exposes the CLI parser, the high-level run() function and the engine
//! modules (status derivation, ingestion, recompute, approval, reminders).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod gateway;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Ingest { .. } => cli::commands::ingest::handle(&cli.command, cfg),
        Commands::List { .. } => cli::commands::list::handle(&cli.command, cfg),
        Commands::Resolve { .. } => cli::commands::resolve::handle(&cli.command, cfg),
        Commands::Recompute => cli::commands::recompute::handle(&cli.command, cfg),
        Commands::Remind { .. } => cli::commands::remind::handle(&cli.command, cfg),
        Commands::History => cli::commands::history::handle(&cli.command, cfg),
        Commands::Log => cli::commands::log::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::Clear { .. } => cli::commands::clear::handle(&cli.command, cfg),
        Commands::Watch { .. } => cli::commands::watch::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // Load the config once; a --db override replaces only the database.
    let mut cfg = Config::load();

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
