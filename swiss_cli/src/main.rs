//! Command-line front end for running a Swiss-system tournament.
//!
//! Each invocation runs a single command against the PostgreSQL store and
//! exits.

mod commands;
mod config;
mod logging;

use std::{sync::Arc, time::Instant};

use anyhow::{Context, Error, bail};
use log::info;
use pico_args::Arguments;
use swiss_tournament::{ByeResolver, Database, TournamentManager};

use crate::{commands::Command, config::CliConfig};

const HELP: &str = "\
Run a Swiss-system tournament backed by PostgreSQL

USAGE:
  swiss_cli [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
  init                     Create the tables if they do not exist
  register NAME            Register a player and print its ID
  report WINNER LOSER      Record a match result by player ID
  standings                Print standings, best record first
  pairings                 Pair the next round (grants a bye for odd counts)
  count                    Print the number of registered players
  reset-matches            Delete all match results
  reset-players            Delete all players and their matches

OPTIONS:
  --db-url     URL         Database connection string  [default: env DATABASE_URL or postgres://postgres@localhost/tournament]
  --seed       N           Seed for bye selection      [default: env BYE_SEED or random]

FLAGS:
  --json                   Print results as JSON
  -h, --help               Print help information

ENVIRONMENT:
  DATABASE_URL             PostgreSQL connection string
  DB_MAX_CONNECTIONS       Pool size
  DB_QUERY_TIMEOUT         Per-query timeout in seconds
  BYE_SEED                 Seed for bye selection
  RUST_LOG                 Log filter (logs go to stderr)
  (See .env file for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let json = pargs.contains("--json");
    let database_url: Option<String> = pargs.opt_value_from_str("--db-url")?;
    let bye_seed: Option<u64> = pargs.opt_value_from_str("--seed")?;
    let command = Command::parse(&mut pargs)?;

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        bail!("Unexpected arguments: {:?}", remaining);
    }

    let config = CliConfig::from_env(database_url, bye_seed, json)?;
    config.validate()?;

    logging::init();

    let db = Database::new(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Database connected");

    let bye_resolver = match config.bye_seed {
        Some(seed) => ByeResolver::seeded(seed),
        None => ByeResolver::new(),
    };
    let manager = TournamentManager::with_bye_resolver(Arc::new(db.repository()), bye_resolver);

    let started = Instant::now();
    let result = command.execute(&manager).await;
    logging::log_command(
        command.name(),
        started.elapsed().as_millis() as u64,
        result.is_ok(),
    );

    db.close().await;

    let output = result.map_err(|e| anyhow::anyhow!("{}: {}", command.name(), e.client_message()))?;
    println!("{}", output.render(config.json)?);

    Ok(())
}
