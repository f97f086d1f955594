//! Strictly Arena - Unified CLI
//!
//! Runs the staked animal shogi authority over HTTP and inspects its journal.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::sync::Arc;
use strictly_arena::{ArenaConfig, GameAuthority, MatchRepository, MatchStatus, router};
use strictly_shougi::GameSetup;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ArenaConfig::from_file(path)?,
        None => ArenaConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    match cli.command {
        Command::Serve {
            host,
            port,
            db_path,
        } => run_server(config.with_overrides(host, port, db_path)).await,
        Command::Rules => print_rules(&config),
        Command::Matches { db_path, status } => {
            list_matches(&config.with_overrides(None, None, db_path), status)
        }
    }
}

/// Opens the configured journal, migrating it.
#[instrument(skip(config))]
fn open_repository(config: &ArenaConfig) -> Result<Option<MatchRepository>> {
    let Some(path) = config.database().path().clone() else {
        return Ok(None);
    };
    let repo = MatchRepository::new(path)?;
    repo.migrate()?;
    Ok(Some(repo))
}

/// Run the HTTP game authority
#[instrument(skip(config))]
async fn run_server(config: ArenaConfig) -> Result<()> {
    let bind = config.server().bind_address();

    let mut authority = GameAuthority::new(config.rules().clone());
    match open_repository(&config)? {
        Some(repo) => {
            let records = repo.load_all()?;
            authority.restore(records);
            authority = authority.with_journal(Arc::new(repo));
        }
        None => info!("No database configured, matches are kept in memory only"),
    }

    let app = router(Arc::new(authority));

    let listener = tokio::net::TcpListener::bind(bind.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("Arena ready at http://{}/", bind);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Print the effective configuration and the starting board
fn print_rules(config: &ArenaConfig) -> Result<()> {
    let rules = config.rules();
    println!("{}", config.to_toml()?);
    let setup = GameSetup::new(rules.clone());
    println!("{}", setup.board().display(rules.width, rules.height));
    Ok(())
}

/// List journaled matches
fn list_matches(config: &ArenaConfig, status: Option<MatchStatus>) -> Result<()> {
    let Some(repo) = open_repository(config)? else {
        anyhow::bail!("No database configured; pass --db-path or set [database] path");
    };

    match status {
        Some(status) => {
            let name: &'static str = status.into();
            for id in repo.match_ids_with_status(name)? {
                println!("{id}\t{status}");
            }
        }
        None => {
            for record in repo.load_all()? {
                let snapshot = record.snapshot();
                println!(
                    "{}\t{}\t{}\t{}",
                    snapshot.match_id(),
                    snapshot.status(),
                    snapshot.host(),
                    snapshot.stake()
                );
            }
        }
    }
    Ok(())
}
