//! Command-line interface for strictly_arena.

use clap::{Parser, Subcommand};

/// Strictly Arena - staked animal shogi game authority
#[derive(Parser, Debug)]
#[command(name = "strictly_arena")]
#[command(about = "Staked animal shogi game authority with escrow", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game authority
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite journal path (overrides config)
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Print the effective configuration and the starting board
    Rules,

    /// List journaled matches
    Matches {
        /// SQLite journal path (overrides config)
        #[arg(long)]
        db_path: Option<String>,

        /// Only matches with this status (Proposing, Active, Concluded)
        #[arg(long)]
        status: Option<strictly_arena::MatchStatus>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from([
            "strictly_arena",
            "--config",
            "arena.toml",
            "serve",
            "--port",
            "8080",
            "--db-path",
            "arena.db",
        ]);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("arena.toml")));
        let Command::Serve { host, port, db_path } = cli.command else {
            panic!("Expected serve");
        };
        assert_eq!(host, None);
        assert_eq!(port, Some(8080));
        assert_eq!(db_path.as_deref(), Some("arena.db"));
    }

    #[test]
    fn test_matches_status_filter() {
        let cli = Cli::parse_from(["strictly_arena", "matches", "--status", "Active"]);
        let Command::Matches { status, .. } = cli.command else {
            panic!("Expected matches");
        };
        assert_eq!(status, Some(strictly_arena::MatchStatus::Active));
    }
}
