//! Strictly Arena - staked animal shogi game authority
//!
//! Owns canonical match state for two-player animal shogi games backed by an
//! escrowed stake. Any caller may submit any move at any time; the authority
//! alone decides legality and pays the winner exactly once.
//!
//! # Architecture
//!
//! - **Rules**: board model, move rules and win evaluation live in
//!   `strictly_shougi`
//! - **Matches**: lifecycle (Proposing → Active → Concluded) and turn ownership
//! - **Escrow**: deposits and the one-time payout
//! - **Authority**: per-match locking, journaling and event fan-out
//! - **Server**: JSON REST routes over the authority
//!
//! # Example
//!
//! ```
//! use strictly_arena::{GameAuthority, MatchId, MatchStatus, PlayerId};
//! use strictly_shougi::SoldierId;
//!
//! let authority = GameAuthority::default();
//! let host = PlayerId::from("host");
//! let challenger = PlayerId::from("challenger");
//!
//! authority.propose(MatchId(42), host.clone(), 10_000)?;
//! authority.accept(MatchId(42), challenger.clone(), 10_000)?;
//! assert_eq!(authority.game_status(MatchId(42))?, MatchStatus::Active);
//!
//! // The challenger's Hiyoko takes the host's Hiyoko.
//! authority.submit_move(MatchId(42), &challenger, SoldierId(3), 2, 2)?;
//! # Ok::<(), strictly_arena::AuthorityError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod authority;
mod config;
mod db;
mod error;
mod escrow;
mod events;
mod identity;
mod journal;
mod matches;
mod record;
mod server;

pub use authority::GameAuthority;
pub use config::{ArenaConfig, ConfigError, DatabaseConfig, ServerConfig};
pub use db::{DbError, MatchRepository, MatchRow, NewMatchRow};
pub use error::AuthorityError;
pub use escrow::{EscrowAccount, Payout};
pub use events::{Ack, GameEvent};
pub use identity::{MatchId, PlayerId};
pub use journal::MatchJournal;
pub use matches::{MatchPhase, MatchStatus, MoveReport, ShougiMatch};
pub use record::{BoardSnapshot, MatchRecord, SoldierView};
pub use server::{
    ApiError, AppState, ClaimRequest, ErrorBody, MoveRequest, StakeRequest, StatusResponse, router,
};
