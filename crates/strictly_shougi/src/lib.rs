//! Strictly Shougi - type-safe animal shogi game logic
//!
//! Pure game rules with no I/O: the board model, the move rule engine, win
//! evaluation and a typestate game that only accepts moves while in progress.
//!
//! # Example
//!
//! ```
//! use strictly_shougi::{GameResult, GameSetup, Move, Side, SoldierId, Square};
//!
//! let game = GameSetup::default().start();
//! let action = Move::new(Side::Challenger, SoldierId(0), Square::new(1, 3));
//! match game.make_move(action).expect("legal opening") {
//!     GameResult::InProgress(game) => assert_eq!(game.to_move(), Side::Host),
//!     GameResult::Finished(_) => unreachable!(),
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
mod contracts;
mod geometry;
mod invariants;
mod phases;
pub mod rules;
mod typestate;
mod types;

pub use action::{AppliedMove, Capture, Move, MoveError};
pub use board::{Army, Board};
pub use contracts::{
    Contract, LegalDestination, LegalMove, MoveContract, PlayersTurn, SoldierOnBoard,
};
pub use geometry::{Geometry, GeometryTable, Placement, RuleSet, RuleSetError};
pub use invariants::{
    AlternatingTurnInvariant, Invariant, InvariantSet, InvariantViolation,
    LastMoveConsistentInvariant, ShougiInvariants, UniqueOccupancyInvariant,
};
pub use phases::{Outcome, WinReason};
pub use typestate::{GameFinished, GameInProgress, GameResult, GameSetup};
pub use types::{Category, Side, Soldier, SoldierId, SoldierStatus, Square};
