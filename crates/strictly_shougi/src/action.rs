//! First-class action types for animal shogi.
//!
//! A [`Move`] is the intent submitted by a side. An [`AppliedMove`] is the
//! record of what the move did to the board once accepted.

use super::{Category, Side, SoldierId, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A side's request to move one of its soldiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The side making the move.
    pub side: Side,
    /// The soldier to move.
    pub soldier: SoldierId,
    /// Destination square.
    pub to: Square,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(side: Side, soldier: SoldierId, to: Square) -> Self {
        Self { side, soldier, to }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} #{} -> {}", self.side, self.soldier, self.to)
    }
}

/// An opposing soldier removed by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capture {
    /// Id of the captured soldier in the opposing army.
    pub soldier: SoldierId,
    /// Its category.
    pub category: Category,
}

/// What an accepted move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppliedMove {
    /// The side that moved.
    pub side: Side,
    /// The soldier that moved.
    pub soldier: SoldierId,
    /// Category of the soldier that moved.
    pub category: Category,
    /// Origin square.
    pub from: Square,
    /// Destination square.
    pub to: Square,
    /// Opposing soldier captured on `to`, if any.
    pub captured: Option<Capture>,
    /// Whether the moving soldier promoted on arrival.
    pub promoted: bool,
}

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// It is not this side's turn.
    #[display("It's not {}'s turn", _0)]
    WrongSide(Side),

    /// The soldier is unknown or no longer on the board.
    #[display("Soldier {} is not on the board", _0)]
    NoSuchSoldier(SoldierId),

    /// The destination is off the board, unreachable, or held by the mover's own side.
    #[display("Invalid destination {}", _0)]
    InvalidDestination(Square),

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}
