//! Outcome types for finished games.

use super::Side;
use serde::{Deserialize, Serialize};

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum WinReason {
    /// The loser's Lion was captured.
    LionCaptured,
    /// The winner's Lion reached the goal rank and could not be taken there.
    LionReachedGoal,
}

/// Outcome of a finished game. Animal shogi as played here has no draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    winner: Side,
    reason: WinReason,
}

impl Outcome {
    /// Creates an outcome.
    pub fn new(winner: Side, reason: WinReason) -> Self {
        Self { winner, reason }
    }

    /// Returns the winning side.
    pub fn winner(&self) -> Side {
        self.winner
    }

    /// Returns why the game ended.
    pub fn reason(&self) -> WinReason {
        self.reason
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} wins ({})", self.winner, self.reason)
    }
}
