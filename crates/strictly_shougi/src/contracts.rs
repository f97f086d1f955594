//! Contract-based validation for animal shogi.
//!
//! Contracts define correctness through preconditions and postconditions.
//! They formalize the Hoare-style reasoning: {P} action {Q}

use super::action::{Move, MoveError};
use super::invariants::{InvariantSet, ShougiInvariants};
use super::rules;
use super::typestate::GameInProgress;
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: It must be the mover's turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Checks the move's side against the side to move.
    #[instrument(skip(game))]
    pub fn check(mov: &Move, game: &GameInProgress) -> Result<(), MoveError> {
        if mov.side != game.to_move() {
            warn!(expected = %game.to_move(), "Move out of turn");
            Err(MoveError::WrongSide(mov.side))
        } else {
            Ok(())
        }
    }
}

/// Precondition: The soldier must belong to the mover and still be on the board.
pub struct SoldierOnBoard;

impl SoldierOnBoard {
    /// Checks the soldier is in play for the moving side.
    #[instrument(skip(game))]
    pub fn check(mov: &Move, game: &GameInProgress) -> Result<(), MoveError> {
        match game.board().on_board_soldier(mov.side, mov.soldier) {
            Some(_) => Ok(()),
            None => Err(MoveError::NoSuchSoldier(mov.soldier)),
        }
    }
}

/// Precondition: The destination must be in the soldier's legal set.
pub struct LegalDestination;

impl LegalDestination {
    /// Checks the destination with the move rule engine.
    #[instrument(skip(game))]
    pub fn check(mov: &Move, game: &GameInProgress) -> Result<(), MoveError> {
        rules::check_destination(mov, game.board(), game.rules())
    }
}

/// Composite precondition, checked in order: turn, soldier, destination.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    #[instrument(skip(game))]
    pub fn check(mov: &Move, game: &GameInProgress) -> Result<(), MoveError> {
        PlayersTurn::check(mov, game)?;
        SoldierOnBoard::check(mov, game)?;
        LegalDestination::check(mov, game)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for move actions.
///
/// Postconditions:
/// - Sides still alternate
/// - No two on-board soldiers share a square
/// - The board reflects the last applied move
/// - Re-applying that move to the previous board yields the new board
pub struct MoveContract;

impl MoveContract {
    /// Checks `after` is exactly `before` plus its last move.
    #[instrument(skip(before, after))]
    fn single_step(before: &GameInProgress, after: &GameInProgress) -> Result<(), MoveError> {
        let Some(last) = after.last_move() else {
            return Err(MoveError::InvariantViolation(
                "Postcondition failed: no move recorded".to_string(),
            ));
        };
        if after.moves_played() != before.moves_played().saturating_add(1) {
            return Err(MoveError::InvariantViolation(
                "Postcondition failed: move counter skipped".to_string(),
            ));
        }

        let mut board = before.board().clone();
        let action = Move::new(last.side, last.soldier, last.to);
        match rules::apply_move(&mut board, &action, before.rules()) {
            Ok(replayed) if replayed == *last && board == *after.board() => Ok(()),
            _ => {
                warn!(%action, "Board diverged from last move");
                Err(MoveError::InvariantViolation(
                    "Postcondition failed: board differs from previous board plus last move"
                        .to_string(),
                ))
            }
        }
    }
}

impl Contract<GameInProgress, Move> for MoveContract {
    fn pre(game: &GameInProgress, action: &Move) -> Result<(), MoveError> {
        LegalMove::check(action, game)
    }

    fn post(before: &GameInProgress, after: &GameInProgress) -> Result<(), MoveError> {
        ShougiInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            MoveError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })?;
        Self::single_step(before, after)
    }
}
