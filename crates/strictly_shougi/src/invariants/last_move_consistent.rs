//! Last move consistency invariant: the board shows what the last move did.

use super::super::{GameInProgress, SoldierStatus};
use super::Invariant;

/// Invariant: The last mover stands on its destination, any soldier it
/// captured is on standby, and a fresh game still has its initial layout.
pub struct LastMoveConsistentInvariant;

impl Invariant<GameInProgress> for LastMoveConsistentInvariant {
    fn holds(game: &GameInProgress) -> bool {
        let Some(last) = game.last_move() else {
            return *game.board() == game.rules().initial_board();
        };

        let board = game.board();
        let mover_in_place = board
            .on_board_soldier(last.side, last.soldier)
            .is_some_and(|s| {
                *s.position() == last.to
                    && *s.category() == last.category
                    && (!last.promoted || *s.promoted())
            });

        let capture_removed = last.captured.is_none_or(|capture| {
            board
                .soldier(last.side.opponent(), capture.soldier)
                .is_some_and(|s| {
                    *s.status() == SoldierStatus::Standby && *s.category() == capture.category
                })
        });

        mover_in_place && capture_removed
    }

    fn description() -> &'static str {
        "Board reflects the last applied move"
    }
}
