//! Unique occupancy invariant: one soldier per square, all on the board.

use super::super::{GameInProgress, Side};
use super::Invariant;
use std::collections::HashSet;
use strum::IntoEnumIterator;

/// Invariant: On-board soldiers of both armies stand on distinct in-bounds squares.
pub struct UniqueOccupancyInvariant;

impl Invariant<GameInProgress> for UniqueOccupancyInvariant {
    fn holds(game: &GameInProgress) -> bool {
        let mut seen = HashSet::new();
        Side::iter()
            .flat_map(|side| game.board().army(side).on_board())
            .all(|soldier| {
                let square = *soldier.position();
                game.rules().contains(square) && seen.insert(square)
            })
    }

    fn description() -> &'static str {
        "On-board soldiers occupy distinct squares within bounds"
    }
}
