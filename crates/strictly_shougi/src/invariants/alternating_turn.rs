//! Alternating turn invariant: sides never move twice in a row.

use super::super::GameInProgress;
use super::Invariant;

/// Invariant: Sides alternate, starting with the rule set's first mover.
pub struct AlternatingTurnInvariant;

impl Invariant<GameInProgress> for AlternatingTurnInvariant {
    fn holds(game: &GameInProgress) -> bool {
        let first = game.rules().first_mover;
        let played = game.moves_played();

        match game.last_move() {
            None if played != 0 => return false,
            Some(_) if played == 0 => return false,
            Some(last) if last.side == game.to_move() => return false,
            _ => {}
        }

        let expected_next = if played % 2 == 0 {
            first
        } else {
            first.opponent()
        };

        game.to_move() == expected_next
    }

    fn description() -> &'static str {
        "Sides alternate turns, first mover first"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameResult, GameSetup, Move, Side, SoldierId, Square};

    #[test]
    fn test_fresh_game_holds() {
        let game = GameSetup::default().start();
        assert!(AlternatingTurnInvariant::holds(&game));
    }

    #[test]
    fn test_single_move_holds() {
        let game = GameSetup::default().start();
        let action = Move::new(Side::Challenger, SoldierId(0), Square::new(1, 3));
        let Ok(GameResult::InProgress(game)) = game.make_move(action) else {
            panic!("Expected in-progress game");
        };
        assert!(AlternatingTurnInvariant::holds(&game));
        assert_eq!(game.to_move(), Side::Host);
    }

    #[test]
    fn test_stale_turn_violates() {
        let game = GameSetup::default().start();
        let action = Move::new(Side::Challenger, SoldierId(0), Square::new(1, 3));
        let Ok(GameResult::InProgress(mut game)) = game.make_move(action) else {
            panic!("Expected in-progress game");
        };
        game.to_move = Side::Challenger;
        assert!(!AlternatingTurnInvariant::holds(&game));
    }

    #[test]
    fn test_lost_counter_violates() {
        let game = GameSetup::default().start();
        let action = Move::new(Side::Challenger, SoldierId(0), Square::new(1, 3));
        let Ok(GameResult::InProgress(mut game)) = game.make_move(action) else {
            panic!("Expected in-progress game");
        };
        game.moves_played = 0;
        assert!(!AlternatingTurnInvariant::holds(&game));
    }
}
