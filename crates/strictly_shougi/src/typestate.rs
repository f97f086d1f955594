//! Phase-specific typestate structs for animal shogi.
//!
//! Each phase is its own type. A [`GameFinished`] always has an [`Outcome`],
//! and only a [`GameInProgress`] can accept moves.
//!
//! `make_move` borrows the current state and returns the next one, so a
//! rejected move leaves the caller holding the unchanged game.

use super::action::{AppliedMove, Move, MoveError};
use super::contracts::{Contract, MoveContract};
use super::phases::Outcome;
use super::{Board, RuleSet, Side, rules};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

// ─────────────────────────────────────────────────────────────
//  Setup Phase
// ─────────────────────────────────────────────────────────────

/// Game laid out and waiting for an opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetup {
    rules: RuleSet,
    board: Board,
}

impl GameSetup {
    /// Lays out both armies according to `rules`.
    #[instrument(skip(rules))]
    pub fn new(rules: RuleSet) -> Self {
        let board = rules.initial_board();
        Self { rules, board }
    }

    /// Returns the rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Starts the game; the rule set's first mover is to move.
    #[instrument(skip(self))]
    pub fn start(self) -> GameInProgress {
        let to_move = self.rules.first_mover;
        GameInProgress {
            rules: self.rules,
            board: self.board,
            last_move: None,
            moves_played: 0,
            to_move,
        }
    }
}

impl Default for GameSetup {
    fn default() -> Self {
        Self::new(RuleSet::default())
    }
}

// ─────────────────────────────────────────────────────────────
//  InProgress Phase
// ─────────────────────────────────────────────────────────────

/// Game in progress - can accept moves.
///
/// Only the most recent move is kept alongside a move counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInProgress {
    pub(crate) rules: RuleSet,
    pub(crate) board: Board,
    pub(crate) last_move: Option<AppliedMove>,
    pub(crate) moves_played: u32,
    pub(crate) to_move: Side,
}

impl GameInProgress {
    /// Validates and applies a move, returning the next state.
    ///
    /// Contract enforcement:
    /// - Preconditions checked always (turn, soldier, destination)
    /// - Postconditions checked in debug builds only
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] if any precondition fails; `self` is unchanged.
    #[instrument(skip(self), fields(to_move = %self.to_move))]
    pub fn make_move(&self, action: Move) -> Result<GameResult, MoveError> {
        MoveContract::pre(self, &action)?;

        let mut game = self.clone();
        let applied = rules::apply_move(&mut game.board, &action, &game.rules)?;
        game.last_move = Some(applied);
        game.moves_played = game.moves_played.saturating_add(1);

        if let Some(outcome) = rules::evaluate(&game.board, &applied, &game.rules) {
            info!(%outcome, moves = game.moves_played, "Game finished");
            return Ok(GameResult::Finished(GameFinished {
                rules: game.rules,
                board: game.board,
                last_move: applied,
                moves_played: game.moves_played,
                outcome,
            }));
        }

        game.to_move = game.to_move.opponent();

        #[cfg(debug_assertions)]
        MoveContract::post(self, &game)?;

        Ok(GameResult::InProgress(game))
    }

    /// Returns the side to move.
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    /// Returns the rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the most recent applied move, if any.
    pub fn last_move(&self) -> Option<&AppliedMove> {
        self.last_move.as_ref()
    }

    /// Number of moves applied so far.
    pub fn moves_played(&self) -> u32 {
        self.moves_played
    }

    /// Every legal move for the side to move.
    #[instrument(skip(self))]
    pub fn legal_moves(&self) -> Vec<Move> {
        let side = self.to_move;
        self.board
            .army(side)
            .on_board()
            .flat_map(|soldier| {
                rules::legal_destinations(
                    self.rules.geometry_for(soldier),
                    *soldier.position(),
                    &self.board,
                    side,
                    &self.rules,
                )
                .into_iter()
                .map(move |to| Move::new(side, *soldier.id(), to))
            })
            .collect()
    }

    /// Replays moves from the initial layout of `rules`.
    ///
    /// # Errors
    ///
    /// Returns the first [`MoveError`] encountered, or
    /// [`MoveError::InvariantViolation`] if moves continue past the end.
    #[instrument(skip(rules, moves), fields(moves = moves.len()))]
    pub fn replay(rules: RuleSet, moves: &[Move]) -> Result<GameResult, MoveError> {
        let mut game = GameSetup::new(rules).start();

        for (index, action) in moves.iter().enumerate() {
            match game.make_move(*action)? {
                GameResult::InProgress(g) => game = g,
                GameResult::Finished(g) if index + 1 == moves.len() => {
                    return Ok(GameResult::Finished(g));
                }
                GameResult::Finished(_) => {
                    return Err(MoveError::InvariantViolation(format!(
                        "Game finished after move {} of {}",
                        index + 1,
                        moves.len()
                    )));
                }
            }
        }

        Ok(GameResult::InProgress(game))
    }
}

// ─────────────────────────────────────────────────────────────
//  Finished Phase
// ─────────────────────────────────────────────────────────────

/// Game finished - outcome determined. The board is frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFinished {
    rules: RuleSet,
    board: Board,
    last_move: AppliedMove,
    moves_played: u32,
    outcome: Outcome,
}

impl GameFinished {
    /// Returns the outcome.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Returns the rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Returns the final board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the move that ended the game.
    pub fn last_move(&self) -> &AppliedMove {
        &self.last_move
    }

    /// Number of moves applied, the final one included.
    pub fn moves_played(&self) -> u32 {
        self.moves_played
    }
}

// ─────────────────────────────────────────────────────────────
//  Result Type
// ─────────────────────────────────────────────────────────────

/// Result of making a move.
#[derive(Debug, Clone)]
pub enum GameResult {
    /// Game continues.
    InProgress(GameInProgress),
    /// Game finished.
    Finished(GameFinished),
}

impl GameResult {
    /// The move that produced this state.
    pub fn last_move(&self) -> Option<&AppliedMove> {
        match self {
            GameResult::InProgress(g) => g.last_move(),
            GameResult::Finished(g) => Some(g.last_move()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, SoldierId, Square, WinReason};

    fn mv(side: Side, id: u32, x: u8, y: u8) -> Move {
        Move::new(side, SoldierId(id), Square::new(x, y))
    }

    #[test]
    fn test_challenger_moves_first_by_default() {
        let game = GameSetup::default().start();
        assert_eq!(game.to_move(), Side::Challenger);
    }

    #[test]
    fn test_rejected_move_keeps_state() {
        let game = GameSetup::default().start();
        let before = game.clone();
        let result = game.make_move(mv(Side::Host, 0, 3, 2));
        assert_eq!(result.unwrap_err(), MoveError::WrongSide(Side::Host));
        assert_eq!(game, before);
    }

    #[test]
    fn test_opening_legal_moves() {
        let game = GameSetup::default().start();
        let moves = game.legal_moves();
        // Kirin (1,4)->(1,3), Lion ->(1,3)/(3,3), Kirin (3,4)->(3,3), Hiyoko x (2,2).
        assert_eq!(moves.len(), 5);
        assert!(moves.iter().all(|m| m.side == Side::Challenger));
    }

    #[test]
    fn test_lion_walk_captures_host_lion() {
        let moves = [
            mv(Side::Challenger, 1, 1, 3),
            mv(Side::Host, 1, 3, 2),
            mv(Side::Challenger, 1, 2, 2),
            mv(Side::Host, 1, 3, 3),
            mv(Side::Challenger, 1, 3, 3),
        ];
        match GameInProgress::replay(RuleSet::default(), &moves).expect("valid replay") {
            GameResult::Finished(game) => {
                assert_eq!(game.outcome().winner(), Side::Challenger);
                assert_eq!(game.outcome().reason(), WinReason::LionCaptured);
                let lion = game.board().lion(Side::Challenger).expect("lion");
                assert_eq!(*lion.position(), Square::new(3, 3));
                assert!(game.board().lion(Side::Host).is_none());
            }
            GameResult::InProgress(_) => panic!("Game should be finished"),
        }
    }

    #[test]
    fn test_replay_rejects_moves_after_finish() {
        let moves = [
            mv(Side::Challenger, 1, 1, 3),
            mv(Side::Host, 1, 3, 2),
            mv(Side::Challenger, 1, 2, 2),
            mv(Side::Host, 1, 3, 3),
            mv(Side::Challenger, 1, 3, 3),
            mv(Side::Host, 0, 3, 2),
        ];
        assert!(matches!(
            GameInProgress::replay(RuleSet::default(), &moves),
            Err(MoveError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_capture_recorded_as_last_move() {
        let game = GameSetup::default().start();
        let GameResult::InProgress(game) = game.make_move(mv(Side::Challenger, 3, 2, 2)).expect("legal")
        else {
            panic!("Game should continue");
        };
        let last = game.last_move().expect("one move");
        assert_eq!(last.captured.map(|c| c.category), Some(Category::Hiyoko));
        assert_eq!(game.moves_played(), 1);
        assert_eq!(game.to_move(), Side::Host);
    }

    /// Both sides step a Kirin forward and back, `cycles` times.
    fn kirin_shuffle(cycles: usize) -> Vec<Move> {
        let round = [
            mv(Side::Challenger, 0, 1, 3),
            mv(Side::Host, 0, 3, 2),
            mv(Side::Challenger, 0, 1, 4),
            mv(Side::Host, 0, 3, 1),
        ];
        round.iter().copied().cycle().take(cycles * 4).collect()
    }

    #[test]
    fn test_state_size_constant_over_long_match() {
        let Ok(GameResult::InProgress(short)) =
            GameInProgress::replay(RuleSet::default(), &kirin_shuffle(3))
        else {
            panic!("Expected in-progress game");
        };
        let Ok(GameResult::InProgress(long)) =
            GameInProgress::replay(RuleSet::default(), &kirin_shuffle(20))
        else {
            panic!("Expected in-progress game");
        };

        assert_eq!(short.moves_played(), 12);
        assert_eq!(long.moves_played(), 80);
        assert_eq!(short.board(), long.board());
        assert_eq!(short.last_move(), long.last_move());

        let short_json = serde_json::to_string(&short).expect("serialize");
        let long_json = serde_json::to_string(&long).expect("serialize");
        assert_eq!(short_json.len(), long_json.len());
    }
}
