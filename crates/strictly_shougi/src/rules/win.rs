//! Win detection for animal shogi.

use super::super::phases::{Outcome, WinReason};
use super::super::{AppliedMove, Board, Category, RuleSet};
use super::moves::is_attacked;
use tracing::{debug, instrument};

/// Evaluates the board right after `last` was applied.
///
/// The mover wins if the move captured the opposing Lion, or if the move
/// carried the mover's own Lion onto its goal rank where no opposing soldier
/// can take it. A Lion already standing on the goal rank does not win when
/// some other soldier moves.
/// Returns `None` while the match goes on.
#[instrument(skip(board, rules))]
pub fn evaluate(board: &Board, last: &AppliedMove, rules: &RuleSet) -> Option<Outcome> {
    let mover = last.side;

    if matches!(last.captured, Some(capture) if capture.category == Category::Lion) {
        debug!(winner = %mover, "Opposing Lion captured");
        return Some(Outcome::new(mover, WinReason::LionCaptured));
    }

    if last.category != Category::Lion || last.to.y != rules.goal_rank(mover) {
        return None;
    }

    if is_attacked(last.to, mover.opponent(), board, rules) {
        debug!(side = %mover, square = %last.to, "Lion reached goal rank under attack");
        return None;
    }

    debug!(winner = %mover, square = %last.to, "Lion reached goal rank safely");
    Some(Outcome::new(mover, WinReason::LionReachedGoal))
}
