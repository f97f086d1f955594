//! Move legality and application.

use super::super::{
    AppliedMove, Board, Capture, Category, Geometry, Move, MoveError, RuleSet, Side, Square,
};
use tracing::{debug, instrument};

/// Squares a soldier with `geometry` on `from` may move to.
///
/// A square is legal when it is on the board and not held by an on-board
/// soldier of `side`. Squares held by the opponent are captures.
#[instrument(skip(board, rules))]
pub fn legal_destinations(
    geometry: Geometry,
    from: Square,
    board: &Board,
    side: Side,
    rules: &RuleSet,
) -> Vec<Square> {
    geometry
        .reach(from, side)
        .filter(|square| rules.contains(*square))
        .filter(|square| !matches!(board.occupant(*square), Some((owner, _)) if owner == side))
        .collect()
}

/// Returns true if any on-board soldier of `by` reaches `square`.
#[instrument(skip(board, rules))]
pub fn is_attacked(square: Square, by: Side, board: &Board, rules: &RuleSet) -> bool {
    board.army(by).on_board().any(|soldier| {
        rules
            .geometry_for(soldier)
            .reach(*soldier.position(), by)
            .any(|reach| reach == square)
    })
}

/// Validates a move's destination against the mover's legal set.
///
/// # Errors
///
/// [`MoveError::NoSuchSoldier`] if the soldier is not on the board for the
/// moving side, [`MoveError::InvalidDestination`] if the square is not legal.
#[instrument(skip(board, rules))]
pub fn check_destination(mv: &Move, board: &Board, rules: &RuleSet) -> Result<(), MoveError> {
    let soldier = board
        .on_board_soldier(mv.side, mv.soldier)
        .ok_or(MoveError::NoSuchSoldier(mv.soldier))?;
    let legal = legal_destinations(
        rules.geometry_for(soldier),
        *soldier.position(),
        board,
        mv.side,
        rules,
    );
    if legal.contains(&mv.to) {
        Ok(())
    } else {
        debug!(to = %mv.to, ?legal, "Destination not in legal set");
        Err(MoveError::InvalidDestination(mv.to))
    }
}

/// Applies a move: validates it, captures any opposing soldier on the
/// destination, relocates the mover and handles promotion, in one step.
///
/// On error the board is left untouched.
///
/// # Errors
///
/// See [`check_destination`].
#[instrument(skip(board, rules))]
pub fn apply_move(board: &mut Board, mv: &Move, rules: &RuleSet) -> Result<AppliedMove, MoveError> {
    check_destination(mv, board, rules)?;

    let (category, from, already_promoted) = board
        .on_board_soldier(mv.side, mv.soldier)
        .map(|s| (*s.category(), *s.position(), *s.promoted()))
        .ok_or(MoveError::NoSuchSoldier(mv.soldier))?;

    let captured = match board.occupant(mv.to) {
        Some((owner, victim)) if owner != mv.side => Some(Capture {
            soldier: *victim.id(),
            category: *victim.category(),
        }),
        _ => None,
    };
    if let Some(capture) = captured {
        board.mark_standby(mv.side.opponent(), capture.soldier);
        debug!(victim = %capture.soldier, category = %capture.category, "Captured");
    }

    board.set_position(mv.side, mv.soldier, mv.to);

    let promoted = rules.promotion
        && category == Category::Hiyoko
        && !already_promoted
        && mv.to.y == rules.goal_rank(mv.side);
    if promoted {
        board.promote(mv.side, mv.soldier);
        debug!(soldier = %mv.soldier, "Promoted");
    }

    Ok(AppliedMove {
        side: mv.side,
        soldier: mv.soldier,
        category,
        from,
        to: mv.to,
        captured,
        promoted,
    })
}
