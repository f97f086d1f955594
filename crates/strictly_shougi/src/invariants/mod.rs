//! First-class invariants for animal shogi.
//!
//! Invariants are logical properties that must hold throughout game execution.
//! They are testable independently and serve as documentation of system guarantees.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implementations are provided for tuples.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn check_one<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

fn finish(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check_one::<S, I1>(state, &mut violations);
        check_one::<S, I2>(state, &mut violations);
        check_one::<S, I3>(state, &mut violations);
        finish(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check_one::<S, I1>(state, &mut violations);
        check_one::<S, I2>(state, &mut violations);
        finish(violations)
    }
}

pub mod alternating_turn;
pub mod last_move_consistent;
pub mod unique_occupancy;

pub use alternating_turn::AlternatingTurnInvariant;
pub use last_move_consistent::LastMoveConsistentInvariant;
pub use unique_occupancy::UniqueOccupancyInvariant;

/// All animal-shogi invariants as a composable set.
pub type ShougiInvariants = (
    AlternatingTurnInvariant,
    UniqueOccupancyInvariant,
    LastMoveConsistentInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameInProgress, GameResult, GameSetup, Move, RuleSet, Side, SoldierId, Square};

    #[test]
    fn test_invariant_set_holds_for_fresh_game() {
        let game = GameSetup::default().start();
        assert!(ShougiInvariants::check_all(&game).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_moves() {
        let moves = [
            Move::new(Side::Challenger, SoldierId(0), Square::new(1, 3)),
            Move::new(Side::Host, SoldierId(0), Square::new(3, 2)),
            Move::new(Side::Challenger, SoldierId(3), Square::new(2, 2)),
        ];
        let Ok(GameResult::InProgress(game)) = GameInProgress::replay(RuleSet::default(), &moves)
        else {
            panic!("Expected in-progress game");
        };
        assert!(ShougiInvariants::check_all(&game).is_ok());
    }

    #[test]
    fn test_two_invariants_as_set() {
        let game = GameSetup::default().start();
        type TwoInvariants = (AlternatingTurnInvariant, UniqueOccupancyInvariant);
        assert!(TwoInvariants::check_all(&game).is_ok());
    }
}
