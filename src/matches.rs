//! Match state machine: lifecycle and turn ownership for one staked match.
//!
//! A match moves Proposing → Active → Concluded and never back. The game
//! itself lives in the typestate phases of `strictly_shougi`; this module
//! binds those phases to the two players and the agreed stake.

use crate::error::AuthorityError;
use crate::identity::{MatchId, PlayerId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strictly_shougi::{
    AppliedMove, Board, GameFinished, GameInProgress, GameResult, GameSetup, Move, Outcome,
    RuleSet, Side, SoldierId, Square,
};
use tracing::{debug, info, instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Status
// ─────────────────────────────────────────────────────────────

/// Lifecycle status of a match.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    schemars::JsonSchema,
)]
pub enum MatchStatus {
    /// Host deposited; waiting for a challenger.
    Proposing,
    /// Both deposits in; moves accepted.
    Active,
    /// A terminal condition was reached; the board is frozen.
    Concluded,
}

impl MatchStatus {
    /// Canonical numeric code: Proposing = 1, Active = 2, Concluded = 3.
    pub fn code(self) -> u8 {
        match self {
            MatchStatus::Proposing => 1,
            MatchStatus::Active => 2,
            MatchStatus::Concluded => 3,
        }
    }
}

/// Game state for each lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "game")]
pub enum MatchPhase {
    /// Armies laid out, no moves possible.
    Proposing(GameSetup),
    /// Game in progress.
    Active(GameInProgress),
    /// Game over with an outcome.
    Concluded(GameFinished),
}

/// Result of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct MoveReport {
    applied: AppliedMove,
    outcome: Option<Outcome>,
}

// ─────────────────────────────────────────────────────────────
//  Match
// ─────────────────────────────────────────────────────────────

/// One staked match between a host and a challenger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ShougiMatch {
    id: MatchId,
    host: PlayerId,
    challenger: Option<PlayerId>,
    stake: u64,
    phase: MatchPhase,
}

impl ShougiMatch {
    /// Opens a match in `Proposing` with both armies laid out.
    ///
    /// # Errors
    ///
    /// [`AuthorityError::ZeroStake`] if `stake` is zero.
    #[instrument(skip(rules), fields(match_id = %id, host = %host))]
    pub fn propose(
        id: MatchId,
        host: PlayerId,
        stake: u64,
        rules: RuleSet,
    ) -> Result<Self, AuthorityError> {
        if stake == 0 {
            return Err(AuthorityError::ZeroStake);
        }
        debug!(stake, "Laying out armies");
        Ok(Self {
            id,
            host,
            challenger: None,
            stake,
            phase: MatchPhase::Proposing(GameSetup::new(rules)),
        })
    }

    /// Seats the challenger and starts the game.
    ///
    /// # Errors
    ///
    /// [`AuthorityError::AlreadyStarted`], [`AuthorityError::SelfChallenge`]
    /// or [`AuthorityError::StakeMismatch`], checked in that order.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub fn accept(&mut self, challenger: PlayerId, stake: u64) -> Result<(), AuthorityError> {
        let MatchPhase::Proposing(setup) = &self.phase else {
            return Err(AuthorityError::AlreadyStarted(self.id));
        };
        if challenger == self.host {
            return Err(AuthorityError::SelfChallenge(challenger));
        }
        if stake != self.stake {
            warn!(expected = self.stake, offered = stake, "Stake mismatch");
            return Err(AuthorityError::StakeMismatch {
                expected: self.stake,
                offered: stake,
            });
        }

        let game = setup.clone().start();
        info!(%challenger, to_move = %game.to_move(), "Match active");
        self.challenger = Some(challenger);
        self.phase = MatchPhase::Active(game);
        Ok(())
    }

    /// Applies `caller`'s move of `soldier` to `to`.
    ///
    /// # Errors
    ///
    /// [`AuthorityError::NotActive`], [`AuthorityError::NotYourTurn`],
    /// [`AuthorityError::NoSuchSoldier`] or
    /// [`AuthorityError::InvalidDestination`], checked in that order. On error
    /// the match is unchanged.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub fn submit_move(
        &mut self,
        caller: &PlayerId,
        soldier: SoldierId,
        to: Square,
    ) -> Result<MoveReport, AuthorityError> {
        let MatchPhase::Active(game) = &self.phase else {
            return Err(AuthorityError::NotActive(self.id));
        };
        let Some(side) = self.side_of(caller) else {
            warn!(%caller, "Move from non-participant");
            return Err(AuthorityError::NotYourTurn(caller.clone()));
        };

        let result = game
            .make_move(Move::new(side, soldier, to))
            .map_err(|e| AuthorityError::from_move(e, caller))?;

        let applied = *result
            .last_move()
            .ok_or_else(|| AuthorityError::InvariantViolation("Move left no record".into()))?;

        let outcome = match result {
            GameResult::InProgress(next) => {
                self.phase = MatchPhase::Active(next);
                None
            }
            GameResult::Finished(done) => {
                let outcome = *done.outcome();
                info!(%outcome, "Match concluded");
                self.phase = MatchPhase::Concluded(done);
                Some(outcome)
            }
        };

        Ok(MoveReport { applied, outcome })
    }

    /// Current lifecycle status.
    pub fn status(&self) -> MatchStatus {
        match self.phase {
            MatchPhase::Proposing(_) => MatchStatus::Proposing,
            MatchPhase::Active(_) => MatchStatus::Active,
            MatchPhase::Concluded(_) => MatchStatus::Concluded,
        }
    }

    /// Side to move while the match is active.
    pub fn turn(&self) -> Option<Side> {
        match &self.phase {
            MatchPhase::Active(game) => Some(game.to_move()),
            _ => None,
        }
    }

    /// The board in whatever phase the match is in.
    pub fn board(&self) -> &Board {
        match &self.phase {
            MatchPhase::Proposing(g) => g.board(),
            MatchPhase::Active(g) => g.board(),
            MatchPhase::Concluded(g) => g.board(),
        }
    }

    /// Rule set the match was proposed under.
    pub fn rules(&self) -> &RuleSet {
        match &self.phase {
            MatchPhase::Proposing(g) => g.rules(),
            MatchPhase::Active(g) => g.rules(),
            MatchPhase::Concluded(g) => g.rules(),
        }
    }

    /// Outcome once concluded.
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.phase {
            MatchPhase::Concluded(g) => Some(g.outcome()),
            _ => None,
        }
    }

    /// Player seated on `side`, if any.
    pub fn player(&self, side: Side) -> Option<&PlayerId> {
        match side {
            Side::Host => Some(&self.host),
            Side::Challenger => self.challenger.as_ref(),
        }
    }

    /// Side `player` plays, or `None` for non-participants.
    pub fn side_of(&self, player: &PlayerId) -> Option<Side> {
        if *player == self.host {
            Some(Side::Host)
        } else if self.challenger.as_ref() == Some(player) {
            Some(Side::Challenger)
        } else {
            None
        }
    }

    /// Winning player once concluded.
    pub fn winner(&self) -> Option<&PlayerId> {
        self.outcome().and_then(|o| self.player(o.winner()))
    }
}
