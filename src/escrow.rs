//! Escrow ledger: stake deposits per match and the one-time payout.

use crate::error::AuthorityError;
use crate::identity::{MatchId, PlayerId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strictly_shougi::Side;
use tracing::{info, instrument, warn};

/// Deposits held for one match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct EscrowAccount {
    host_deposit: u64,
    challenger_deposit: u64,
    claimed: bool,
}

/// Value released to a winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct Payout {
    match_id: MatchId,
    winner: PlayerId,
    amount: u128,
}

impl EscrowAccount {
    /// Records a side's deposit. Only propose and accept deposit.
    #[instrument(skip(self))]
    pub(crate) fn deposit(&mut self, side: Side, amount: u64) {
        match side {
            Side::Host => self.host_deposit = amount,
            Side::Challenger => self.challenger_deposit = amount,
        }
    }

    /// Total value held for the match.
    pub fn total(&self) -> u128 {
        u128::from(self.host_deposit) + u128::from(self.challenger_deposit)
    }

    /// Releases both deposits to `winner`, exactly once.
    ///
    /// `winner` is `None` while the match has not concluded.
    ///
    /// # Errors
    ///
    /// [`AuthorityError::NotConcluded`], [`AuthorityError::NotWinner`] or
    /// [`AuthorityError::AlreadyClaimed`], checked in that order.
    #[instrument(skip(self), fields(claimed = self.claimed))]
    pub(crate) fn claim(
        &mut self,
        match_id: MatchId,
        winner: Option<&PlayerId>,
        claimant: &PlayerId,
    ) -> Result<Payout, AuthorityError> {
        let Some(winner) = winner else {
            return Err(AuthorityError::NotConcluded(match_id));
        };
        if winner != claimant {
            warn!(%claimant, %winner, "Claim by non-winner");
            return Err(AuthorityError::NotWinner(claimant.clone()));
        }
        if self.claimed {
            return Err(AuthorityError::AlreadyClaimed(match_id));
        }

        self.claimed = true;
        let payout = Payout::new(match_id, winner.clone(), self.total());
        info!(amount = payout.amount, "Escrow released");
        Ok(payout)
    }
}
