//! Per-match record owned by the authority, and its read-only snapshot.

use crate::escrow::EscrowAccount;
use crate::identity::{MatchId, PlayerId};
use crate::matches::{MatchStatus, ShougiMatch};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strictly_shougi::{Army, Category, Side, SoldierId, SoldierStatus, WinReason};

/// A match together with its escrow entry. Unit of locking and persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MatchRecord {
    game: ShougiMatch,
    escrow: EscrowAccount,
}

impl MatchRecord {
    /// Wraps a freshly proposed match, depositing the host stake.
    pub(crate) fn open(game: ShougiMatch) -> Self {
        let mut escrow = EscrowAccount::default();
        escrow.deposit(Side::Host, *game.stake());
        Self { game, escrow }
    }

    pub(crate) fn game_mut(&mut self) -> &mut ShougiMatch {
        &mut self.game
    }

    pub(crate) fn escrow_mut(&mut self) -> &mut EscrowAccount {
        &mut self.escrow
    }

    /// Match id.
    pub fn match_id(&self) -> MatchId {
        *self.game.id()
    }

    /// Whether the id still denotes a live match: anything but a claimed,
    /// concluded one.
    pub fn is_live(&self) -> bool {
        !(self.game.status() == MatchStatus::Concluded && *self.escrow.claimed())
    }

    /// Read-only view for callers.
    pub fn snapshot(&self) -> BoardSnapshot {
        let game = &self.game;
        let board = game.board();
        let rules = game.rules();
        BoardSnapshot {
            match_id: *game.id(),
            host: game.host().clone(),
            challenger: game.challenger().clone(),
            stake: *game.stake(),
            status: game.status(),
            status_code: game.status().code(),
            turn: game.turn(),
            winner: game.winner().cloned(),
            win_reason: game.outcome().map(|o| o.reason()),
            claimed: *self.escrow.claimed(),
            host_army: soldier_views(board.army(Side::Host)),
            challenger_army: soldier_views(board.army(Side::Challenger)),
            board: board.display(rules.width, rules.height),
        }
    }
}

fn soldier_views(army: &Army) -> Vec<SoldierView> {
    army.soldiers()
        .iter()
        .map(|s| SoldierView {
            id: *s.id(),
            category: *s.category(),
            x: s.position().x,
            y: s.position().y,
            status: *s.status(),
            promoted: *s.promoted(),
        })
        .collect()
}

/// One soldier as seen in a [`BoardSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SoldierView {
    id: SoldierId,
    category: Category,
    x: u8,
    y: u8,
    status: SoldierStatus,
    promoted: bool,
}

/// Everything a caller may read about a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct BoardSnapshot {
    match_id: MatchId,
    host: PlayerId,
    challenger: Option<PlayerId>,
    stake: u64,
    status: MatchStatus,
    status_code: u8,
    turn: Option<Side>,
    winner: Option<PlayerId>,
    win_reason: Option<WinReason>,
    claimed: bool,
    host_army: Vec<SoldierView>,
    challenger_army: Vec<SoldierView>,
    board: String,
}
