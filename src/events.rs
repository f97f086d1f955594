//! Notifications emitted by committed authority operations.

use crate::identity::{MatchId, PlayerId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strictly_shougi::{AppliedMove, Category, Side, SoldierId, WinReason};

/// Something observable that happened to a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "event")]
pub enum GameEvent {
    /// A host opened a match and deposited the stake.
    ProposeGame {
        /// Match id.
        match_id: MatchId,
        /// Proposing player.
        host: PlayerId,
        /// Host deposit.
        stake: u64,
    },
    /// A challenger matched the stake; the match is active.
    AcceptGame {
        /// Match id.
        match_id: MatchId,
        /// Accepting player.
        challenger: PlayerId,
    },
    /// A soldier moved.
    MoveSoldier {
        /// Match id.
        match_id: MatchId,
        /// Moving side.
        side: Side,
        /// Soldier id within the moving army.
        soldier_id: SoldierId,
        /// Soldier category.
        category: Category,
        /// Destination file.
        x: u8,
        /// Destination rank.
        y: u8,
        /// Opposing soldier taken by this move, if any.
        captured: Option<SoldierId>,
        /// Whether the soldier promoted on landing.
        promoted: bool,
    },
    /// The match reached a terminal state.
    GameConcluded {
        /// Match id.
        match_id: MatchId,
        /// Winning player.
        winner: PlayerId,
        /// Winning side.
        side: Side,
        /// How the match was won.
        reason: WinReason,
    },
    /// The winner collected the escrow.
    LootClaimed {
        /// Match id.
        match_id: MatchId,
        /// Paid player.
        winner: PlayerId,
        /// Total paid out.
        amount: u128,
    },
}

impl GameEvent {
    /// Builds a `MoveSoldier` event from an applied move.
    pub fn moved(match_id: MatchId, applied: &AppliedMove) -> Self {
        GameEvent::MoveSoldier {
            match_id,
            side: applied.side,
            soldier_id: applied.soldier,
            category: applied.category,
            x: applied.to.x,
            y: applied.to.y,
            captured: applied.captured.map(|c| c.soldier),
            promoted: applied.promoted,
        }
    }

    /// Event name, e.g. `"MoveSoldier"`.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Match the event belongs to.
    pub fn match_id(&self) -> MatchId {
        match self {
            GameEvent::ProposeGame { match_id, .. }
            | GameEvent::AcceptGame { match_id, .. }
            | GameEvent::MoveSoldier { match_id, .. }
            | GameEvent::GameConcluded { match_id, .. }
            | GameEvent::LootClaimed { match_id, .. } => *match_id,
        }
    }
}

/// Acknowledgement of an applied operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct Ack {
    match_id: MatchId,
    events: Vec<GameEvent>,
}
