//! Errors returned by the game authority.

use crate::db::DbError;
use crate::identity::{MatchId, PlayerId};
use strictly_shougi::{MoveError, SoldierId, Square};

/// Why an authority operation was rejected.
///
/// Every variant except [`AuthorityError::Storage`] and
/// [`AuthorityError::InvariantViolation`] is a caller error: the request must
/// be corrected before resubmitting. A rejected operation has no effect.
#[derive(Debug, Clone, derive_more::Display, strum::IntoStaticStr)]
pub enum AuthorityError {
    /// The match id is already in use by a live or unclaimed match.
    #[display("Match {} already exists", _0)]
    DuplicateMatch(MatchId),

    /// No match with this id.
    #[display("No such match {}", _0)]
    NoSuchMatch(MatchId),

    /// The match has already been accepted.
    #[display("Match {} has already started", _0)]
    AlreadyStarted(MatchId),

    /// The offered stake differs from the host's deposit.
    #[display("Stake mismatch: expected {}, offered {}", expected, offered)]
    StakeMismatch {
        /// Host deposit.
        expected: u64,
        /// Offered amount.
        offered: u64,
    },

    /// A stake of zero was offered.
    #[display("Stake must be greater than zero")]
    ZeroStake,

    /// The host tried to accept their own match.
    #[display("{} cannot accept their own match", _0)]
    SelfChallenge(PlayerId),

    /// The match is not accepting moves.
    #[display("Match {} is not active", _0)]
    NotActive(MatchId),

    /// The caller is not the side to move.
    #[display("Not {}'s turn", _0)]
    NotYourTurn(PlayerId),

    /// The soldier is unknown or not on the board for the caller's side.
    #[display("Soldier {} is not on the board", _0)]
    NoSuchSoldier(SoldierId),

    /// The destination is not a legal move for the soldier.
    #[display("Invalid destination {}", _0)]
    InvalidDestination(Square),

    /// The match has not concluded yet.
    #[display("Match {} has not concluded", _0)]
    NotConcluded(MatchId),

    /// The caller is not the declared winner.
    #[display("{} is not the winner", _0)]
    NotWinner(PlayerId),

    /// The stake of this match has already been paid out.
    #[display("Match {} has already been claimed", _0)]
    AlreadyClaimed(MatchId),

    /// A debug-build postcondition failed.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),

    /// The durable journal refused the write; nothing was applied.
    #[display("Storage failure: {}", _0)]
    Storage(DbError),
}

impl std::error::Error for AuthorityError {}

impl AuthorityError {
    /// Stable variant name for transport layers.
    pub fn code(&self) -> &'static str {
        self.into()
    }

    /// Maps a rules-level rejection for the given caller.
    pub(crate) fn from_move(err: MoveError, caller: &PlayerId) -> Self {
        match err {
            MoveError::WrongSide(_) => Self::NotYourTurn(caller.clone()),
            MoveError::NoSuchSoldier(id) => Self::NoSuchSoldier(id),
            MoveError::InvalidDestination(square) => Self::InvalidDestination(square),
            MoveError::InvariantViolation(msg) => Self::InvariantViolation(msg),
        }
    }
}

impl From<DbError> for AuthorityError {
    fn from(err: DbError) -> Self {
        Self::Storage(err)
    }
}
