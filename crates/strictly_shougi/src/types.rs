//! Core domain types for animal shogi.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One of the two sides of a match.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Side {
    /// The player who proposed the match. Home rank is `y = 1`.
    Host,
    /// The player who accepted the match. Home rank is the last rank.
    Challenger,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Host => Side::Challenger,
            Side::Challenger => Side::Host,
        }
    }

    /// Direction of "forward" along the y axis for this side.
    pub fn forward(self) -> i8 {
        match self {
            Side::Host => 1,
            Side::Challenger => -1,
        }
    }
}

/// Piece category. Immutable for the lifetime of a soldier.
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
)]
pub enum Category {
    /// King-class piece. Losing it loses the match.
    Lion,
    /// Forward piece (chick). Promotes on the opponent's home rank.
    Hiyoko,
    /// Mid-range piece (giraffe).
    Kirin,
}

/// Whether a soldier is still in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum SoldierStatus {
    /// On the board and able to move.
    OnBoard,
    /// Captured. Kept for queries only.
    Standby,
}

/// A square on the board. Coordinates are 1-based.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Square {
    /// File, `1..=width`.
    pub x: u8,
    /// Rank, `1..=height`.
    pub y: u8,
}

impl Square {
    /// Creates a square. No bounds check: see [`crate::RuleSet::contains`].
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Shifts the square, returning `None` if a coordinate leaves `u8` range.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Self { x, y })
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Identifier of a soldier, unique within its army.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct SoldierId(pub u32);

/// A single piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Soldier {
    id: SoldierId,
    category: Category,
    position: Square,
    status: SoldierStatus,
    #[serde(default)]
    promoted: bool,
}

impl Soldier {
    /// Creates an unpromoted soldier on the board.
    pub fn new(id: SoldierId, category: Category, position: Square) -> Self {
        Self {
            id,
            category,
            position,
            status: SoldierStatus::OnBoard,
            promoted: false,
        }
    }

    /// Returns true while the soldier is in play.
    pub fn is_on_board(&self) -> bool {
        self.status == SoldierStatus::OnBoard
    }

    pub(crate) fn set_position(&mut self, position: Square) {
        self.position = position;
    }

    pub(crate) fn set_standby(&mut self) {
        self.status = SoldierStatus::Standby;
    }

    pub(crate) fn set_promoted(&mut self) {
        self.promoted = true;
    }
}
