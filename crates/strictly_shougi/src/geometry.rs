//! Movement geometry and the configurable rule set.
//!
//! Piece movement is a closed set of [`Geometry`] variants, each a pure table
//! of single-step offsets expressed relative to the mover's forward direction.
//! Which variant a category uses, the board size, promotion and the starting
//! layout all live in [`RuleSet`] so they can be changed without touching the
//! state machine.

use super::{Board, Category, Side, Soldier, SoldierId, Square};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

/// Single-step movement pattern.
///
/// Offsets are `(dx, forward)`: positive `forward` points toward the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum Geometry {
    /// One square in any of eight directions.
    King,
    /// One square along the four orthogonal directions.
    Orthogonal,
    /// One square straight ahead.
    Forward,
    /// Orthogonal plus the two forward diagonals.
    Gold,
}

impl Geometry {
    /// Returns the offset table for this pattern.
    pub fn offsets(self) -> &'static [(i8, i8)] {
        match self {
            Geometry::King => &[
                (-1, -1),
                (0, -1),
                (1, -1),
                (-1, 0),
                (1, 0),
                (-1, 1),
                (0, 1),
                (1, 1),
            ],
            Geometry::Orthogonal => &[(0, -1), (-1, 0), (1, 0), (0, 1)],
            Geometry::Forward => &[(0, 1)],
            Geometry::Gold => &[(0, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)],
        }
    }

    /// Yields the board-space squares reachable from `from` by `side`,
    /// before bounds or occupancy filtering.
    pub fn reach(self, from: Square, side: Side) -> impl Iterator<Item = Square> {
        let forward = side.forward();
        self.offsets()
            .iter()
            .filter_map(move |&(dx, dy)| from.offset(dx, dy * forward))
    }
}

/// Geometry assigned to each category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryTable {
    /// Lion movement.
    pub lion: Geometry,
    /// Kirin movement.
    pub kirin: Geometry,
    /// Unpromoted Hiyoko movement.
    pub hiyoko: Geometry,
    /// Promoted Hiyoko movement.
    pub promoted_hiyoko: Geometry,
}

impl Default for GeometryTable {
    fn default() -> Self {
        Self {
            lion: Geometry::King,
            kirin: Geometry::Orthogonal,
            hiyoko: Geometry::Forward,
            promoted_hiyoko: Geometry::Gold,
        }
    }
}

/// One entry of the starting layout, from the challenger's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Category of the placed soldier.
    pub category: Category,
    /// File.
    pub x: u8,
    /// Rank.
    pub y: u8,
}

impl Placement {
    const fn new(category: Category, x: u8, y: u8) -> Self {
        Self { category, x, y }
    }
}

/// Complete rule configuration for a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Number of files.
    pub width: u8,
    /// Number of ranks.
    pub height: u8,
    /// Geometry per category.
    pub geometry: GeometryTable,
    /// Whether a Hiyoko promotes on the opponent's home rank.
    pub promotion: bool,
    /// Side that moves first once the match is accepted.
    pub first_mover: Side,
    /// Challenger layout. Ids are assigned in order; the host army is the
    /// 180° rotation of this list.
    pub layout: Vec<Placement>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            width: 3,
            height: 4,
            geometry: GeometryTable::default(),
            promotion: true,
            first_mover: Side::Challenger,
            layout: vec![
                Placement::new(Category::Kirin, 1, 4),
                Placement::new(Category::Lion, 2, 4),
                Placement::new(Category::Kirin, 3, 4),
                Placement::new(Category::Hiyoko, 2, 3),
            ],
        }
    }
}

impl RuleSet {
    /// Returns true if the square lies on the board.
    pub fn contains(&self, square: Square) -> bool {
        (1..=self.width).contains(&square.x) && (1..=self.height).contains(&square.y)
    }

    /// Home rank of a side.
    pub fn home_rank(&self, side: Side) -> u8 {
        match side {
            Side::Host => 1,
            Side::Challenger => self.height,
        }
    }

    /// Rank a side's Lion must reach to win: the opponent's home rank.
    pub fn goal_rank(&self, side: Side) -> u8 {
        self.home_rank(side.opponent())
    }

    /// Selects the geometry for a soldier.
    pub fn geometry_for(&self, soldier: &Soldier) -> Geometry {
        match soldier.category() {
            Category::Lion => self.geometry.lion,
            Category::Kirin => self.geometry.kirin,
            Category::Hiyoko if *soldier.promoted() => self.geometry.promoted_hiyoko,
            Category::Hiyoko => self.geometry.hiyoko,
        }
    }

    /// Maps a challenger-side square to the host side.
    fn mirror(&self, x: u8, y: u8) -> Square {
        Square::new(self.width + 1 - x, self.height + 1 - y)
    }

    /// Lays out both armies.
    #[instrument(skip(self))]
    pub fn initial_board(&self) -> Board {
        let mut host = Vec::with_capacity(self.layout.len());
        let mut challenger = Vec::with_capacity(self.layout.len());
        for (index, placement) in self.layout.iter().enumerate() {
            let id = SoldierId(index as u32);
            challenger.push(Soldier::new(
                id,
                placement.category,
                Square::new(placement.x, placement.y),
            ));
            host.push(Soldier::new(
                id,
                placement.category,
                self.mirror(placement.x, placement.y),
            ));
        }
        debug!(soldiers = self.layout.len(), "Laid out armies");
        Board::from_armies(host, challenger)
    }

    /// Checks the rule set is playable.
    ///
    /// # Errors
    ///
    /// Returns [`RuleSetError`] if the board is degenerate, the layout does not
    /// hold exactly one Lion, a placement is off the board, or the layout
    /// overlaps with itself or its mirror.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), RuleSetError> {
        if self.width == 0 || self.height < 2 || self.width == u8::MAX || self.height == u8::MAX {
            return Err(RuleSetError::new(format!(
                "Board {}x{} is not playable",
                self.width, self.height
            )));
        }

        let lions = self
            .layout
            .iter()
            .filter(|p| p.category == Category::Lion)
            .count();
        if lions != 1 {
            warn!(lions, "Layout must contain exactly one Lion");
            return Err(RuleSetError::new(format!(
                "Layout must contain exactly one Lion, found {}",
                lions
            )));
        }

        let mut occupied = HashSet::new();
        for placement in &self.layout {
            let square = Square::new(placement.x, placement.y);
            if !self.contains(square) {
                return Err(RuleSetError::new(format!(
                    "Placement {} is off the board",
                    square
                )));
            }
            if !occupied.insert(square) {
                return Err(RuleSetError::new(format!("Placement {} is duplicated", square)));
            }
        }
        for placement in &self.layout {
            let mirrored = self.mirror(placement.x, placement.y);
            if occupied.contains(&mirrored) {
                return Err(RuleSetError::new(format!(
                    "Placement {} collides with the host army",
                    mirrored
                )));
            }
        }

        Ok(())
    }
}

/// Invalid rule set.
#[derive(Debug, Clone, Display, Error)]
#[display("Rule set error: {} at {}:{}", message, file, line)]
pub struct RuleSetError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl RuleSetError {
    /// Creates a new rule set error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
