//! Board model: two armies and accessors over them.
//!
//! The board performs no validation. Legality is decided by the rules module
//! before any of the mutating accessors are called.

use super::{Category, Side, Soldier, SoldierId, Square};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Soldiers belonging to one side, in id-assignment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Army {
    soldiers: Vec<Soldier>,
}

impl Army {
    /// Creates an army from soldiers in id order.
    pub fn new(soldiers: Vec<Soldier>) -> Self {
        Self { soldiers }
    }

    /// Looks up a soldier by id, whatever its status.
    pub fn soldier(&self, id: SoldierId) -> Option<&Soldier> {
        self.soldiers.iter().find(|s| *s.id() == id)
    }

    fn soldier_mut(&mut self, id: SoldierId) -> Option<&mut Soldier> {
        self.soldiers.iter_mut().find(|s| *s.id() == id)
    }

    /// Iterates soldiers still in play.
    pub fn on_board(&self) -> impl Iterator<Item = &Soldier> {
        self.soldiers.iter().filter(|s| s.is_on_board())
    }
}

/// Both armies of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    host: Army,
    challenger: Army,
}

impl Board {
    /// Creates a board from the two armies.
    pub fn from_armies(host: Vec<Soldier>, challenger: Vec<Soldier>) -> Self {
        Self {
            host: Army::new(host),
            challenger: Army::new(challenger),
        }
    }

    /// Returns a side's army.
    pub fn army(&self, side: Side) -> &Army {
        match side {
            Side::Host => &self.host,
            Side::Challenger => &self.challenger,
        }
    }

    fn army_mut(&mut self, side: Side) -> &mut Army {
        match side {
            Side::Host => &mut self.host,
            Side::Challenger => &mut self.challenger,
        }
    }

    /// Looks up a soldier by side and id.
    pub fn soldier(&self, side: Side, id: SoldierId) -> Option<&Soldier> {
        self.army(side).soldier(id)
    }

    /// Looks up a soldier that is still on the board.
    pub fn on_board_soldier(&self, side: Side, id: SoldierId) -> Option<&Soldier> {
        self.soldier(side, id).filter(|s| s.is_on_board())
    }

    /// Returns the on-board soldier standing on a square, with its side.
    pub fn occupant(&self, square: Square) -> Option<(Side, &Soldier)> {
        Side::iter().find_map(|side| {
            self.army(side)
                .on_board()
                .find(|s| *s.position() == square)
                .map(|s| (side, s))
        })
    }

    /// Returns a side's Lion if it is still on the board.
    pub fn lion(&self, side: Side) -> Option<&Soldier> {
        self.army(side)
            .on_board()
            .find(|s| *s.category() == Category::Lion)
    }

    /// Moves a soldier. Returns false if the soldier does not exist.
    pub fn set_position(&mut self, side: Side, id: SoldierId, to: Square) -> bool {
        match self.army_mut(side).soldier_mut(id) {
            Some(soldier) => {
                soldier.set_position(to);
                true
            }
            None => false,
        }
    }

    /// Marks a soldier as captured. Returns false if the soldier does not exist.
    pub fn mark_standby(&mut self, side: Side, id: SoldierId) -> bool {
        match self.army_mut(side).soldier_mut(id) {
            Some(soldier) => {
                soldier.set_standby();
                true
            }
            None => false,
        }
    }

    /// Promotes a soldier. Returns false if the soldier does not exist.
    pub fn promote(&mut self, side: Side, id: SoldierId) -> bool {
        match self.army_mut(side).soldier_mut(id) {
            Some(soldier) => {
                soldier.set_promoted();
                true
            }
            None => false,
        }
    }

    /// Renders the board, rank 1 at the top.
    ///
    /// Host pieces are lowercase, challenger pieces uppercase; a promoted
    /// Hiyoko shows as `n`/`N`.
    pub fn display(&self, width: u8, height: u8) -> String {
        let mut rows = Vec::with_capacity(height as usize);
        for y in 1..=height {
            let row: Vec<String> = (1..=width)
                .map(|x| match self.occupant(Square::new(x, y)) {
                    None => ".".to_string(),
                    Some((side, soldier)) => {
                        let symbol = match (soldier.category(), *soldier.promoted()) {
                            (Category::Lion, _) => 'l',
                            (Category::Kirin, _) => 'k',
                            (Category::Hiyoko, false) => 'h',
                            (Category::Hiyoko, true) => 'n',
                        };
                        match side {
                            Side::Host => symbol.to_string(),
                            Side::Challenger => symbol.to_ascii_uppercase().to_string(),
                        }
                    }
                })
                .collect();
            rows.push(row.join(" "));
        }
        rows.join("\n")
    }
}
