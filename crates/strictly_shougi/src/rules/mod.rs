//! Game rules for animal shogi.
//!
//! Pure functions over a board snapshot. Rules never hold state; the typestate
//! game decides when to call them and what to do with the result.

pub mod moves;
pub mod win;

pub use moves::{apply_move, check_destination, is_attacked, legal_destinations};
pub use win::evaluate;
