use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Read-only view of a game for renderers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub size: Coord2,
    pub levels: Array2<Level>,
    pub state: MoveState,
    pub demo: bool,
    pub won: bool,
}

impl Snapshot {
    pub fn from_game<T: TickSource>(game: &Game<T>) -> Self {
        let board = game.board();
        Self {
            size: board.size(),
            levels: board.levels().clone(),
            state: game.state(),
            demo: game.is_demo(),
            won: game.has_won(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let expected = (self.size.0 as usize, self.size.1 as usize);
        if self.levels.dim() != expected {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(())
    }

    pub fn level_at(&self, coords: Coord2) -> Level {
        self.levels[coords.to_nd_index()]
    }

    /// Displayed number at `coords`, `0` for an empty cell.
    pub fn value_at(&self, coords: Coord2) -> u32 {
        level_value(self.level_at(coords))
    }

    pub fn highest_value(&self) -> u32 {
        level_value(self.levels.iter().copied().max().unwrap_or(0))
    }
}
