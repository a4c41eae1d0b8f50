use alloc::vec::Vec;
use core::ops::{Index, IndexMut};
use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Level of the tile that wins the game, displayed as 2048.
pub const WIN_LEVEL: Level = 11;

/// How many rejected samples per cell the spawner tolerates before picking by index.
const SAMPLES_PER_CELL: u32 = 4;

/// Grid of tile levels, indexed by `(row, col)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: Coord2,
    cells: Array2<Level>,
}

impl Board {
    pub fn new(size: Coord2) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidSize);
        }
        Ok(Self {
            size,
            cells: Array2::default(size.to_nd_index()),
        })
    }

    /// Builds a board from row-major levels.
    pub fn from_levels(size: Coord2, levels: &[Level]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidSize);
        }
        let cells = Array2::from_shape_vec(size.to_nd_index(), levels.to_vec())
            .map_err(|_| GameError::InvalidBoardShape)?;
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.size.0 && coords.1 < self.size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<Level> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn set(&mut self, coords: Coord2, level: Level) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        self[coords] = level;
        Ok(())
    }

    pub fn levels(&self) -> &Array2<Level> {
        &self.cells
    }

    /// Row-major copy of every level.
    pub fn to_levels(&self) -> Vec<Level> {
        self.cells.iter().copied().collect()
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Level)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &level)| ((row as Coord, col as Coord), level))
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    pub fn empty_count(&self) -> CellCount {
        self.cells.iter().filter(|&&level| level == 0).count() as CellCount
    }

    pub fn is_full(&self) -> bool {
        !self.cells.iter().any(|&level| level == 0)
    }

    /// Whether any tile has reached `win_level`. Empty cells never count.
    pub fn contains_winning_tile(&self, win_level: Level) -> bool {
        win_level != 0 && self.cells.iter().any(|&cell| cell == win_level)
    }

    pub fn highest_level(&self) -> Level {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Whether any push could still change the board: an empty cell, or two
    /// orthogonally adjacent tiles of the same level.
    pub fn has_legal_move(&self) -> bool {
        if !self.is_full() {
            return true;
        }

        self.iter_cells().any(|(coords, level)| {
            [Direction::Down, Direction::Right]
                .into_iter()
                .filter_map(|dir| apply_delta(coords, dir.delta(), self.size))
                .any(|neighbor| self[neighbor] == level)
        })
    }

    /// Places a level 1 or 2 tile (even odds) in a uniformly random empty cell.
    ///
    /// Cells are drawn by rejection sampling. The number of draws is bounded,
    /// after which the tile goes to a uniformly chosen empty cell by index, so
    /// the distribution is the same either way.
    pub fn spawn_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Coord2> {
        let empty = self.empty_count();
        if empty == 0 {
            return Err(GameError::BoardFull);
        }

        let level: Level = rng.random_range(1..=2);
        let (rows, cols) = self.size;

        let max_samples = u32::from(self.total_cells()) * SAMPLES_PER_CELL;
        for _ in 0..max_samples {
            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            if self[coords] == 0 {
                self[coords] = level;
                return Ok(coords);
            }
        }

        log::warn!(
            "Spawn sampling rejected {} cells, picking among {} empty cells",
            max_samples,
            empty
        );
        let nth = rng.random_range(0..empty);
        let coords = self
            .iter_cells()
            .filter(|&(_, level)| level == 0)
            .map(|(coords, _)| coords)
            .nth(nth.into())
            .ok_or(GameError::BoardFull)?;
        self[coords] = level;
        Ok(coords)
    }
}

impl Index<Coord2> for Board {
    type Output = Level;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.cells[(row as usize, col as usize)]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, (row, col): Coord2) -> &mut Self::Output {
        &mut self.cells[(row as usize, col as usize)]
    }
}
