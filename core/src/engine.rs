use alloc::vec::Vec;
use core::ops::BitOr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Outcome of one engine pass, or of a single push within it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassOutcome {
    NoChange,
    Slid,
    Merged,
}

impl PassOutcome {
    /// Whether the board was modified.
    pub const fn changed(self) -> bool {
        use PassOutcome::*;
        match self {
            NoChange => false,
            Slid => true,
            Merged => true,
        }
    }
}

/// Used to fold push outcomes over a pass
impl BitOr for PassOutcome {
    type Output = PassOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use PassOutcome::*;
        match (self, rhs) {
            (Merged, _) => Merged,
            (_, Merged) => Merged,
            (Slid, _) => Slid,
            (_, Slid) => Slid,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// One tile stepping between two cells, kept for renderers that interpolate motion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMotion {
    pub from: Coord2,
    pub to: Coord2,
    /// Level at `to` after the step.
    pub level: Level,
    pub merged: bool,
}

impl TileMotion {
    pub const fn outcome(&self) -> PassOutcome {
        if self.merged {
            PassOutcome::Merged
        } else {
            PassOutcome::Slid
        }
    }
}

/// Runs a single pass, pushing every tile at most one cell toward `direction`.
///
/// Cells are visited starting from the edge the tiles are pushed against, so a
/// tile that just stepped is never picked up again as a source in the same
/// pass. A full move is repeated passes until one reports
/// [`PassOutcome::NoChange`]. Since a freshly merged tile may merge again on
/// the next pass, one move can merge the same tile several times.
pub fn apply_direction(board: &mut Board, direction: Direction) -> PassOutcome {
    run_pass(board, direction, |_| {})
}

/// Same as [`apply_direction`], also appending every step to `motions`.
pub fn apply_direction_traced(
    board: &mut Board,
    direction: Direction,
    motions: &mut Vec<TileMotion>,
) -> PassOutcome {
    run_pass(board, direction, |motion| motions.push(motion))
}

/// Repeats passes until the board stops changing, returning how many passes changed it.
pub fn settle_direction(board: &mut Board, direction: Direction) -> u32 {
    let mut passes = 0;
    while apply_direction(board, direction).changed() {
        passes += 1;
    }
    passes
}

fn run_pass(
    board: &mut Board,
    direction: Direction,
    mut on_motion: impl FnMut(TileMotion),
) -> PassOutcome {
    let outcome = scan_order(board.size(), direction)
        .filter_map(|coords| push_tile(board, coords, direction))
        .inspect(|&motion| on_motion(motion))
        .map(|motion| motion.outcome())
        .fold(PassOutcome::NoChange, BitOr::bitor);
    log::trace!("Pass {:?}: {:?}", direction, outcome);
    outcome
}

/// Pushes the tile at `coords` one step, merging with an equal neighbor.
fn push_tile(board: &mut Board, coords: Coord2, direction: Direction) -> Option<TileMotion> {
    let level = board[coords];
    if level == 0 {
        return None;
    }

    let target = apply_delta(coords, direction.delta(), board.size())?;
    let (next_level, merged) = match board[target] {
        0 => (level, false),
        other if other == level => (level.saturating_add(1), true),
        _ => return None,
    };

    board[target] = next_level;
    board[coords] = 0;
    Some(TileMotion {
        from: coords,
        to: target,
        level: next_level,
        merged,
    })
}

/// Source cells of a pass, starting at the edge tiles are pushed against.
fn scan_order(size: Coord2, direction: Direction) -> impl Iterator<Item = Coord2> {
    use Direction::*;

    let (rows, cols) = size;
    let vertical = direction.is_vertical();
    let reversed = matches!(direction, Down | Right);
    let (outer, inner) = if vertical { (rows, cols) } else { (cols, rows) };

    (0..outer).flat_map(move |step| {
        let line = if reversed { outer - 1 - step } else { step };
        (0..inner).map(move |pos| if vertical { (line, pos) } else { (pos, line) })
    })
}
