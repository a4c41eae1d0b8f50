#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use autoplay::*;
pub use board::*;
pub use engine::*;
pub use error::*;
pub use game::*;
pub use input::*;
pub use snapshot::*;
pub use ticker::*;
pub use types::*;

mod autoplay;
mod board;
mod engine;
mod error;
mod game;
mod input;
mod snapshot;
mod ticker;
mod types;

/// When a settled board counts as lost.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverRule {
    /// Any full board ends the game, even if a merge is still possible.
    BoardFull,
    /// The game ends only once no push in any direction could change the board.
    NoMovesLeft,
}

impl Default for GameOverRule {
    fn default() -> Self {
        Self::BoardFull
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board size as `(rows, cols)`.
    pub size: Coord2,
    pub win_level: Level,
    /// Display frames per logical tick.
    pub frames_per_step: u16,
    pub win_ends_game: bool,
    pub game_over_rule: GameOverRule,
    /// Idle frames demo mode waits before picking a move.
    pub demo_delay: u16,
}

impl GameConfig {
    pub const DEFAULT_DEMO_DELAY: u16 = 10;

    pub const fn new_unchecked(size: Coord2, frames_per_step: u16) -> Self {
        Self {
            size,
            win_level: WIN_LEVEL,
            frames_per_step,
            win_ends_game: false,
            game_over_rule: GameOverRule::BoardFull,
            demo_delay: Self::DEFAULT_DEMO_DELAY,
        }
    }

    pub fn new((rows, cols): Coord2, frames_per_step: u16) -> Self {
        let rows = rows.clamp(1, Coord::MAX);
        let cols = cols.clamp(1, Coord::MAX);
        let frames_per_step = frames_per_step.max(1);
        Self::new_unchecked((rows, cols), frames_per_step)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 || self.frames_per_step == 0 {
            return Err(GameError::InvalidSize);
        }
        if !(1..=MAX_LEVEL).contains(&self.win_level) {
            return Err(GameError::InvalidWinLevel);
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Variant::default().config()
    }
}

/// Board presets of the console builds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// 16x8 board drawn as text cells.
    Text,
    /// 7x7 board drawn with sprites.
    Sprite,
    /// 7x7 sprite board with faster steps, reaching 2048 ends the game.
    SmoothSprite,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Text, Variant::Sprite, Variant::SmoothSprite];

    pub const fn config(self) -> GameConfig {
        use Variant::*;
        match self {
            Text => GameConfig::new_unchecked((16, 8), 4),
            Sprite => GameConfig::new_unchecked((7, 7), 8),
            SmoothSprite => {
                let mut config = GameConfig::new_unchecked((7, 7), 4);
                config.win_ends_game = true;
                config
            }
        }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::Text
    }
}
