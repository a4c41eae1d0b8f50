use rand::prelude::*;

use crate::*;

/// Demo mode move picker: once the board has been idle for `delay` frames,
/// picks a uniformly random direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AutoPlayer {
    delay: u16,
    idle_frames: u16,
}

impl AutoPlayer {
    pub fn new(delay: u16) -> Self {
        Self {
            delay: delay.max(1),
            idle_frames: 0,
        }
    }

    pub fn delay(&self) -> u16 {
        self.delay
    }

    pub fn reset(&mut self) {
        self.idle_frames = 0;
    }

    /// Called once per display frame with whether the game accepts moves.
    pub fn poll<R: Rng + ?Sized>(&mut self, idle: bool, rng: &mut R) -> Option<Direction> {
        if !idle {
            self.idle_frames = 0;
            return None;
        }

        self.idle_frames = self.idle_frames.saturating_add(1);
        if self.idle_frames < self.delay {
            return None;
        }

        self.idle_frames = 0;
        Some(Direction::ALL[rng.random_range(0..Direction::ALL.len())])
    }
}
