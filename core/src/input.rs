use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::*;

bitflags! {
    /// Joypad button state, one bit per button.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Buttons: u16 {
        const UP    = 1;
        const DOWN  = 1 << 1;
        const LEFT  = 1 << 2;
        const RIGHT = 1 << 3;
        const A     = 1 << 4;
        const B     = 1 << 5;
        const C     = 1 << 6;
        const START = 1 << 7;
    }
}

/// Discrete commands understood by the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    Reset,
    ToggleDemo,
    /// Cosmetic, handled by the renderer.
    CyclePalette,
    /// Cosmetic, handled by the renderer.
    ToggleMascot,
}

impl Command {
    pub const fn is_cosmetic(self) -> bool {
        matches!(self, Self::CyclePalette | Self::ToggleMascot)
    }
}

/// Turns raw button state into commands, reacting only to newly pressed buttons.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Joypad {
    held: Buttons,
}

impl Joypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> Buttons {
        self.held
    }

    /// Forgets held buttons, for sources that only report presses.
    pub fn release(&mut self) {
        self.held = Buttons::empty();
    }

    /// Records the current button state and yields the commands for buttons
    /// pressed since the last update.
    ///
    /// Start, A, B and C come first. At most one direction follows: right wins
    /// over left, and a vertical press overrides either, up before down.
    pub fn update(&mut self, state: Buttons) -> impl Iterator<Item = Command> + use<> {
        let pressed = state & !self.held;
        self.held = state;

        let mut direction = None;
        if pressed.contains(Buttons::RIGHT) {
            direction = Some(Direction::Right);
        } else if pressed.contains(Buttons::LEFT) {
            direction = Some(Direction::Left);
        }
        if pressed.contains(Buttons::UP) {
            direction = Some(Direction::Up);
        } else if pressed.contains(Buttons::DOWN) {
            direction = Some(Direction::Down);
        }

        [
            pressed.contains(Buttons::START).then_some(Command::Reset),
            pressed.contains(Buttons::A).then_some(Command::ToggleDemo),
            pressed.contains(Buttons::B).then_some(Command::ToggleMascot),
            pressed.contains(Buttons::C).then_some(Command::CyclePalette),
            direction.map(Command::Move),
        ]
        .into_iter()
        .flatten()
    }
}
