use std::io::{self, Write};

use crossterm::style::{self, Color};
use crossterm::{cursor, queue, terminal};
use genesis_2048_core::*;

const CELL_WIDTH: usize = 6;

/// Font colors per tier, dim to bright.
const PALETTES: [[Color; 4]; 3] = [
    [
        Color::Rgb { r: 0x00, g: 0x66, b: 0x00 },
        Color::Rgb { r: 0x00, g: 0x99, b: 0x00 },
        Color::Rgb { r: 0x00, g: 0xCC, b: 0x00 },
        Color::Rgb { r: 0x00, g: 0xFF, b: 0x00 },
    ],
    [
        Color::Rgb { r: 0x66, g: 0x44, b: 0x00 },
        Color::Rgb { r: 0x99, g: 0x66, b: 0x00 },
        Color::Rgb { r: 0xCC, g: 0x88, b: 0x00 },
        Color::Rgb { r: 0xFF, g: 0xAA, b: 0x00 },
    ],
    [
        Color::Rgb { r: 0x22, g: 0x44, b: 0x88 },
        Color::Rgb { r: 0x33, g: 0x66, b: 0xAA },
        Color::Rgb { r: 0x44, g: 0x88, b: 0xDD },
        Color::Rgb { r: 0x66, g: 0xAA, b: 0xFF },
    ],
];

/// Color tier of a level: 2..8, 16..64, 128..512, then 1024 and up.
pub const fn tier(level: Level) -> usize {
    match level {
        0..=3 => 0,
        4..=6 => 1,
        7..=9 => 2,
        _ => 3,
    }
}

/// Pose of the mascot for the current state.
pub fn pose(snapshot: &Snapshot) -> &'static str {
    match snapshot.state {
        MoveState::GameOver if snapshot.won => "running",
        MoveState::GameOver => "braking",
        MoveState::Moving(Direction::Up) => "looking up",
        MoveState::Moving(Direction::Down) => "crouching",
        MoveState::Moving(Direction::Left) => "walking left",
        MoveState::Moving(Direction::Right) => "walking right",
        MoveState::Idle if snapshot.won => "running",
        MoveState::Idle => "waiting",
    }
}

/// Cosmetic renderer state, changed only by cosmetic commands.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    palette: usize,
    mascot: bool,
    /// Board size of the previous frame, `None` until the first draw.
    drawn_size: Option<Coord2>,
}

impl Renderer {
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::CyclePalette => self.palette = (self.palette + 1) % PALETTES.len(),
            Command::ToggleMascot => {
                self.mascot = !self.mascot;
                // the mascot line disappears, so the next frame starts clean
                self.drawn_size = None;
            }
            _ => {}
        }
    }

    /// Redraws the frame in place, clearing the screen only when the layout changed.
    pub fn draw(&mut self, out: &mut impl Write, snapshot: &Snapshot) -> io::Result<()> {
        if self.drawn_size != Some(snapshot.size) {
            queue!(out, terminal::Clear(terminal::ClearType::All))?;
            self.drawn_size = Some(snapshot.size);
        }
        queue!(out, cursor::MoveTo(0, 0))?;

        let (rows, cols) = snapshot.size;
        for row in 0..rows {
            for col in 0..cols {
                let level = snapshot.level_at((row, col));
                if level == 0 {
                    queue!(out, style::Print(format!("{:>CELL_WIDTH$}", "")))?;
                    continue;
                }
                queue!(
                    out,
                    style::SetForegroundColor(PALETTES[self.palette][tier(level)]),
                    style::Print(format!("{:>CELL_WIDTH$}", level_value(level))),
                )?;
            }
            queue!(out, style::ResetColor, style::Print("\r\n"))?;
        }

        queue!(out, style::Print("\r\n"))?;
        if snapshot.state.is_game_over() {
            queue!(out, style::Print("GAME OVER!  "))?;
        }
        if snapshot.won {
            queue!(out, style::Print("YOU WIN!"))?;
        }
        queue!(
            out,
            terminal::Clear(terminal::ClearType::UntilNewLine),
            style::Print("\r\n")
        )?;

        if self.mascot {
            queue!(
                out,
                style::Print(format!("mascot: {}", pose(snapshot))),
                terminal::Clear(terminal::ClearType::UntilNewLine),
                style::Print("\r\n")
            )?;
        }
        queue!(
            out,
            style::Print(format!(
                "demo {}  |  arrows/hjkl move  r reset  a demo  b mascot  c colors  q quit\r\n",
                if snapshot.demo { "on " } else { "off" }
            ))
        )?;

        out.flush()
    }
}

/// Uncolored board, one line per row.
pub fn plain(snapshot: &Snapshot) -> String {
    let mut text = String::new();
    let (rows, cols) = snapshot.size;
    for row in 0..rows {
        for col in 0..cols {
            let cell = match snapshot.value_at((row, col)) {
                0 => format!("{:>CELL_WIDTH$}", "."),
                value => format!("{value:>CELL_WIDTH$}"),
            };
            text.push_str(&cell);
        }
        text.push('\n');
    }
    text
}
