use std::io::{self, Write};
use std::panic;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::{cursor, execute, terminal};
use genesis_2048_core::*;
use serde::Serialize;
use web_time::Instant;

use crate::keys;
use crate::render::{self, Renderer};

/// Logical ticks paced by wall-clock time instead of counted frames.
#[derive(Clone, Debug)]
pub struct IntervalTicker {
    interval: Duration,
    next: Instant,
}

impl IntervalTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: Instant::now() + interval,
        }
    }

    /// Interval matching `config.frames_per_step` frames at `fps`.
    pub fn for_config(config: &GameConfig, fps: u16) -> Self {
        let frame = Duration::from_secs(1) / u32::from(fps.max(1));
        Self::new(frame * u32::from(config.frames_per_step))
    }
}

impl TickSource for IntervalTicker {
    fn poll(&mut self) -> bool {
        let now = Instant::now();
        if now < self.next {
            return false;
        }
        self.next = now + self.interval;
        true
    }
}

/// Result of a headless demo run.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub seed: u64,
    pub frames: u64,
    pub moves: u64,
    pub snapshot: Snapshot,
}

impl Report {
    /// How the run ended, for the text report.
    pub fn result(&self) -> &'static str {
        match (self.snapshot.state.is_game_over(), self.snapshot.won) {
            (false, _) => "stopped",
            (true, true) => "won",
            (true, false) => "lost",
        }
    }
}

/// Plays demo mode frame by frame until game over or `max_frames`.
pub fn simulate(config: GameConfig, seed: u64, max_frames: u64) -> Result<Report> {
    let mut game = Game::new(config, seed)?;
    game.input(Command::ToggleDemo);

    let mut frames = 0;
    let mut moves = 0;
    while frames < max_frames && !game.state().is_game_over() {
        let outcome = game.frame();
        frames += 1;
        if matches!(outcome.autoplay, Some(InputOutcome::Started(_))) {
            moves += 1;
        }
        if let Some(settlement) = outcome.tick.and_then(TickOutcome::settlement) {
            log::trace!("Frame {}: {:?}", frames, settlement);
        }
    }

    if !game.state().is_game_over() {
        log::warn!("Stopped after {} frames without reaching game over", frames);
    }
    log::info!(
        "Played {} moves in {} frames, highest tile {}",
        moves,
        frames,
        level_value(game.board().highest_level())
    );

    Ok(Report {
        seed,
        frames,
        moves,
        snapshot: game.snapshot(),
    })
}

pub fn run_headless(config: GameConfig, seed: u64, max_frames: u64, json: bool) -> Result<()> {
    let report = simulate(config, seed, max_frames)?;

    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render::plain(&report.snapshot))?;
        writeln!(
            out,
            "seed {}  moves {}  frames {}  {}",
            report.seed,
            report.moves,
            report.frames,
            report.result()
        )?;
    }
    Ok(())
}

pub fn run_interactive(config: GameConfig, seed: u64, fps: u16, demo: bool) -> Result<()> {
    let mut game = Game::with_ticker(config, seed, IntervalTicker::for_config(&config, fps))?;
    if demo {
        game.input(Command::ToggleDemo);
    }

    let mut out = io::stdout();
    let _guard = TerminalGuard::enter(&mut out)?;
    play(&mut out, &mut game, fps)
}

/// Raw mode and the alternate screen, restored on drop and on panic.
struct TerminalGuard;

impl TerminalGuard {
    fn enter(out: &mut impl Write) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // from here on, dropping the guard undoes raw mode even if the next call fails
        let guard = Self;
        let hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            Self::restore();
            hook(info);
        }));
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(guard)
    }

    fn restore() {
        let restored = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show)
            .and_then(|()| terminal::disable_raw_mode());
        if let Err(err) = restored {
            log::warn!("Failed to restore terminal: {}", err);
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        Self::restore();
    }
}

fn play<T: TickSource>(out: &mut impl Write, game: &mut Game<T>, fps: u16) -> Result<()> {
    let frame_duration = Duration::from_secs(1) / u32::from(fps.max(1));
    let mut joypad = Joypad::new();
    let mut renderer = Renderer::default();

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if keys::is_quit(key.code) {
                return Ok(());
            }
            let Some(buttons) = keys::buttons_for(key.code) else {
                continue;
            };
            for command in joypad.update(buttons) {
                if let InputOutcome::Cosmetic(command) = game.input(command) {
                    renderer.apply(command);
                }
            }
            // terminals report presses only
            joypad.release();
        }

        let outcome = game.frame();
        if let Some(settlement) = outcome.tick.and_then(TickOutcome::settlement) {
            if settlement.game_over {
                log::info!("Game over, highest tile {}", game.snapshot().highest_value());
            }
        }

        renderer.draw(out, &game.snapshot())?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    }
}
