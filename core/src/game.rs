use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Idle -> Moving (directional input)
/// - Moving -> Idle (a pass changed nothing)
/// - Idle -> GameOver (settled board is lost, or won when a win ends the game)
/// - any -> Idle (reset)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveState {
    /// Waiting for input, the only state accepting a direction
    Idle,
    /// One pass per logical tick until the board stops changing
    Moving(Direction),
    /// Terminal until reset
    GameOver,
}

impl MoveState {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_moving(self) -> bool {
        matches!(self, Self::Moving(_))
    }

    pub const fn is_game_over(self) -> bool {
        matches!(self, Self::GameOver)
    }

    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Moving(direction) => Some(direction),
            _ => None,
        }
    }
}

impl Default for MoveState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Outcome of feeding a command to the game
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// Direction arrived while the board was not idle
    Ignored,
    Started(Direction),
    Reset,
    DemoToggled(bool),
    /// Accepted but left for the renderer
    Cosmetic(Command),
}

impl InputOutcome {
    /// Whether this outcome could have changed game state
    pub const fn has_update(self) -> bool {
        use InputOutcome::*;
        match self {
            Ignored => false,
            Started(_) => true,
            Reset => true,
            DemoToggled(_) => true,
            Cosmetic(_) => false,
        }
    }
}

/// What happened when a move came to rest.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub spawned: Option<Coord2>,
    /// The board holds a winning tile.
    pub won: bool,
    pub game_over: bool,
}

/// Outcome of one logical tick
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Idle or game over, nothing to do
    Waiting,
    /// A pass changed the board, the move goes on
    Moved(PassOutcome),
    /// A pass changed nothing, the move is over
    Settled(Settlement),
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Waiting)
    }

    pub const fn settlement(self) -> Option<Settlement> {
        match self {
            Self::Settled(settlement) => Some(settlement),
            _ => None,
        }
    }
}

/// Outcome of one display frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Move injected by demo mode.
    pub autoplay: Option<InputOutcome>,
    /// Set when this frame was a logical tick.
    pub tick: Option<TickOutcome>,
}

/// A game session: the board, its move state and the randomness feeding it.
#[derive(Clone, Debug)]
pub struct Game<T = FrameDivider> {
    config: GameConfig,
    board: Board,
    state: MoveState,
    rng: SmallRng,
    ticker: T,
    autoplay: AutoPlayer,
    demo: bool,
    won: bool,
    last_motions: Vec<TileMotion>,
}

impl Game<FrameDivider> {
    /// Starts a session ticking every `config.frames_per_step` frames.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_ticker(config, seed, FrameDivider::new(config.frames_per_step))
    }
}

impl<T: TickSource> Game<T> {
    pub fn with_ticker(config: GameConfig, seed: u64, ticker: T) -> Result<Self> {
        config.validate()?;
        let mut game = Self {
            config,
            board: Board::new(config.size)?,
            state: MoveState::Idle,
            rng: SmallRng::seed_from_u64(seed),
            ticker,
            autoplay: AutoPlayer::new(config.demo_delay),
            demo: false,
            won: false,
            last_motions: Vec::new(),
        };
        game.reset();
        Ok(game)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> MoveState {
        self.state
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    /// Whether the last settle saw a winning tile.
    pub fn has_won(&self) -> bool {
        self.won
    }

    /// Steps of the latest pass, for renderers animating tiles.
    pub fn last_motions(&self) -> &[TileMotion] {
        &self.last_motions
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_game(self)
    }

    /// Empties the board, returns to idle and spawns the first tile.
    pub fn reset(&mut self) {
        self.board.clear();
        self.state = MoveState::Idle;
        self.won = false;
        self.last_motions.clear();
        self.autoplay.reset();
        let spawned = self.spawn_random_tile();
        log::debug!("Board reset, first tile at {:?}", spawned);
    }

    /// Spawns a level 1 or 2 tile, only while idle and with room on the board.
    pub fn spawn_random_tile(&mut self) -> Option<Coord2> {
        if !self.state.is_idle() {
            return None;
        }

        match self.board.spawn_random_tile(&mut self.rng) {
            Ok(coords) => {
                log::trace!("Spawned level {} at {:?}", self.board[coords], coords);
                Some(coords)
            }
            Err(err) => {
                log::debug!("Skipping spawn: {}", err);
                None
            }
        }
    }

    pub fn input(&mut self, command: Command) -> InputOutcome {
        match command {
            Command::Reset => {
                self.reset();
                InputOutcome::Reset
            }
            Command::ToggleDemo => {
                self.demo = !self.demo;
                self.autoplay.reset();
                log::debug!("Demo mode {}", if self.demo { "on" } else { "off" });
                InputOutcome::DemoToggled(self.demo)
            }
            Command::Move(direction) if self.state.is_idle() => {
                self.state = MoveState::Moving(direction);
                InputOutcome::Started(direction)
            }
            Command::Move(_) => InputOutcome::Ignored,
            cosmetic => InputOutcome::Cosmetic(cosmetic),
        }
    }

    /// Runs one logical tick: one engine pass while moving, settling when it
    /// changes nothing.
    pub fn step(&mut self) -> TickOutcome {
        let MoveState::Moving(direction) = self.state else {
            return TickOutcome::Waiting;
        };

        self.last_motions.clear();
        let pass = apply_direction_traced(&mut self.board, direction, &mut self.last_motions);
        if pass.changed() {
            return TickOutcome::Moved(pass);
        }

        self.state = MoveState::Idle;
        TickOutcome::Settled(self.settle())
    }

    /// Runs one display frame: demo input first, then a logical tick if due.
    pub fn frame(&mut self) -> FrameOutcome {
        let autoplay = if self.demo {
            self.autoplay
                .poll(self.state.is_idle(), &mut self.rng)
                .map(|direction| self.input(Command::Move(direction)))
        } else {
            None
        };

        let tick = self.ticker.poll().then(|| self.step());

        FrameOutcome { autoplay, tick }
    }

    fn settle(&mut self) -> Settlement {
        let spawned = if self.board.is_full() {
            None
        } else {
            self.spawn_random_tile()
        };

        let won = self.board.contains_winning_tile(self.config.win_level);
        if won {
            log::debug!("Winning tile on the board");
        }

        let stuck = match self.config.game_over_rule {
            GameOverRule::BoardFull => self.board.is_full(),
            GameOverRule::NoMovesLeft => !self.board.has_legal_move(),
        };
        let game_over = stuck || (won && self.config.win_ends_game);
        if game_over {
            log::debug!("Game over, highest level {}", self.board.highest_level());
            self.state = MoveState::GameOver;
        }

        self.won = won;
        Settlement {
            spawned,
            won,
            game_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(size: Coord2) -> Game {
        Game::new(GameConfig::new(size, 1), 7).unwrap()
    }

    /// Replaces the board contents while keeping the session.
    fn load(game: &mut Game, levels: &[Level]) {
        game.board = Board::from_levels(game.config.size, levels).unwrap();
    }

    fn run_move(game: &mut Game, direction: Direction) -> Settlement {
        assert_eq!(game.input(Command::Move(direction)), InputOutcome::Started(direction));
        loop {
            if let TickOutcome::Settled(settlement) = game.step() {
                return settlement;
            }
        }
    }

    #[test]
    fn new_game_has_one_tile_and_is_idle() {
        let game = game((16, 8));

        assert_eq!(game.state(), MoveState::Idle);
        assert_eq!(game.board().empty_count(), 127);
        assert!(matches!(game.board().highest_level(), 1 | 2));
    }

    #[test]
    fn rejects_invalid_config() {
        let config = GameConfig::new_unchecked((0, 4), 1);

        assert!(matches!(Game::new(config, 0), Err(GameError::InvalidSize)));
    }

    #[test]
    fn reset_leaves_exactly_one_small_tile() {
        let mut game = game((4, 4));
        load(&mut game, &[3; 16]);
        game.state = MoveState::GameOver;

        assert_eq!(game.input(Command::Reset), InputOutcome::Reset);

        assert_eq!(game.state(), MoveState::Idle);
        let tiles: Vec<_> = game.board().iter_cells().filter(|&(_, l)| l != 0).collect();
        assert_eq!(tiles.len(), 1);
        assert!(matches!(tiles[0].1, 1 | 2));
    }

    #[test]
    fn reset_is_accepted_mid_move() {
        let mut game = game((1, 4));
        load(&mut game, &[0, 0, 0, 1]);
        game.input(Command::Move(Direction::Left));
        game.step();

        game.input(Command::Reset);

        assert_eq!(game.state(), MoveState::Idle);
        assert_eq!(game.board().empty_count(), 3);
    }

    #[test]
    fn direction_is_ignored_while_moving() {
        let mut game = game((1, 4));
        load(&mut game, &[0, 0, 0, 1]);
        game.input(Command::Move(Direction::Left));
        let before = game.board().clone();

        assert_eq!(game.input(Command::Move(Direction::Right)), InputOutcome::Ignored);

        assert_eq!(game.state(), MoveState::Moving(Direction::Left));
        assert_eq!(game.board(), &before);
    }

    #[test]
    fn direction_is_ignored_after_game_over() {
        let mut game = game((2, 2));
        game.state = MoveState::GameOver;

        assert_eq!(game.input(Command::Move(Direction::Up)), InputOutcome::Ignored);
        assert_eq!(game.step(), TickOutcome::Waiting);
        assert_eq!(game.state(), MoveState::GameOver);
    }

    #[test]
    fn spawn_is_a_no_op_unless_idle() {
        let mut game = game((2, 2));
        load(&mut game, &[0, 0, 0, 1]);
        game.input(Command::Move(Direction::Up));

        assert_eq!(game.spawn_random_tile(), None);
        assert_eq!(game.board().empty_count(), 3);
    }

    #[test]
    fn move_runs_one_pass_per_tick_then_settles_and_spawns() {
        let mut game = game((1, 4));
        load(&mut game, &[0, 0, 0, 1]);
        game.input(Command::Move(Direction::Left));

        assert_eq!(game.step(), TickOutcome::Moved(PassOutcome::Slid));
        assert_eq!(game.board().to_levels(), [0, 0, 1, 0]);
        assert_eq!(game.last_motions().len(), 1);
        assert_eq!(game.step(), TickOutcome::Moved(PassOutcome::Slid));
        assert_eq!(game.step(), TickOutcome::Moved(PassOutcome::Slid));
        assert_eq!(game.board()[(0, 0)], 1);

        let settlement = game.step().settlement().unwrap();

        assert_eq!(game.state(), MoveState::Idle);
        let spawned = settlement.spawned.unwrap();
        assert_ne!(spawned, (0, 0));
        assert!(matches!(game.board()[spawned], 1 | 2));
        assert!(!settlement.won);
        assert!(!settlement.game_over);
    }

    #[test]
    fn blocked_move_still_spawns() {
        let mut game = game((1, 4));
        load(&mut game, &[1, 0, 0, 0]);

        let settlement = run_move(&mut game, Direction::Left);

        assert!(settlement.spawned.is_some());
        assert_eq!(game.board().empty_count(), 2);
    }

    #[test]
    fn move_cascades_merges() {
        let mut game = game((1, 4));
        load(&mut game, &[2, 1, 1, 0]);

        run_move(&mut game, Direction::Left);

        assert_eq!(game.board()[(0, 0)], 3);
        assert_eq!(game.board().empty_count(), 2);
    }

    #[test]
    fn winning_tile_is_reported_on_every_settle() {
        let mut game = game((3, 3));
        load(&mut game, &[WIN_LEVEL, 0, 0, 0, 0, 0, 0, 0, 0]);

        for direction in [Direction::Down, Direction::Right, Direction::Up] {
            let settlement = run_move(&mut game, direction);
            assert!(settlement.won);
            assert!(!settlement.game_over);
            assert!(game.has_won());
            assert_eq!(game.state(), MoveState::Idle);
        }
    }

    #[test]
    fn win_ends_game_when_configured() {
        let mut game = Game::new(Variant::SmoothSprite.config(), 3).unwrap();
        let mut levels = [0; 49];
        levels[0] = WIN_LEVEL - 1;
        levels[1] = WIN_LEVEL - 1;
        load(&mut game, &levels);

        let settlement = run_move(&mut game, Direction::Left);

        assert!(settlement.won);
        assert!(settlement.game_over);
        assert_eq!(game.state(), MoveState::GameOver);
    }

    #[test]
    fn full_board_is_game_over_even_with_merges_left() {
        let mut game = game((2, 2));
        load(&mut game, &[1, 1, 2, 3]);

        let settlement = run_move(&mut game, Direction::Up);

        assert_eq!(settlement.spawned, None);
        assert!(settlement.game_over);
        assert_eq!(game.state(), MoveState::GameOver);
    }

    #[test]
    fn spawn_filling_the_last_cell_ends_the_game() {
        let mut game = game((2, 2));
        load(&mut game, &[1, 2, 3, 0]);

        let settlement = run_move(&mut game, Direction::Up);

        assert_eq!(settlement.spawned, Some((1, 1)));
        assert!(settlement.game_over);
    }

    #[test]
    fn strict_rule_keeps_playing_while_merges_remain() {
        let mut config = GameConfig::new((2, 2), 1);
        config.game_over_rule = GameOverRule::NoMovesLeft;
        let mut game = Game::new(config, 5).unwrap();
        load(&mut game, &[1, 1, 2, 3]);

        let settlement = run_move(&mut game, Direction::Up);
        assert!(!settlement.game_over);
        assert_eq!(game.state(), MoveState::Idle);

        load(&mut game, &[1, 2, 3, 4]);
        let settlement = run_move(&mut game, Direction::Up);
        assert!(settlement.game_over);
    }

    #[test]
    fn frames_are_throttled_to_logical_ticks() {
        let mut game = Game::new(GameConfig::new((1, 4), 4), 1).unwrap();
        load(&mut game, &[0, 0, 0, 1]);
        game.input(Command::Move(Direction::Left));

        for _ in 0..3 {
            assert_eq!(game.frame().tick, None);
        }
        assert_eq!(
            game.frame().tick,
            Some(TickOutcome::Moved(PassOutcome::Slid))
        );
        assert_eq!(game.board().to_levels(), [0, 0, 1, 0]);
    }

    #[test]
    fn demo_mode_moves_after_idle_delay() {
        let mut config = GameConfig::new((4, 4), 1);
        config.demo_delay = 3;
        let mut game = Game::with_ticker(config, 9, EveryFrame).unwrap();

        assert_eq!(game.input(Command::ToggleDemo), InputOutcome::DemoToggled(true));
        assert_eq!(game.frame().autoplay, None);
        assert_eq!(game.frame().autoplay, None);

        let frame = game.frame();
        assert!(matches!(frame.autoplay, Some(InputOutcome::Started(_))));
        assert!(frame.tick.is_some());
    }

    #[test]
    fn demo_mode_plays_until_game_over() {
        let mut config = GameConfig::new((3, 3), 1);
        config.demo_delay = 1;
        let mut game = Game::with_ticker(config, 42, EveryFrame).unwrap();
        game.input(Command::ToggleDemo);

        for _ in 0..100_000 {
            game.frame();
            if game.state().is_game_over() {
                break;
            }
        }

        assert!(game.state().is_game_over());
        assert!(game.board().is_full());
    }

    #[test]
    fn cosmetic_commands_leave_state_alone() {
        let mut game = game((2, 2));
        let before = game.board().clone();

        let outcome = game.input(Command::CyclePalette);

        assert_eq!(outcome, InputOutcome::Cosmetic(Command::CyclePalette));
        assert!(!outcome.has_update());
        assert_eq!(game.board(), &before);
        assert_eq!(game.state(), MoveState::Idle);
    }

    #[test]
    fn same_seed_replays_the_same_game() {
        let play = |seed| {
            let mut game = game_with_seed(seed);
            for direction in [Direction::Left, Direction::Down, Direction::Right] {
                run_move(&mut game, direction);
            }
            game.board().to_levels()
        };

        assert_eq!(play(11), play(11));
    }

    fn game_with_seed(seed: u64) -> Game {
        Game::new(GameConfig::new((4, 4), 1), seed).unwrap()
    }
}
