use anyhow::{ensure, Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::snake::{Direction, Position, Snake};
use MoveOutcome::*;

/// Rejected draws tolerated before food placement falls back to the free-cell list.
const MAX_FOOD_REJECTIONS: usize = 64;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    GameOver,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Head,
    Body,
    Food,
}

/// What a single `step()` did, so the view only repaints what changed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Not running, nothing happened.
    Idle,
    Moved { new_head: Position, old_head: Position, old_tail: Option<Position>, ate: bool },
    Crashed,
    /// The snake ate the last free cell's food and now covers the board.
    BoardFilled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    snake: Snake,
    food: Position,
    direction: Direction,
    score: u32,
    phase: Phase,
    won: bool,
}

impl GameState {
    /// A running game with a score of zero. `Engine::from_state` checks it
    /// against the board before play starts.
    pub fn new(snake: Snake, food: Position, direction: Direction) -> Self {
        GameState { snake, food, direction, score: 0, phase: Phase::Running, won: false }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True once the snake has filled the whole board.
    pub fn won(&self) -> bool {
        self.won
    }

    /// Every segment on the board and distinct, food on a free cell.
    pub fn check(&self, grid_size: i32) -> Result<()> {
        let segments = self.snake.to_vec();
        for (i, pos) in segments.iter().enumerate() {
            ensure!(pos.in_bounds(grid_size), "segment ({}, {}) lies off the board", pos.x, pos.y);
            ensure!(!segments[i + 1..].contains(pos), "segment ({}, {}) appears twice", pos.x, pos.y);
        }
        ensure!(self.food.in_bounds(grid_size), "food ({}, {}) lies off the board", self.food.x, self.food.y);
        ensure!(!self.snake.contains(&self.food), "food ({}, {}) lies on the snake", self.food.x, self.food.y);
        Ok(())
    }

    pub fn cell_at(&self, pos: Position) -> Cell {
        if self.snake.head() == pos {
            Cell::Head
        } else if self.snake.contains(&pos) {
            Cell::Body
        } else if self.food == pos {
            Cell::Food
        } else {
            Cell::Empty
        }
    }
}

pub struct Engine<R = StdRng> {
    config: Config,
    state: GameState,
    pending: Direction,
    rng: R,
}

impl Engine<StdRng> {
    pub fn new(config: Config) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Engine::with_rng(config, rng)
    }
}

impl<R: Rng> Engine<R> {
    pub fn with_rng(config: Config, mut rng: R) -> Result<Self> {
        config.validate().context("invalid game configuration")?;
        let state = initial_state(&config, &mut rng).context("no free cell for the first food")?;
        let pending = state.direction;
        Ok(Engine { config, state, pending, rng })
    }

    /// Resumes from an arbitrary state, e.g. a position set up by hand.
    pub fn from_state(config: Config, state: GameState, rng: R) -> Result<Self> {
        config.validate().context("invalid game configuration")?;
        state.check(config.grid_size).context("invalid starting state")?;
        let pending = state.direction;
        Ok(Engine { config, state, pending, rng })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    /// Advances the game one tick. Does nothing unless running.
    pub fn step(&mut self) -> MoveOutcome {
        if self.state.phase != Phase::Running {
            return Idle;
        }

        let old_head = self.state.snake.head();
        let new_head = old_head + self.pending;

        // Checked against every current segment, the tail included
        if !new_head.in_bounds(self.config.grid_size) || self.state.snake.contains(&new_head) {
            self.state.phase = Phase::GameOver;
            log::info!(
                "Game over at ({}, {}), score {}",
                new_head.x,
                new_head.y,
                self.state.score
            );
            return Crashed;
        }

        self.state.snake.push_head(new_head);
        self.state.direction = self.pending;

        if new_head != self.state.food {
            let old_tail = self.state.snake.pop_tail();
            return Moved { new_head, old_head, old_tail, ate: false };
        }

        self.state.score += self.config.food_reward;
        log::debug!("Food eaten, score {}, length {}", self.state.score, self.state.snake.len());

        match self.generate_food() {
            Some(food) => {
                self.state.food = food;
                Moved { new_head, old_head, old_tail: None, ate: true }
            }
            None => {
                self.state.phase = Phase::GameOver;
                self.state.won = true;
                log::info!("Board filled, score {}", self.state.score);
                BoardFilled
            }
        }
    }

    /// Buffers `dir` for the next tick unless it reverses the committed
    /// direction. Accepted in every phase. Returns whether it was taken.
    pub fn set_direction(&mut self, dir: Direction) -> bool {
        if dir == self.state.direction.opposite() {
            log::trace!("Ignoring reversal {:?} while heading {:?}", dir, self.state.direction);
            return false;
        }
        self.pending = dir;
        true
    }

    pub fn toggle_pause(&mut self) -> Phase {
        self.state.phase = match self.state.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            Phase::GameOver => Phase::GameOver,
        };
        log::debug!("Phase is now {:?}", self.state.phase);
        self.state.phase
    }

    /// Starts over from the configured origin, whatever the phase.
    pub fn reset(&mut self) {
        match initial_state(&self.config, &mut self.rng) {
            Some(state) => {
                self.state = state;
                self.pending = self.state.direction;
                log::info!("New game");
            }
            None => log::error!("No free cell for food, keeping the current game"),
        }
    }

    /// Resets only a finished game. Returns whether a new game started.
    pub fn restart_if_over(&mut self) -> bool {
        if self.state.phase != Phase::GameOver {
            return false;
        }
        self.reset();
        true
    }

    /// Draws a cell not covered by the snake, or `None` when the snake covers the board.
    pub fn generate_food(&mut self) -> Option<Position> {
        place_food(&mut self.rng, &self.state.snake, self.config.grid_size)
    }
}

fn initial_state<R: Rng>(config: &Config, rng: &mut R) -> Option<GameState> {
    let snake = Snake::new(config.origin);
    let food = place_food(rng, &snake, config.grid_size)?;
    Some(GameState::new(snake, food, config.initial_direction))
}

/// Rejection sampling over the whole board, falling back to a uniform pick
/// among the free cells once the board is crowded enough to keep missing.
pub fn place_food<R: Rng>(rng: &mut R, snake: &Snake, grid_size: i32) -> Option<Position> {
    if grid_size <= 0 {
        return None;
    }

    for _ in 0..MAX_FOOD_REJECTIONS {
        let candidate = Position::new(rng.gen_range(0..grid_size), rng.gen_range(0..grid_size));
        if !snake.contains(&candidate) {
            return Some(candidate);
        }
    }

    let free: Vec<Position> = (0..grid_size)
        .flat_map(|y| (0..grid_size).map(move |x| Position::new(x, y)))
        .filter(|pos| !snake.contains(pos))
        .collect();
    free.choose(rng).copied()
}
