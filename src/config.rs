use std::time::Duration;

use anyhow::{bail, Result};

use crate::snake::{Direction, Position};

pub const GRID_SIZE: i32 = 20;
pub const FOOD_REWARD: u32 = 10;
pub const TICK_INTERVAL_MS: u64 = 150;

/// Tunables for a game. `Default` gives the classic 20x20 board.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub grid_size: i32,
    pub origin: Position,
    pub initial_direction: Direction,
    pub food_reward: u32,
    pub tick_interval: Duration,
    /// Seed for food placement. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid_size: GRID_SIZE,
            origin: Position::new(GRID_SIZE / 2, GRID_SIZE / 2),
            initial_direction: Direction::Right,
            food_reward: FOOD_REWARD,
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            seed: None,
        }
    }
}

impl Config {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size < 2 {
            bail!("grid size must be at least 2, got {}", self.grid_size);
        }
        if !self.origin.in_bounds(self.grid_size) {
            bail!(
                "origin ({}, {}) lies outside the {n}x{n} grid",
                self.origin.x,
                self.origin.y,
                n = self.grid_size
            );
        }
        if self.tick_interval.is_zero() {
            bail!("tick interval must be non-zero");
        }
        Ok(())
    }
}
