//! Grid snake: a tick-driven snake engine and a terminal front end for it.

pub mod config;
pub mod engine;
pub mod game;
pub mod input;
pub mod logging;
pub mod snake;
pub mod term;
pub mod ticker;

pub use config::Config;
pub use engine::{Cell, Engine, GameState, MoveOutcome, Phase};
pub use snake::{Direction, Position, Snake};
