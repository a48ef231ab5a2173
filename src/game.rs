use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

use crate::config::Config;
use crate::engine::{Cell, Engine, MoveOutcome, Phase};
use crate::input::{map_key, Command};
use crate::snake::{Direction, Position};
use crate::term::{Coords, TermInt, TermManager};
use crate::ticker::Ticker;

/// Each grid cell is two terminal columns wide so the board looks square.
const CELL_WIDTH: TermInt = 2;
/// How long to block on input while no tick is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';
const EMPTY_CHAR: char = ' ';

pub struct SnakeGame {
    engine: Engine,
    term: TermManager,
    ticker: Ticker,
    board_width: TermInt,
    board_height: TermInt,
}

impl SnakeGame {
    pub fn new(config: Config) -> Result<Self> {
        config.validate().context("invalid game configuration")?;

        let grid = config.grid_size as TermInt;
        let board_width = grid * CELL_WIDTH + 2;
        let board_height = grid + 2;
        // One extra row under the board for the score
        let (cols, rows) = TermManager::terminal_size().context("failed to read terminal size")?;
        if cols < board_width || rows < board_height + 1 {
            bail!(
                "terminal is {}x{}, the board needs at least {}x{}",
                cols,
                rows,
                board_width,
                board_height + 1
            );
        }

        let ticker = Ticker::new(config.tick_interval, Instant::now());
        let term = TermManager::new(board_width, board_height + 1);
        let engine = Engine::new(config)?;
        Ok(SnakeGame { engine, term, ticker, board_width, board_height })
    }

    pub fn run(&mut self) -> Result<()> {
        self.term.setup().context("failed to set up terminal")?;
        log::info!(
            "Starting a {n}x{n} game, tick {:?}",
            self.ticker.period(),
            n = self.engine.config().grid_size
        );

        if self.show_intro()? {
            self.redraw()?;
            self.ticker.restart(Instant::now());
            self.game_loop()?;
        }

        self.term.restore().context("failed to restore terminal")?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn game_loop(&mut self) -> Result<()> {
        loop {
            let timeout = match self.engine.state().phase() {
                Phase::Running => self.ticker.time_until_due(Instant::now()),
                _ => IDLE_POLL,
            };

            if let Some(key) = self.term.read_key_timeout(timeout).context("failed to read input")? {
                match map_key(key) {
                    Some(Command::Quit) => return Ok(()),
                    Some(cmd) => self.apply(cmd)?,
                    None => {}
                }
            }

            // Paused or finished games receive no ticks
            if self.engine.state().phase() == Phase::Running && self.ticker.due(Instant::now()) {
                let outcome = self.engine.step();
                self.paint(outcome)?;
            }
        }
    }

    /// Returns false if the player quit from the intro screen.
    fn show_intro(&mut self) -> Result<bool> {
        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "P, Space or Esc to pause",
            "Q or CTRL+C to quit",
            "",
            "Press any key to begin",
        ])?;

        loop {
            if let Some(key) = self.term.read_key_timeout(IDLE_POLL)? {
                let quit = map_key(key) == Some(Command::Quit);
                self.term.hide_message()?;
                return Ok(!quit);
            }
        }
    }

    fn apply(&mut self, cmd: Command) -> Result<()> {
        match cmd {
            Command::Turn(dir) => {
                self.engine.set_direction(dir);
            }
            Command::TogglePause => match self.engine.toggle_pause() {
                Phase::Paused => {
                    self.term.show_message(&["Paused", "Press P to resume", "or Q to quit"])?;
                }
                Phase::Running => {
                    self.term.hide_message()?;
                    self.ticker.restart(Instant::now());
                }
                Phase::GameOver => {}
            },
            Command::Restart => {
                if self.engine.restart_if_over() {
                    self.redraw()?;
                    self.ticker.restart(Instant::now());
                }
            }
            Command::Quit => {}
        }
        Ok(())
    }

    fn paint(&mut self, outcome: MoveOutcome) -> Result<()> {
        match outcome {
            MoveOutcome::Idle => return Ok(()),
            MoveOutcome::Moved { new_head, old_head, old_tail, ate } => {
                let head = head_char(self.engine.state().direction());
                self.print_cell(new_head, head)?;
                self.print_cell(old_head, SNAKE_BODY_CHAR)?;
                if let Some(tail) = old_tail {
                    self.print_cell(tail, EMPTY_CHAR)?;
                }
                if ate {
                    let food = self.engine.state().food();
                    self.print_cell(food, FOOD_CHAR)?;
                    self.print_score()?;
                }
            }
            MoveOutcome::Crashed => self.game_over(false)?,
            MoveOutcome::BoardFilled => self.game_over(true)?,
        }
        self.term.flush()?;
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        self.term.clear()?;
        self.term.draw_borders(self.board_width, self.board_height)?;

        let n = self.engine.config().grid_size;
        for y in 0..n {
            for x in 0..n {
                let pos = Position::new(x, y);
                let state = self.engine.state();
                let ch = match state.cell_at(pos) {
                    Cell::Head => head_char(state.direction()),
                    Cell::Body => SNAKE_BODY_CHAR,
                    Cell::Food => FOOD_CHAR,
                    Cell::Empty => continue,
                };
                self.print_cell(pos, ch)?;
            }
        }
        self.print_score()?;
        self.term.flush()?;
        Ok(())
    }

    fn game_over(&mut self, won: bool) -> Result<()> {
        let headline = if won { "You won!" } else { "Game over!" };

        if !won {
            let body = self.engine.state().snake().to_vec();
            for pos in body {
                self.print_cell(pos, DEAD_SNAKE_CHAR)?;
            }
        }
        self.print_score()?;

        let score = format!("Score: {}", self.engine.state().score());
        self.term.show_message(&[headline, &score, "", "Press R to play again,", "or Q to quit."])?;
        Ok(())
    }

    fn print_score(&mut self) -> Result<()> {
        let line = format!("Score: {:<8}", self.engine.state().score());
        self.term.print_str_at((0, self.board_height), &line)?;
        Ok(())
    }

    fn print_cell(&mut self, pos: Position, ch: char) -> Result<()> {
        let (x, y) = cell_coords(pos);
        for dx in 0..CELL_WIDTH {
            self.term.print_at((x + dx, y), ch)?;
        }
        Ok(())
    }
}

/// Terminal position of the left column of a grid cell, inside the border.
fn cell_coords(pos: Position) -> Coords {
    (1 + pos.x as TermInt * CELL_WIDTH, 1 + pos.y as TermInt)
}

fn head_char(dir: Direction) -> char {
    match dir {
        Direction::Up => '^',
        Direction::Down => 'v',
        Direction::Left => '<',
        Direction::Right => '>',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_coords_skip_border() {
        assert_eq!(cell_coords(Position::new(0, 0)), (1, 1));
        assert_eq!(cell_coords(Position::new(3, 2)), (7, 3));
    }

    #[test]
    fn test_head_char() {
        assert_eq!(head_char(Direction::Up), '^');
        assert_eq!(head_char(Direction::Left), '<');
    }
}
