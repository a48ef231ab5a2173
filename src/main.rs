use anyhow::Result;

use gridsnake::config::Config;
use gridsnake::game::SnakeGame;
use gridsnake::logging;

fn main() -> Result<()> {
    logging::setup(cfg!(debug_assertions))?;

    let mut game = SnakeGame::new(Config::default())?;
    // Quitting leaves run(), the terminal is handed back either way
    game.run()
}
