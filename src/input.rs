//! Key mapping from terminal events to game commands.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::snake::Direction;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    TogglePause,
    Restart,
    Quit,
}

/// Arrow keys or WASD turn, P/Space/Esc pause, R/Enter restart, Q or Ctrl+C quit.
pub fn map_key(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if is_ctrl_c(&key) {
        return Some(Command::Quit);
    }

    match key.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Command::Turn(Direction::Up)),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Command::Turn(Direction::Left)),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Command::Turn(Direction::Down)),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Command::Turn(Direction::Right)),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') | KeyCode::Esc => Some(Command::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => Some(Command::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        _ => None,
    }
}

pub fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn test_arrows_and_wasd() {
        assert_eq!(map_key(press(KeyCode::Up)), Some(Command::Turn(Direction::Up)));
        assert_eq!(map_key(press(KeyCode::Char('a'))), Some(Command::Turn(Direction::Left)));
        assert_eq!(map_key(press(KeyCode::Char('S'))), Some(Command::Turn(Direction::Down)));
        assert_eq!(map_key(press(KeyCode::Right)), Some(Command::Turn(Direction::Right)));
    }

    #[test]
    fn test_pause_restart_quit() {
        assert_eq!(map_key(press(KeyCode::Esc)), Some(Command::TogglePause));
        assert_eq!(map_key(press(KeyCode::Char(' '))), Some(Command::TogglePause));
        assert_eq!(map_key(press(KeyCode::Enter)), Some(Command::Restart));
        assert_eq!(map_key(press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(Command::Quit));
    }

    #[test]
    fn test_plain_c_is_ignored() {
        assert_eq!(map_key(press(KeyCode::Char('c'))), None);
        assert_eq!(map_key(press(KeyCode::Tab)), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Up,
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(map_key(release), None);
    }
}
