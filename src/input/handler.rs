use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction};
use crate::modes::Screen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    GameCommand(Command),
    Start,
    Restart,
    None,
}

/// Decodes key presses into abstract commands for the current screen
pub struct InputHandler;

const QUIT: KeyAction = KeyAction::GameCommand(Command::Quit);

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent, screen: Screen) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return QUIT;
        }

        match screen {
            Screen::Menu => Self::menu_key(key.code),
            Screen::Playing => Self::playing_key(key.code),
            Screen::Paused => match key.code {
                KeyCode::Char('p') | KeyCode::Char('P') => {
                    KeyAction::GameCommand(Command::TogglePause)
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => QUIT,
                _ => KeyAction::None,
            },
            Screen::GameOver => match key.code {
                KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => QUIT,
                _ => KeyAction::None,
            },
        }
    }

    fn menu_key(code: KeyCode) -> KeyAction {
        match code {
            KeyCode::Enter => KeyAction::Start,
            KeyCode::Char('m') | KeyCode::Char('M') => KeyAction::GameCommand(Command::ToggleMusic),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::GameCommand(Command::ToggleSfx),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => QUIT,
            _ => KeyAction::None,
        }
    }

    fn playing_key(code: KeyCode) -> KeyAction {
        let turn = |direction| KeyAction::GameCommand(Command::Turn(direction));

        match code {
            // Movement - Arrow keys
            KeyCode::Up => turn(Direction::Up),
            KeyCode::Down => turn(Direction::Down),
            KeyCode::Left => turn(Direction::Left),
            KeyCode::Right => turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => turn(Direction::Right),

            // Controls; S is taken by movement so effects live on X while playing
            KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::GameCommand(Command::TogglePause),
            KeyCode::Char('m') | KeyCode::Char('M') => KeyAction::GameCommand(Command::ToggleMusic),
            KeyCode::Char('x') | KeyCode::Char('X') => KeyAction::GameCommand(Command::ToggleSfx),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => QUIT,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn turn(direction: Direction) -> KeyAction {
        KeyAction::GameCommand(Command::Turn(direction))
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();
        let playing = Screen::Playing;

        assert_eq!(handler.handle_key_event(press(KeyCode::Up), playing), turn(Direction::Up));
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Down), playing),
            turn(Direction::Down)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Left), playing),
            turn(Direction::Left)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Right), playing),
            turn(Direction::Right)
        );
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();
        let playing = Screen::Playing;

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('w')), playing),
            turn(Direction::Up)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('a')), playing),
            turn(Direction::Left)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('s')), playing),
            turn(Direction::Down)
        );
        let d_upper = KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT);
        assert_eq!(handler.handle_key_event(d_upper, playing), turn(Direction::Right));
    }

    #[test]
    fn test_s_means_sfx_in_menu_but_down_in_game() {
        let handler = InputHandler::new();
        let s = press(KeyCode::Char('s'));

        assert_eq!(
            handler.handle_key_event(s, Screen::Menu),
            KeyAction::GameCommand(Command::ToggleSfx)
        );
        assert_eq!(handler.handle_key_event(s, Screen::Playing), turn(Direction::Down));
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('x')), Screen::Playing),
            KeyAction::GameCommand(Command::ToggleSfx)
        );
    }

    #[test]
    fn test_menu_keys() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Enter), Screen::Menu),
            KeyAction::Start
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('m')), Screen::Menu),
            KeyAction::GameCommand(Command::ToggleMusic)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Up), Screen::Menu),
            KeyAction::None
        );
    }

    #[test]
    fn test_pause_toggle() {
        let handler = InputHandler::new();
        let p = press(KeyCode::Char('p'));
        let pause = KeyAction::GameCommand(Command::TogglePause);

        assert_eq!(handler.handle_key_event(p, Screen::Playing), pause);
        assert_eq!(handler.handle_key_event(p, Screen::Paused), pause);
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Up), Screen::Paused),
            KeyAction::None
        );
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();

        for screen in [Screen::Menu, Screen::Playing, Screen::Paused, Screen::GameOver] {
            assert_eq!(
                handler.handle_key_event(press(KeyCode::Char('q')), screen),
                QUIT
            );
            assert_eq!(handler.handle_key_event(press(KeyCode::Esc), screen), QUIT);
        }
    }

    #[test]
    fn test_restart_only_on_game_over() {
        let handler = InputHandler::new();
        let r = press(KeyCode::Char('r'));

        assert_eq!(handler.handle_key_event(r, Screen::GameOver), KeyAction::Restart);
        assert_eq!(handler.handle_key_event(r, Screen::Playing), KeyAction::None);
    }

    #[test]
    fn test_ctrl_c() {
        let handler = InputHandler::new();

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for screen in [Screen::Menu, Screen::Playing, Screen::Paused, Screen::GameOver] {
            assert_eq!(handler.handle_key_event(ctrl_c, screen), QUIT);
        }
    }
}
