use crossterm::event::KeyCode;

use crate::config::key::Key;
use crate::config::keybindings::{GlobalKeybindings, NavigationKeybindings, StopwatchKeybindings};

const fn plain(c: char) -> Key {
    Key::new(KeyCode::Char(c))
}

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: plain('q').into(),
            help: plain('?').into(),
            theme: plain('d').into(),
            back: Key::new(KeyCode::Esc).into(),
            suspend: Key::with_ctrl(KeyCode::Char('z')).into(),
        }
    }
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: [plain('k'), Key::new(KeyCode::Up)].into(),
            down: [plain('j'), Key::new(KeyCode::Down)].into(),
            home: [plain('g'), Key::new(KeyCode::Home)].into(),
            end: [plain('G'), Key::new(KeyCode::End)].into(),
        }
    }
}

impl Default for StopwatchKeybindings {
    fn default() -> Self {
        Self {
            start: plain('s').into(),
            stop: plain('x').into(),
            toggle: plain(' ').into(),
            reset: plain('z').into(),
            add: plain('a').into(),
            remove: plain('r').into(),
        }
    }
}
