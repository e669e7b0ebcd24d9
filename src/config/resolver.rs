use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::Action;
use crate::config::keybindings::KeybindingsConfig;

/// Answers "which action is this key?" and "which key is this action?"
/// against the loaded keybindings.
pub struct KeyResolver {
    keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    pub fn matches<A: Action>(&self, event: &KeyEvent, action: A) -> bool {
        action.binding(&self.keybindings).matches(event)
    }

    /// Key text for hints, e.g. `k/Up`.
    pub fn display<A: Action>(&self, action: A) -> String {
        action.binding(&self.keybindings).to_string()
    }

    /// First action of kind `A` bound to `event`.
    pub fn resolve<A: Action>(&self, event: &KeyEvent) -> Option<A> {
        A::ALL
            .iter()
            .copied()
            .find(|action| self.matches(event, *action))
    }
}
