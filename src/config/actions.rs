use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;

/// A named action that can be bound to keys in [`KeybindingsConfig`].
pub trait Action: Copy + 'static {
    /// Every action of this kind, in matching priority order.
    const ALL: &'static [Self];

    fn binding(self, config: &KeybindingsConfig) -> &KeyBinding;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
    Help,
    Theme,
    Back,
    Suspend,
}

impl Action for GlobalAction {
    const ALL: &'static [Self] = &[
        Self::Quit,
        Self::Help,
        Self::Theme,
        Self::Back,
        Self::Suspend,
    ];

    fn binding(self, config: &KeybindingsConfig) -> &KeyBinding {
        let kb = &config.global;
        match self {
            Self::Quit => &kb.quit,
            Self::Help => &kb.help,
            Self::Theme => &kb.theme,
            Self::Back => &kb.back,
            Self::Suspend => &kb.suspend,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Up,
    Down,
    Home,
    End,
}

impl Action for NavAction {
    const ALL: &'static [Self] = &[Self::Up, Self::Down, Self::Home, Self::End];

    fn binding(self, config: &KeybindingsConfig) -> &KeyBinding {
        let kb = &config.navigation;
        match self {
            Self::Up => &kb.up,
            Self::Down => &kb.down,
            Self::Home => &kb.home,
            Self::End => &kb.end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchAction {
    Start,
    Stop,
    Toggle,
    Reset,
    Add,
    Remove,
}

impl Action for StopwatchAction {
    const ALL: &'static [Self] = &[
        Self::Start,
        Self::Stop,
        Self::Toggle,
        Self::Reset,
        Self::Add,
        Self::Remove,
    ];

    fn binding(self, config: &KeybindingsConfig) -> &KeyBinding {
        let kb = &config.stopwatch;
        match self {
            Self::Start => &kb.start,
            Self::Stop => &kb.stop,
            Self::Toggle => &kb.toggle,
            Self::Reset => &kb.reset,
            Self::Add => &kb.add,
            Self::Remove => &kb.remove,
        }
    }
}
