mod digits;
mod footer;
mod header;
mod help;
mod stopwatch_list;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::Rect;

pub use color_eyre::Result;

use crate::Theme;

pub use digits::Digits;
pub use footer::Footer;
pub use header::Header;
pub use help::{HelpEvent, HelpSection, HelpView, Keybinding};
pub use stopwatch_list::{StopwatchList, StopwatchMsg};

/// What a component did with an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult<E> {
    /// Not for this component; the parent may try it.
    Ignored,
    /// Handled without anything for the parent to do.
    Consumed,
    /// Handled, and the parent should act on `E`.
    Event(E),
}

impl<E> From<E> for EventResult<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

/// A piece of the screen that reacts to input and draws itself.
///
/// Components never mutate application state directly. They return an
/// [`EventResult`] and the app turns its payload into a message.
pub trait Component {
    type Output;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        _ = key;
        Ok(EventResult::Ignored)
    }

    /// Positions in `mouse` are absolute terminal cells.
    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<EventResult<Self::Output>> {
        _ = mouse;
        Ok(EventResult::Ignored)
    }

    /// Called once per tick before any redraw.
    fn handle_tick(&mut self) {}

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}
