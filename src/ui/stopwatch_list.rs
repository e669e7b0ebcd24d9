use std::sync::Arc;

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Theme;
use crate::config::{KeyResolver, NavAction, StopwatchAction};
use crate::stopwatch::{Stopwatch, Stopwatches, TrackerCommand};
use crate::ui::digits::DIGITS_HEIGHT;
use crate::ui::{Component, Digits, EventResult, Keybinding, Result};

/// Height of one stopwatch row: the readout plus the row border.
const ROW_HEIGHT: u16 = DIGITS_HEIGHT + 2;
const BUTTON_WIDTH: u16 = 9;

/// Requests produced by the stopwatch list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchMsg {
    Dispatch {
        command: TrackerCommand,
        index: usize,
    },
    Add,
    RemoveLast,
    Select(usize),
}

/// Clickable region recorded during the last render.
#[derive(Debug, Clone, Copy)]
struct Hit {
    area: Rect,
    index: usize,
    command: Option<TrackerCommand>,
}

/// Scrollable list of stopwatch rows with a single selection.
pub struct StopwatchList {
    stopwatches: Stopwatches,
    selected: usize,
    offset: usize,
    hits: Vec<Hit>,
    resolver: Arc<KeyResolver>,
    dirty: bool,
}

impl StopwatchList {
    pub fn new(stopwatches: Stopwatches, resolver: Arc<KeyResolver>) -> Self {
        Self {
            stopwatches,
            selected: 0,
            offset: 0,
            hits: Vec::new(),
            resolver,
            dirty: true,
        }
    }

    pub const fn stopwatches(&self) -> &Stopwatches {
        &self.stopwatches
    }

    #[cfg(test)]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// Readouts and running flags in display order.
    #[cfg(test)]
    pub fn snapshot(&self) -> Vec<(String, bool)> {
        self.stopwatches
            .iter()
            .map(|s| (s.readout().to_string(), s.is_running()))
            .collect()
    }

    /// Apply a message produced by this list (or anyone else).
    pub fn update(&mut self, msg: StopwatchMsg) {
        match msg {
            StopwatchMsg::Dispatch { command, index } => {
                self.stopwatches.dispatch(command, index);
            }
            StopwatchMsg::Add => {
                self.selected = self.stopwatches.add();
                self.dirty = true;
            }
            StopwatchMsg::RemoveLast => {
                if self.stopwatches.remove_last() {
                    self.selected = self.selected.min(self.stopwatches.len().saturating_sub(1));
                    self.dirty = true;
                }
            }
            StopwatchMsg::Select(index) => {
                if index < self.stopwatches.len() && index != self.selected {
                    self.selected = index;
                    self.dirty = true;
                }
            }
        }
    }

    /// Whether the list needs to be redrawn. Clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        let stopwatches = self.stopwatches.take_dirty();
        std::mem::take(&mut self.dirty) || stopwatches
    }

    pub fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        vec![
            Keybinding::new(r.display(StopwatchAction::Start), "Start").in_footer(),
            Keybinding::new(r.display(StopwatchAction::Stop), "Stop").in_footer(),
            Keybinding::new(r.display(StopwatchAction::Toggle), "Start/Stop"),
            Keybinding::new(r.display(StopwatchAction::Reset), "Reset").in_footer(),
            Keybinding::new(r.display(StopwatchAction::Add), "Add").in_footer(),
            Keybinding::new(r.display(StopwatchAction::Remove), "Remove").in_footer(),
            Keybinding::new(
                format!(
                    "{}/{}",
                    r.display(NavAction::Up),
                    r.display(NavAction::Down)
                ),
                "Navigate",
            ),
            Keybinding::new(r.display(NavAction::Home), "First"),
            Keybinding::new(r.display(NavAction::End), "Last"),
        ]
    }

    fn last_index(&self) -> usize {
        self.stopwatches.len().saturating_sub(1)
    }

    fn select(&self, index: usize) -> EventResult<StopwatchMsg> {
        if self.stopwatches.is_empty() {
            return EventResult::Consumed;
        }
        StopwatchMsg::Select(index.min(self.last_index())).into()
    }

    fn hit_at(&self, column: u16, row: u16) -> Option<Hit> {
        let position = Position::new(column, row);
        // Buttons are recorded after their row, so search from the back.
        self.hits.iter().rev().find(|hit| hit.area.contains(position)).copied()
    }

    /// Keep the selection inside the visible window.
    fn scroll_to_selection(&mut self, visible_rows: usize) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + visible_rows {
            self.offset = self.selected + 1 - visible_rows;
        }
        self.offset = self.offset.min(self.stopwatches.len().saturating_sub(visible_rows));
    }

    fn render_row(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        index: usize,
        theme: &Theme,
    ) {
        let Some(stopwatch) = self.stopwatches.get(index) else {
            return;
        };
        let running = stopwatch.is_running();
        let border_color = row_border(stopwatch, index == self.selected, theme);
        let background = if running { theme.surface0 } else { theme.base };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(background));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.hits.push(Hit {
            area,
            index,
            command: None,
        });

        let readout = stopwatch.readout();
        let glyph_width = Digits::width(readout);
        let fits_glyphs = inner.width >= 2 * BUTTON_WIDTH + 2 + glyph_width;
        let readout_width = if fits_glyphs {
            glyph_width
        } else {
            u16::try_from(readout.len()).unwrap_or(u16::MAX)
        };
        let [toggle_area, _, reset_area, _, readout_area] = Layout::horizontal([
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Length(1),
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Fill(1),
            Constraint::Length(readout_width),
        ])
        .areas(inner);

        // Start and Stop share one slot; only the applicable one is shown.
        let (command, color) = if running {
            (TrackerCommand::Stop, theme.error())
        } else {
            (TrackerCommand::Start, theme.success())
        };
        render_button(frame, toggle_area, command.label(), color, theme);
        render_button(
            frame,
            reset_area,
            TrackerCommand::Reset.label(),
            theme.primary(),
            theme,
        );

        let mut readout_style = Style::default().fg(theme.text);
        if running {
            readout_style = readout_style.fg(theme.success()).add_modifier(Modifier::BOLD);
        }
        if fits_glyphs {
            frame.render_widget(Digits::new(readout).style(readout_style), readout_area);
        } else {
            let [_, middle, _] = Layout::vertical([Constraint::Length(1); 3]).areas(readout_area);
            frame.render_widget(Paragraph::new(readout).style(readout_style), middle);
        }

        self.hits.push(Hit {
            area: toggle_area,
            index,
            command: Some(command),
        });
        self.hits.push(Hit {
            area: reset_area,
            index,
            command: Some(TrackerCommand::Reset),
        });
    }
}

/// Selection wins over the running highlight.
const fn row_border(stopwatch: &Stopwatch, selected: bool, theme: &Theme) -> Color {
    if selected {
        theme.border_focused()
    } else if stopwatch.is_running() {
        theme.success()
    } else {
        theme.border()
    }
}

fn render_button(frame: &mut Frame, area: Rect, label: &str, color: Color, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(color));
    frame.render_widget(
        Paragraph::new(label)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

impl Component for StopwatchList {
    type Output = StopwatchMsg;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if let Some(action) = self.resolver.resolve::<StopwatchAction>(&key) {
            let command = match action {
                StopwatchAction::Start => TrackerCommand::Start,
                StopwatchAction::Stop => TrackerCommand::Stop,
                StopwatchAction::Toggle => TrackerCommand::Toggle,
                StopwatchAction::Reset => TrackerCommand::Reset,
                StopwatchAction::Add => return Ok(StopwatchMsg::Add.into()),
                StopwatchAction::Remove => return Ok(StopwatchMsg::RemoveLast.into()),
            };
            return Ok(StopwatchMsg::Dispatch {
                command,
                index: self.selected,
            }
            .into());
        }

        Ok(match self.resolver.resolve::<NavAction>(&key) {
            Some(NavAction::Up) => self.select(self.selected.saturating_sub(1)),
            Some(NavAction::Down) => self.select(self.selected + 1),
            Some(NavAction::Home) => self.select(0),
            Some(NavAction::End) => self.select(self.last_index()),
            None => EventResult::Ignored,
        })
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<EventResult<Self::Output>> {
        Ok(match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                match self.hit_at(mouse.column, mouse.row) {
                    Some(Hit {
                        index,
                        command: Some(command),
                        ..
                    }) => {
                        self.update(StopwatchMsg::Select(index));
                        StopwatchMsg::Dispatch { command, index }.into()
                    }
                    Some(Hit { index, .. }) => StopwatchMsg::Select(index).into(),
                    None => EventResult::Ignored,
                }
            }
            MouseEventKind::ScrollUp => self.select(self.selected.saturating_sub(1)),
            MouseEventKind::ScrollDown => self.select(self.selected + 1),
            _ => EventResult::Ignored,
        })
    }

    fn handle_tick(&mut self) {
        self.stopwatches.tick();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.hits.clear();
        frame.render_widget(Block::default().style(Style::default().bg(theme.base)), area);

        if self.stopwatches.is_empty() {
            let hint = format!(
                "No stopwatches. Press {} to add one.",
                self.resolver.display(StopwatchAction::Add)
            );
            let [_, middle, _] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .areas(area);
            frame.render_widget(
                Paragraph::new(hint)
                    .style(Style::default().fg(theme.overlay1))
                    .alignment(Alignment::Center),
                middle,
            );
            return;
        }

        let visible_rows = usize::from((area.height / ROW_HEIGHT).max(1));
        self.scroll_to_selection(visible_rows);

        let end = (self.offset + visible_rows).min(self.stopwatches.len());
        let mut y = area.y;
        for index in self.offset..end {
            let height = ROW_HEIGHT.min(area.bottom().saturating_sub(y));
            if height == 0 {
                break;
            }
            self.render_row(frame, Rect::new(area.x, y, area.width, height), index, theme);
            y += height;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::clock::ManualClock;
    use crate::config::keybindings::KeybindingsConfig;

    fn list(count: usize) -> (Rc<ManualClock>, StopwatchList) {
        let clock = Rc::new(ManualClock::new());
        let resolver = Arc::new(KeyResolver::new(Arc::new(KeybindingsConfig::default())));
        let list = StopwatchList::new(Stopwatches::new(clock.clone(), count), resolver);
        (clock, list)
    }

    fn press(list: &mut StopwatchList, code: KeyCode) -> EventResult<StopwatchMsg> {
        list.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn click(list: &mut StopwatchList, column: u16, row: u16) -> EventResult<StopwatchMsg> {
        list.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
        .unwrap()
    }

    fn draw(list: &mut StopwatchList, width: u16, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                list.render(frame, area, &Theme::default());
            })
            .unwrap();
        terminal
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = usize::from(buffer.area.width);
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_keys_target_selected_stopwatch() {
        let (_, mut list) = list(3);
        assert_eq!(
            press(&mut list, KeyCode::Char('j')),
            EventResult::Event(StopwatchMsg::Select(1))
        );
        list.update(StopwatchMsg::Select(1));
        assert_eq!(
            press(&mut list, KeyCode::Char('s')),
            EventResult::Event(StopwatchMsg::Dispatch {
                command: TrackerCommand::Start,
                index: 1
            })
        );
        assert_eq!(press(&mut list, KeyCode::Char('a')), EventResult::Event(StopwatchMsg::Add));
        assert_eq!(press(&mut list, KeyCode::Char('y')), EventResult::Ignored);
    }

    #[test]
    fn test_navigation_clamps() {
        let (_, mut list) = list(2);
        assert_eq!(
            press(&mut list, KeyCode::Up),
            EventResult::Event(StopwatchMsg::Select(0))
        );
        assert_eq!(
            press(&mut list, KeyCode::Char('G')),
            EventResult::Event(StopwatchMsg::Select(1))
        );
        list.update(StopwatchMsg::Select(1));
        assert_eq!(
            press(&mut list, KeyCode::Down),
            EventResult::Event(StopwatchMsg::Select(1))
        );
    }

    #[test]
    fn test_add_selects_new_and_remove_clamps() {
        let (_, mut list) = list(2);
        list.update(StopwatchMsg::Add);
        assert_eq!(list.selected(), 2);
        assert_eq!(list.stopwatches().len(), 3);

        list.update(StopwatchMsg::RemoveLast);
        assert_eq!(list.selected(), 1);
        list.update(StopwatchMsg::RemoveLast);
        list.update(StopwatchMsg::RemoveLast);
        assert_eq!(list.selected(), 0);
        assert!(list.stopwatches().is_empty());

        list.update(StopwatchMsg::RemoveLast);
        assert!(list.stopwatches().is_empty());
    }

    #[test]
    fn test_render_rows() {
        let (clock, mut list) = list(2);
        list.update(StopwatchMsg::Dispatch {
            command: TrackerCommand::Start,
            index: 1,
        });
        clock.advance(Duration::from_millis(3_725_500));
        list.handle_tick();

        let terminal = draw(&mut list, 60, 10);
        let text = screen_text(&terminal);
        assert_eq!(text.matches("Start").count(), 1);
        assert_eq!(text.matches("Stop").count(), 1);
        assert_eq!(text.matches("Reset").count(), 2);
        assert_eq!(
            list.snapshot(),
            vec![
                ("00:00:00.00".to_string(), false),
                ("01:02:05.50".to_string(), true)
            ]
        );
    }

    #[test]
    fn test_narrow_render_falls_back_to_text() {
        let (_, mut list) = list(1);
        let terminal = draw(&mut list, 40, 5);
        assert!(screen_text(&terminal).contains("00:00:00.00"));
    }

    #[test]
    fn test_empty_render_shows_hint() {
        let (_, mut list) = list(0);
        let terminal = draw(&mut list, 60, 5);
        assert!(screen_text(&terminal).contains("No stopwatches. Press a to add one."));
    }

    #[test]
    fn test_click_buttons() {
        let (_, mut list) = list(2);
        draw(&mut list, 60, 10);

        // Second row starts at y = 5; its start button spans x 1..10, y 6..9.
        assert_eq!(
            click(&mut list, 3, 7),
            EventResult::Event(StopwatchMsg::Dispatch {
                command: TrackerCommand::Start,
                index: 1
            })
        );
        assert_eq!(list.selected(), 1);

        // Reset button of the first row sits right of the start button.
        assert_eq!(
            click(&mut list, 13, 2),
            EventResult::Event(StopwatchMsg::Dispatch {
                command: TrackerCommand::Reset,
                index: 0
            })
        );

        // Readout area selects the row without dispatching.
        assert_eq!(click(&mut list, 50, 2), EventResult::Event(StopwatchMsg::Select(0)));
    }

    #[test]
    fn test_scrolls_to_selection() {
        let (_, mut list) = list(10);
        list.update(StopwatchMsg::Select(9));
        draw(&mut list, 60, 10);
        assert_eq!(list.offset, 8);

        list.update(StopwatchMsg::Select(0));
        draw(&mut list, 60, 10);
        assert_eq!(list.offset, 0);
    }

    #[test]
    fn test_row_border_prefers_selection_over_running() {
        let (_, mut list) = list(2);
        list.update(StopwatchMsg::Dispatch {
            command: TrackerCommand::Start,
            index: 1,
        });
        let theme = Theme::default();
        let idle: &Stopwatch = list.stopwatches().get(0).unwrap();
        let running: &Stopwatch = list.stopwatches().get(1).unwrap();

        assert_eq!(row_border(idle, false, &theme), theme.border());
        assert_eq!(row_border(running, false, &theme), theme.success());
        assert_eq!(row_border(running, true, &theme), theme.border_focused());
    }

    #[test]
    fn test_dirty_after_changes() {
        let (_, mut list) = list(2);
        assert!(list.take_dirty());
        assert!(!list.take_dirty());

        list.update(StopwatchMsg::Select(1));
        assert!(list.take_dirty());

        list.update(StopwatchMsg::Dispatch {
            command: TrackerCommand::Toggle,
            index: 0,
        });
        assert!(list.take_dirty());
    }
}
