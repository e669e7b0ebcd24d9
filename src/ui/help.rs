use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Row, Table, TableState};

use crate::Theme;
use crate::config::{GlobalAction, KeyResolver, NavAction};
use crate::ui::{Component, EventResult, Result};

/// A key and what it does, as listed in the help overlay and the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub key: String,
    pub description: &'static str,
    pub in_footer: bool,
}

impl Keybinding {
    pub fn new(key: impl Into<String>, description: &'static str) -> Self {
        Self {
            key: key.into(),
            description,
            in_footer: false,
        }
    }

    #[must_use]
    pub const fn in_footer(mut self) -> Self {
        self.in_footer = true;
        self
    }
}

pub struct HelpSection {
    pub title: &'static str,
    pub keybindings: Vec<Keybinding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpEvent {
    Close,
}

/// Modal list of every keybinding, grouped by section.
pub struct HelpView {
    sections: Vec<HelpSection>,
    resolver: Arc<KeyResolver>,
    scroll: usize,
}

impl HelpView {
    pub const fn new(sections: Vec<HelpSection>, resolver: Arc<KeyResolver>) -> Self {
        Self {
            sections,
            resolver,
            scroll: 0,
        }
    }

    fn line_count(&self) -> usize {
        self.sections
            .iter()
            .map(|s| s.keybindings.len() + 2)
            .sum::<usize>()
            .saturating_sub(1)
    }

    fn rows(&self, theme: &Theme) -> Vec<Row<'_>> {
        let title_style = Style::default()
            .fg(theme.subtext0)
            .add_modifier(Modifier::BOLD);
        let key_style = Style::default()
            .fg(theme.key_hint())
            .add_modifier(Modifier::BOLD);

        let mut rows = Vec::new();
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                rows.push(Row::new([""]));
            }
            rows.push(Row::new([
                Cell::from(""),
                Cell::from(section.title).style(title_style),
            ]));
            rows.extend(section.keybindings.iter().map(|kb| {
                Row::new([
                    Cell::from(Line::from(kb.key.as_str()).right_aligned()).style(key_style),
                    Cell::from(kb.description).style(Style::default().fg(theme.text)),
                ])
            }));
        }
        rows
    }
}

impl Component for HelpView {
    type Output = HelpEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if let Some(GlobalAction::Back | GlobalAction::Help | GlobalAction::Quit) =
            self.resolver.resolve::<GlobalAction>(&key)
        {
            return Ok(HelpEvent::Close.into());
        }

        let last = self.line_count().saturating_sub(1);
        match self.resolver.resolve::<NavAction>(&key) {
            Some(NavAction::Up) => self.scroll = self.scroll.saturating_sub(1),
            Some(NavAction::Down) => self.scroll = (self.scroll + 1).min(last),
            Some(NavAction::Home) => self.scroll = 0,
            Some(NavAction::End) => self.scroll = last,
            None => {}
        }
        // Modal: nothing reaches the screen underneath.
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup = area.centered(Constraint::Percentage(60), Constraint::Percentage(70));
        frame.render_widget(Clear, popup);

        let key_width = self
            .sections
            .iter()
            .flat_map(|s| &s.keybindings)
            .map(|kb| kb.key.chars().count())
            .max()
            .unwrap_or(0);
        let key_width = u16::try_from(key_width).unwrap_or(u16::MAX);

        let title = Line::from(vec![
            Span::raw(" Help "),
            Span::styled(
                format!(
                    "({} or {} to close) ",
                    self.resolver.display(GlobalAction::Help),
                    self.resolver.display(GlobalAction::Back)
                ),
                Style::default().fg(theme.overlay1),
            ),
        ]);
        let block = Block::default()
            .title(title)
            .title_style(
                Style::default()
                    .fg(theme.highlight())
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border_focused()))
            .style(Style::default().bg(theme.base));

        let table = Table::new(
            self.rows(theme),
            [Constraint::Length(key_width), Constraint::Fill(1)],
        )
        .column_spacing(3)
        .block(block);
        let mut state = TableState::default().with_offset(self.scroll);
        frame.render_stateful_widget(table, popup, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::config::keybindings::KeybindingsConfig;

    fn view() -> HelpView {
        let resolver = Arc::new(KeyResolver::new(Arc::new(KeybindingsConfig::default())));
        HelpView::new(
            vec![
                HelpSection {
                    title: "Stopwatches",
                    keybindings: vec![Keybinding::new("Space", "Start/Stop")],
                },
                HelpSection {
                    title: "Global",
                    keybindings: vec![Keybinding::new("q", "Quit")],
                },
            ],
            resolver,
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_close_keys() {
        let mut help = view();
        for code in [KeyCode::Esc, KeyCode::Char('?'), KeyCode::Char('q')] {
            assert_eq!(
                help.handle_key(press(code)).unwrap(),
                EventResult::Event(HelpEvent::Close)
            );
        }
    }

    #[test]
    fn test_other_keys_are_swallowed() {
        let mut help = view();
        assert_eq!(
            help.handle_key(press(KeyCode::Char('s'))).unwrap(),
            EventResult::Consumed
        );
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut help = view();
        help.handle_key(press(KeyCode::Char('k'))).unwrap();
        assert_eq!(help.scroll, 0);
        help.handle_key(press(KeyCode::Char('G'))).unwrap();
        // Title, entry, spacer, title, entry.
        assert_eq!(help.scroll, 4);
        help.handle_key(press(KeyCode::Char('j'))).unwrap();
        assert_eq!(help.scroll, 4);
    }

    #[test]
    fn test_render_lists_sections() {
        let mut help = view();
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                help.render(frame, area, &Theme::default());
            })
            .unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Help"));
        assert!(screen.contains("Stopwatches"));
        assert!(screen.contains("Start/Stop"));
        assert!(screen.contains("Quit"));
    }
}
