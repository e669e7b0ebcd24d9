use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;
use crate::ui::Keybinding;

const STATUS_WIDTH: u16 = 28;

/// Bottom line: stopwatch counts or the last error on the left, key hints on
/// the right.
#[derive(Default)]
pub struct Footer {
    total: usize,
    running: usize,
    error_message: Option<String>,
    hints: Vec<Keybinding>,
}

impl Footer {
    pub fn new(hints: Vec<Keybinding>) -> Self {
        Self {
            hints: hints.into_iter().filter(|kb| kb.in_footer).collect(),
            ..Self::default()
        }
    }

    /// Returns whether the counts changed.
    pub const fn set_counts(&mut self, total: usize, running: usize) -> bool {
        let changed = self.total != total || self.running != running;
        self.total = total;
        self.running = running;
        changed
    }

    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    /// Returns whether an error was showing.
    pub fn clear_error(&mut self) -> bool {
        self.error_message.take().is_some()
    }

    fn status_line(&self, theme: &Theme) -> Line<'_> {
        if let Some(err) = &self.error_message {
            return Line::from(Span::styled(
                format!(" Error: {err}"),
                Style::default()
                    .fg(theme.error())
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let noun = if self.total == 1 { "stopwatch" } else { "stopwatches" };
        Line::from(vec![
            Span::styled(
                format!(" {} {noun}", self.total),
                Style::default().fg(theme.text),
            ),
            Span::styled(" · ", Style::default().fg(theme.overlay0)),
            Span::styled(
                format!("{} running", self.running),
                Style::default().fg(if self.running > 0 {
                    theme.success()
                } else {
                    theme.overlay1
                }),
            ),
        ])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(
            Paragraph::new("").style(Style::default().bg(theme.mantle)),
            area,
        );

        let width = if self.error_message.is_some() {
            area.width
        } else {
            STATUS_WIDTH.min(area.width)
        };
        let [status_area, hints_area] =
            Layout::horizontal([Constraint::Length(width), Constraint::Fill(1)]).areas(area);

        frame.render_widget(Paragraph::new(self.status_line(theme)), status_area);

        let mut spans = Vec::new();
        for kb in &self.hints {
            spans.push(Span::styled(
                kb.key.as_str(),
                Style::default()
                    .fg(theme.key_hint())
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {}  ", kb.description),
                Style::default().fg(theme.subtext0),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), hints_area);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn rendered(footer: &Footer, width: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, 1)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                footer.render(frame, area, &Theme::default());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_counts_and_hints() {
        let mut footer = Footer::new(vec![
            Keybinding::new("a", "Add").in_footer(),
            Keybinding::new("q", "Quit"),
        ]);
        assert!(footer.set_counts(3, 1));
        assert!(!footer.set_counts(3, 1));

        let line = rendered(&footer, 80);
        assert!(line.contains("3 stopwatches · 1 running"));
        assert!(line.contains("a Add"));
        assert!(!line.contains("Quit"));
    }

    #[test]
    fn test_error_replaces_status() {
        let mut footer = Footer::new(Vec::new());
        footer.set_error("terminal went away".to_string());
        assert!(rendered(&footer, 60).contains("Error: terminal went away"));
        assert!(footer.clear_error());
        assert!(!footer.clear_error());
    }
}
