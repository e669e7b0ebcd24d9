use chrono::NaiveTime;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;
use crate::config::HeaderConfig;
use crate::ui::Component;

const CLOCK_WIDTH: u16 = 10;

/// One-line app header: title, subtitle and an optional wall clock.
pub struct Header {
    title: String,
    subtitle: String,
    show_clock: bool,
    clock: String,
}

impl Header {
    pub fn new(config: &HeaderConfig) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            show_clock: config.show_clock,
            clock: String::new(),
        }
    }

    /// Update the clock text. Returns whether it changed.
    pub fn set_time(&mut self, time: NaiveTime) -> bool {
        if !self.show_clock {
            return false;
        }
        let clock = time.format("%H:%M:%S").to_string();
        if clock == self.clock {
            return false;
        }
        self.clock = clock;
        true
    }
}

impl Component for Header {
    type Output = ();

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(
            Paragraph::new("").style(Style::default().bg(theme.mantle)),
            area,
        );

        let [_, title_area, clock_area] = Layout::horizontal([
            Constraint::Length(CLOCK_WIDTH),
            Constraint::Fill(1),
            Constraint::Length(CLOCK_WIDTH),
        ])
        .areas(area);

        let mut spans = vec![Span::styled(
            self.title.as_str(),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        )];
        if !self.subtitle.is_empty() {
            spans.push(Span::styled(" · ", Style::default().fg(theme.overlay0)));
            spans.push(Span::styled(
                self.subtitle.as_str(),
                Style::default().fg(theme.subtext0),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            title_area,
        );

        if self.show_clock {
            frame.render_widget(
                Paragraph::new(self.clock.as_str())
                    .style(Style::default().fg(theme.highlight()))
                    .alignment(Alignment::Right),
                clock_area,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn time(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap_or_default()
    }

    #[test]
    fn test_set_time_reports_changes() {
        let mut header = Header::new(&HeaderConfig::default());
        assert!(header.set_time(time(9, 30, 0)));
        assert!(!header.set_time(time(9, 30, 0)));
        assert!(header.set_time(time(9, 30, 1)));
    }

    #[test]
    fn test_clock_disabled() {
        let config = HeaderConfig {
            show_clock: false,
            ..HeaderConfig::default()
        };
        let mut header = Header::new(&config);
        assert!(!header.set_time(time(12, 0, 0)));
    }

    #[test]
    fn test_render_title_and_clock() {
        let mut header = Header::new(&HeaderConfig::default());
        header.set_time(time(23, 5, 9));
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                header.render(frame, area, &Theme::default());
            })
            .unwrap();

        let line: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(line.contains("Stopwatch · As per textual tutorial"));
        assert!(line.trim_end().ends_with("23:05:09"));
    }
}
