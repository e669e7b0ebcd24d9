use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

/// Height of every glyph in cells.
pub const DIGITS_HEIGHT: u16 = 3;

const fn glyph(c: char) -> Option<[&'static str; 3]> {
    Some(match c {
        '0' => ["╭─╮", "│ │", "╰─╯"],
        '1' => ["╶┐ ", " │ ", "╶┴╴"],
        '2' => ["╶─╮", "┌─┘", "╰─╴"],
        '3' => ["╶─╮", " ─┤", "╶─╯"],
        '4' => ["╷ ╷", "╰─┤", "  ╵"],
        '5' => ["╭─╴", "╰─╮", "╶─╯"],
        '6' => ["╭─╴", "├─╮", "╰─╯"],
        '7' => ["╶─┐", "  │", "  ╵"],
        '8' => ["╭─╮", "├─┤", "╰─╯"],
        '9' => ["╭─╮", "╰─┤", "╶─╯"],
        ':' => [" ", ":", " "],
        '.' => [" ", " ", "."],
        _ => return None,
    })
}

fn glyph_width(c: char) -> u16 {
    glyph(c).map_or(1, |rows| {
        u16::try_from(rows[0].chars().count()).unwrap_or(u16::MAX)
    })
}

/// Three-row readout drawn with box characters.
///
/// Digits, `:` and `.` get a glyph; anything else is drawn as itself on the
/// bottom row.
#[derive(Debug, Clone, Copy)]
pub struct Digits<'a> {
    text: &'a str,
    style: Style,
}

impl<'a> Digits<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            style: Style::default(),
        }
    }

    #[must_use]
    pub const fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Columns needed to draw `text`.
    pub fn width(text: &str) -> u16 {
        text.chars().map(glyph_width).sum()
    }
}

impl Widget for Digits<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut x = area.x;
        for c in self.text.chars() {
            if x >= area.right() {
                break;
            }
            let max_width = usize::from(area.right() - x);
            match glyph(c) {
                Some(rows) => {
                    for (row, line) in (0..area.height.min(DIGITS_HEIGHT)).zip(rows) {
                        buf.set_stringn(x, area.y + row, line, max_width, self.style);
                    }
                }
                None if area.height > 0 => {
                    let row = area.height.min(DIGITS_HEIGHT) - 1;
                    buf.set_stringn(x, area.y + row, c.to_string(), max_width, self.style);
                }
                None => {}
            }
            x = x.saturating_add(glyph_width(c));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width() {
        assert_eq!(Digits::width("00:00:00.00"), 27);
        assert_eq!(Digits::width("1"), 3);
        assert_eq!(Digits::width(":."), 2);
    }

    #[test]
    fn test_render_glyphs() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        Digits::new("10:0").render(area, &mut buf);

        let expected = Buffer::with_lines([
            "╶┐ ╭─╮ ╭─╮",
            " │ │ │:│ │",
            "╶┴╴╰─╯ ╰─╯",
        ]);
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_render_clips_to_area() {
        let area = Rect::new(0, 0, 4, 3);
        let mut buf = Buffer::empty(area);
        Digits::new("88").render(area, &mut buf);

        let expected = Buffer::with_lines(["╭─╮╭", "├─┤├", "╰─╯╰"]);
        assert_eq!(buf, expected);
    }
}
