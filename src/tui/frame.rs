//! Frames: immutable grids of styled cells produced by widgets.
//!
//! A frame is built row by row and then handed to the render buffer.
//! Rows are not padded: cells past the end of a row are blank.

use super::style::{Cell, Style};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self::styled(text, Style::new())
    }

    /// Display width of the span.
    pub fn width(&self) -> usize {
        self.text.width()
    }
}

/// One rendered screen state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    width: u16,
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    /// Empty frame whose rows are clipped to `width` columns.
    pub fn new(width: u16) -> Self {
        Self {
            width,
            rows: Vec::new(),
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Cell at a position; positions past the row end are blank.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or_default()
    }

    /// Append an empty row.
    pub fn push_blank(&mut self) {
        self.rows.push(Vec::new());
    }

    /// Append a row of single-styled text. Newlines are not interpreted.
    pub fn push_text(&mut self, text: &str, style: Style) {
        self.push_spans(&[Span::styled(text, style)]);
    }

    /// Append a row made of several spans, clipped to the frame width.
    pub fn push_spans(&mut self, spans: &[Span]) {
        let max = self.width as usize;
        let mut row = Vec::new();
        'spans: for span in spans {
            for ch in span.text.chars() {
                let w = UnicodeWidthChar::width(ch).unwrap_or(0);
                if w == 0 {
                    continue;
                }
                if row.len() + w > max {
                    break 'spans;
                }
                row.push(Cell::new(ch, span.style));
                if w == 2 {
                    row.push(Cell::continuation(span.style));
                }
            }
        }
        self.rows.push(row);
    }

    /// Append every row of another frame.
    pub fn extend(&mut self, other: Frame) {
        for mut row in other.rows {
            row.truncate(self.width as usize);
            self.rows.push(row);
        }
    }

    /// Keep at most `height` rows, dropping from the top.
    pub fn keep_last(&mut self, height: usize) {
        if self.rows.len() > height {
            let excess = self.rows.len() - height;
            self.rows.drain(..excess);
        }
    }

    /// Plain text of each row with trailing blanks removed.
    pub fn to_lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| {
                let line: String = row
                    .iter()
                    .filter(|c| !c.is_continuation())
                    .map(|c| c.ch)
                    .collect();
                line.trim_end().to_string()
            })
            .collect()
    }
}

/// Truncate by display width, appending "..." when shortened.
pub fn truncate_value(value: &str, max_width: usize) -> String {
    if value.width() <= max_width {
        return value.to_string();
    }

    let target_width = max_width.saturating_sub(3);
    let mut current_width = 0;
    let mut output = String::new();

    for ch in value.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > target_width {
            break;
        }
        output.push(ch);
        current_width += ch_width;
    }

    output.push_str("...");
    output
}

/// Right-pad to a display width.
pub fn pad_to_width(value: &str, width: usize) -> String {
    let current = value.width();
    if current >= width {
        value.to_string()
    } else {
        format!("{}{}", value, " ".repeat(width - current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::style::Color;

    #[test]
    fn rows_are_clipped_to_width() {
        let mut frame = Frame::new(5);
        frame.push_text("hello world", Style::new());
        assert_eq!(frame.to_lines(), vec!["hello"]);
        assert_eq!(frame.rows()[0].len(), 5);
    }

    #[test]
    fn spans_keep_their_styles() {
        let red = Style::new().fg(Color::Red);
        let mut frame = Frame::new(20);
        frame.push_spans(&[Span::styled("✖", red), Span::raw(" oops")]);
        assert_eq!(frame.cell(0, 0).style, red);
        assert_eq!(frame.cell(0, 2).style, Style::new());
        assert_eq!(frame.to_lines(), vec!["✖ oops"]);
    }

    #[test]
    fn wide_glyphs_take_two_columns() {
        let mut frame = Frame::new(10);
        frame.push_text("日本", Style::new());
        assert_eq!(frame.rows()[0].len(), 4);
        assert!(frame.cell(0, 1).is_continuation());
        assert_eq!(frame.to_lines(), vec!["日本"]);
    }

    #[test]
    fn wide_glyph_that_does_not_fit_is_dropped() {
        let mut frame = Frame::new(3);
        frame.push_text("a日本", Style::new());
        assert_eq!(frame.to_lines(), vec!["a日"]);
    }

    #[test]
    fn cells_past_row_end_are_blank() {
        let mut frame = Frame::new(10);
        frame.push_text("ab", Style::new());
        assert_eq!(frame.cell(0, 7), Cell::blank());
        assert_eq!(frame.cell(3, 0), Cell::blank());
    }

    #[test]
    fn keep_last_drops_top_rows() {
        let mut frame = Frame::new(10);
        for i in 0..5 {
            frame.push_text(&i.to_string(), Style::new());
        }
        frame.keep_last(2);
        assert_eq!(frame.to_lines(), vec!["3", "4"]);
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate_value("short", 10), "short");
        assert_eq!(truncate_value("a long label", 8), "a lon...");
        assert_eq!(truncate_value("日本語テキスト", 7), "日本...");
    }

    #[test]
    fn pad_uses_display_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("日", 4), "日  ");
        assert_eq!(pad_to_width("abcdef", 4), "abcdef");
    }
}
